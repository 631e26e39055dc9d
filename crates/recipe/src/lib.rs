pub mod membership;

mod command;
mod query;

pub use command::*;
pub use membership::{Favorites, MembershipSet, ShoppingCart};
pub use query::*;
