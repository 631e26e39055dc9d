mod aggregation;
mod query;
mod render;

pub use aggregation::*;
pub use query::*;
pub use render::*;
