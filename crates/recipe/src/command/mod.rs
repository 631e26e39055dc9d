use std::{collections::HashSet, ops::Deref};

use serde::Deserialize;
use validator::Validate;

mod create;
mod delete;
mod lines;
mod update;

pub use create::CreateInput;
pub use update::UpdateInput;

pub const MAX_SMALL_POSITIVE: i64 = 32767;

/// One ingredient-quantity pair of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Validate)]
pub struct IngredientEntry {
    pub id: i64,
    #[validate(range(min = 1, max = 32767, message = "Amount must be between 1 and 32767."))]
    pub amount: i64,
}

#[derive(Clone)]
pub struct Command {
    state: pantry_shared::State,
    pub favorites: crate::MembershipSet<crate::Favorites>,
    pub shopping_cart: crate::MembershipSet<crate::ShoppingCart>,
}

impl Deref for Command {
    type Target = pantry_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl Command {
    pub fn new(state: pantry_shared::State) -> Self {
        Self {
            favorites: crate::MembershipSet::new(state.clone()),
            shopping_cart: crate::MembershipSet::new(state.clone()),
            state,
        }
    }
}

/// Rejects an empty ingredient list, non-positive amounts and repeated ids.
pub(crate) fn validate_entries(entries: &[IngredientEntry]) -> pantry_shared::Result<()> {
    if entries.is_empty() {
        pantry_shared::user!("At least one ingredient is required.");
    }

    for entry in entries {
        entry.validate()?;
    }

    let mut seen = HashSet::with_capacity(entries.len());
    if !entries.iter().all(|entry| seen.insert(entry.id)) {
        pantry_shared::user!("Duplicate ingredients are not allowed.");
    }

    Ok(())
}

/// Tag ids form a set; repeats collapse.
pub(crate) fn tag_set(tags: &[i64]) -> pantry_shared::Result<Vec<i64>> {
    if tags.is_empty() {
        pantry_shared::user!("At least one tag is required.");
    }

    let mut ids = tags.to_vec();
    ids.sort_unstable();
    ids.dedup();

    Ok(ids)
}
