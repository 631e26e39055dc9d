use std::collections::BTreeMap;

use sqlx::prelude::FromRow;

/// One ingredient line of a recipe sitting in a cart.
#[derive(Debug, Clone, FromRow)]
pub struct CartLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingItem {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

/// Groups lines by (name, unit) and sums their amounts.
///
/// The result is ordered by name, then unit. The same ingredient measured in
/// two different units stays as two items.
pub fn aggregate(lines: impl IntoIterator<Item = CartLine>) -> Vec<ShoppingItem> {
    let mut groups: BTreeMap<(String, String), i64> = BTreeMap::new();

    for line in lines {
        *groups
            .entry((line.name, line.measurement_unit))
            .or_default() += line.amount;
    }

    groups
        .into_iter()
        .map(|((name, measurement_unit), total_amount)| ShoppingItem {
            name,
            measurement_unit,
            total_amount,
        })
        .collect()
}
