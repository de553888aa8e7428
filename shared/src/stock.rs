//! Stock derivation from an ingredient's history log
//!
//! Nothing here is stored. Every figure is recomputed from the immutable
//! history on read, so a cached counter can never drift from the events.
//! All functions are total: absent fields contribute zero and arithmetic
//! saturates instead of overflowing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Ingredient, IngredientHistoryEntry};

fn imports(ingredient: &Ingredient) -> impl Iterator<Item = &IngredientHistoryEntry> {
    ingredient.history.iter().filter(|entry| entry.is_import())
}

fn saturating_sum(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, |acc, value| acc.saturating_add(value))
}

/// Sum of `importQuantity` over import entries
pub fn total_import_quantity(ingredient: &Ingredient) -> Decimal {
    saturating_sum(imports(ingredient).filter_map(|entry| entry.import_quantity))
}

/// Always zero. Usage tracking was retired upstream and no decrement policy
/// exists; the function stays so stock summaries keep their shape.
pub fn total_usage_quantity(_ingredient: &Ingredient) -> Decimal {
    Decimal::ZERO
}

/// `initialQuantity` (absent reads as zero) plus everything imported
pub fn current_quantity(ingredient: &Ingredient) -> Decimal {
    ingredient
        .initial_quantity
        .unwrap_or(Decimal::ZERO)
        .saturating_add(total_import_quantity(ingredient))
        .saturating_sub(total_usage_quantity(ingredient))
}

/// `<=` so a negative figure also counts as out of stock
pub fn is_out_of_stock(ingredient: &Ingredient) -> bool {
    current_quantity(ingredient) <= Decimal::ZERO
}

/// Sum of `price * importQuantity`; entries missing either field add nothing
pub fn total_import_price(ingredient: &Ingredient) -> Decimal {
    saturating_sum(imports(ingredient).filter_map(|entry| {
        Some(entry.price?.saturating_mul(entry.import_quantity?))
    }))
}

/// Number of import entries, whether or not their fields are filled in
pub fn import_count(ingredient: &Ingredient) -> usize {
    imports(ingredient).count()
}

/// Sum of `productWeight * importQuantity`; same skip rule as the price total
pub fn total_import_weight(ingredient: &Ingredient) -> Decimal {
    saturating_sum(imports(ingredient).filter_map(|entry| {
        Some(entry.product_weight?.saturating_mul(entry.import_quantity?))
    }))
}

/// Weighted average unit price over priced imports.
///
/// `None` when no import carries both a price and a positive quantity.
pub fn average_import_price(ingredient: &Ingredient) -> Option<Decimal> {
    let priced_quantity = saturating_sum(
        imports(ingredient)
            .filter(|entry| entry.price.is_some())
            .filter_map(|entry| entry.import_quantity),
    );
    if priced_quantity <= Decimal::ZERO {
        return None;
    }
    total_import_price(ingredient).checked_div(priced_quantity)
}

/// Every derived figure for one ingredient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSummary {
    pub current_quantity: Decimal,
    pub is_out_of_stock: bool,
    pub total_import_quantity: Decimal,
    pub total_usage_quantity: Decimal,
    pub total_import_weight: Decimal,
    pub total_import_price: Decimal,
    pub average_import_price: Option<Decimal>,
    pub import_count: usize,
}

impl StockSummary {
    pub fn of(ingredient: &Ingredient) -> Self {
        let current_quantity = current_quantity(ingredient);
        Self {
            current_quantity,
            is_out_of_stock: current_quantity <= Decimal::ZERO,
            total_import_quantity: total_import_quantity(ingredient),
            total_usage_quantity: total_usage_quantity(ingredient),
            total_import_weight: total_import_weight(ingredient),
            total_import_price: total_import_price(ingredient),
            average_import_price: average_import_price(ingredient),
            import_count: import_count(ingredient),
        }
    }
}

impl Ingredient {
    /// Shorthand for [`StockSummary::of`]
    pub fn stock(&self) -> StockSummary {
        StockSummary::of(self)
    }
}
