//! # Split Calculator
//!
//! Partitions a table's order into the part one guest pays now (the split
//! order) and the part left on the table (the residual).
//!
//! ## Split Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Splitting a Bill                                 │
//! │                                                                         │
//! │  Order                  SplitSelection           SplitOrder             │
//! │  ─────────────────      ──────────────           ─────────────────      │
//! │  Cola  2.50 × 2    ──►  Cola  → 1          ──►   Cola  2.50 × 1         │
//! │  Water 1.50 × 1         Water → 0                (2.50)                 │
//! │  (6.50)                                                                 │
//! │                                                                         │
//! │                  residual(order, split)                                 │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                  Cola  2.50 × 1                                         │
//! │                  Water 1.50 × 1                                         │
//! │                  (4.00)                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - A stored request always satisfies `0 <= requested <= line.quantity`
//! - `residual(o, split) ⊕ split == o` line by line
//! - Unit prices are never touched; only quantities move

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::order::Order;
use crate::validation::validate_split_quantity;

// =============================================================================
// Split Selection
// =============================================================================

/// Per-line quantities the guest wants to pay for.
///
/// Lines without an entry count as 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SplitSelection {
    requested: HashMap<String, i64>,
}

impl SplitSelection {
    pub fn new() -> Self {
        SplitSelection::default()
    }

    /// Records how many units of a line go into the split.
    ///
    /// ## Behavior
    /// - `0..=line.quantity`: stored (0 takes the line back out)
    /// - anything else: rejected, the previous value stays
    ///
    /// ## Errors
    /// - `LineItemNotFound` if the order has no such line
    /// - `Validation(OutOfRange)` for negative or excessive requests
    pub fn request(&mut self, order: &Order, item_id: &str, requested: i64) -> CoreResult<()> {
        let line = order
            .get(item_id)
            .ok_or_else(|| CoreError::LineItemNotFound(item_id.to_string()))?;

        if let Err(e) = validate_split_quantity(requested, line.quantity) {
            warn!(item_id, requested, available = line.quantity, "split request rejected");
            return Err(e.into());
        }

        if requested == 0 {
            self.requested.remove(item_id);
        } else {
            self.requested.insert(item_id.to_string(), requested);
        }
        Ok(())
    }

    /// Requested quantity for a line (0 when never requested).
    pub fn requested(&self, item_id: &str) -> i64 {
        self.requested.get(item_id).copied().unwrap_or(0)
    }

    /// True when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.requested.values().all(|&q| q == 0)
    }

    pub fn clear(&mut self) {
        self.requested.clear();
    }
}

// =============================================================================
// Split Order
// =============================================================================

/// The sub-order paid in one split payment.
///
/// Each line keeps its unit price and carries the requested quantity in
/// place of the original one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SplitOrder {
    items: Order,
}

impl SplitOrder {
    pub fn items(&self) -> &Order {
        &self.items
    }

    pub fn total(&self) -> Money {
        self.items.total()
    }

    /// Number of lines in the split ("2 items selected").
    pub fn selected_count(&self) -> usize {
        self.items.len()
    }

    /// False when every requested quantity is zero; such a split cannot be
    /// confirmed.
    pub fn is_valid_selection(&self) -> bool {
        !self.items.is_empty()
    }
}

// =============================================================================
// Operations
// =============================================================================

/// Builds the split order for a selection.
///
/// Every effective quantity is clamped into `[0, line.quantity]`, so a
/// selection made against an older version of the order can never produce
/// a split larger than what the table has.
pub fn compute_split(order: &Order, selection: &SplitSelection) -> SplitOrder {
    let lines = order
        .items()
        .iter()
        .filter_map(|line| {
            let qty = selection.requested(&line.id).clamp(0, line.quantity);
            (qty > 0).then(|| line.with_quantity(qty))
        })
        .collect();

    SplitOrder {
        items: Order::from_lines(lines),
    }
}

/// What remains on the table after a split has been paid.
///
/// Line by line `remaining = original - split`; lines reaching zero are
/// dropped. Line order is preserved.
pub fn residual(order: &Order, split: &SplitOrder) -> Order {
    order
        .items()
        .iter()
        .map(|line| {
            let paid = split.items().get(&line.id).map_or(0, |s| s.quantity);
            line.with_quantity(line.quantity - paid)
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::LineItem;
    use crate::types::Product;

    fn cola() -> Product {
        Product::new("cola", "Cola", Money::from_cents(250), "drinks")
    }

    fn water() -> Product {
        Product::new("water", "Water", Money::from_cents(150), "drinks")
    }

    fn coffee() -> Product {
        Product::new("coffee", "Coffee", Money::from_cents(300), "drinks")
    }

    fn two_colas_and_water() -> Order {
        let mut order = Order::new();
        order.apply_product_selection(&cola()).unwrap();
        order.apply_product_selection(&cola()).unwrap();
        order.apply_product_selection(&water()).unwrap();
        order
    }

    /// Line-wise quantity sum of two orders, keyed by the first one's lines.
    fn combine(base: &Order, other: &Order) -> Order {
        let mut lines: Vec<LineItem> = base.items().to_vec();
        for extra in other.items() {
            match lines.iter_mut().find(|l| l.id == extra.id) {
                Some(line) => line.quantity += extra.quantity,
                None => lines.push(extra.clone()),
            }
        }
        lines.into_iter().collect()
    }

    fn sorted(order: &Order) -> Vec<LineItem> {
        let mut lines = order.items().to_vec();
        lines.sort_by(|a, b| a.id.cmp(&b.id));
        lines
    }

    #[test]
    fn test_split_one_cola() {
        let order = two_colas_and_water();
        let mut selection = SplitSelection::new();
        selection.request(&order, "cola", 1).unwrap();
        selection.request(&order, "water", 0).unwrap();

        let split = compute_split(&order, &selection);
        assert_eq!(split.items().items(), &[LineItem::from_product(&cola())]);
        assert_eq!(split.total(), Money::from_cents(250));

        let rest = residual(&order, &split);
        assert_eq!(
            rest.items(),
            &[
                LineItem::from_product(&cola()),
                LineItem::from_product(&water())
            ]
        );
        assert_eq!(rest.total(), Money::from_cents(400));
    }

    #[test]
    fn test_split_keeps_unit_price() {
        let order = two_colas_and_water();
        let mut selection = SplitSelection::new();
        selection.request(&order, "cola", 2).unwrap();

        let split = compute_split(&order, &selection);
        let line = split.items().get("cola").unwrap();
        assert_eq!(line.unit_price, Money::from_cents(250));
        assert_eq!(line.quantity, 2);
        assert_eq!(split.total(), Money::from_cents(500));
    }

    #[test]
    fn test_out_of_range_requests_are_rejected() {
        let order = two_colas_and_water();
        let mut selection = SplitSelection::new();
        selection.request(&order, "cola", 1).unwrap();

        assert!(selection.request(&order, "cola", 3).is_err());
        assert!(selection.request(&order, "cola", -1).is_err());
        assert_eq!(selection.requested("cola"), 1);

        assert!(matches!(
            selection.request(&order, "coffee", 1),
            Err(CoreError::LineItemNotFound(_))
        ));
    }

    #[test]
    fn test_compute_split_clamps_to_current_order() {
        let order = two_colas_and_water();
        let mut selection = SplitSelection::new();
        selection.request(&order, "cola", 2).unwrap();

        // Someone removes a cola after the selection was made
        let mut shrunk = order.clone();
        shrunk.set_quantity("cola", 1).unwrap();

        let split = compute_split(&shrunk, &selection);
        for line in split.items().items() {
            let available = shrunk.get(&line.id).unwrap().quantity;
            assert!(line.quantity >= 1 && line.quantity <= available);
        }
        assert_eq!(split.items().get("cola").unwrap().quantity, 1);
    }

    #[test]
    fn test_empty_selection_is_not_valid() {
        let order = two_colas_and_water();
        let mut selection = SplitSelection::new();
        assert!(selection.is_empty());

        selection.request(&order, "water", 1).unwrap();
        selection.request(&order, "water", 0).unwrap();
        assert!(selection.is_empty());

        let split = compute_split(&order, &selection);
        assert!(!split.is_valid_selection());
        assert_eq!(split.selected_count(), 0);
        assert_eq!(split.total(), Money::zero());
    }

    #[test]
    fn test_residual_drops_fully_paid_lines() {
        let order = two_colas_and_water();
        let mut selection = SplitSelection::new();
        selection.request(&order, "water", 1).unwrap();

        let rest = residual(&order, &compute_split(&order, &selection));
        assert_eq!(rest.len(), 1);
        assert!(rest.get("water").is_none());
    }

    #[test]
    fn test_splitting_everything_leaves_empty_residual() {
        let order = two_colas_and_water();
        let mut selection = SplitSelection::new();
        for line in order.items() {
            selection.request(&order, &line.id, line.quantity).unwrap();
        }

        let split = compute_split(&order, &selection);
        assert_eq!(split.total(), order.total());
        assert!(residual(&order, &split).is_empty());
    }

    #[test]
    fn test_residual_plus_split_reconstructs_order() {
        let mut order = two_colas_and_water();
        order.apply_product_selection(&coffee()).unwrap();
        order.set_quantity("coffee", 3).unwrap();

        // every valid selection over the three lines
        for c in 0..=2 {
            for w in 0..=1 {
                for k in 0..=3 {
                    let mut selection = SplitSelection::new();
                    selection.request(&order, "cola", c).unwrap();
                    selection.request(&order, "water", w).unwrap();
                    selection.request(&order, "coffee", k).unwrap();

                    let split = compute_split(&order, &selection);
                    let rest = residual(&order, &split);

                    assert_eq!(sorted(&combine(&rest, split.items())), sorted(&order));
                    assert_eq!(rest.total() + split.total(), order.total());
                }
            }
        }
    }

    #[test]
    fn test_clear_selection() {
        let order = two_colas_and_water();
        let mut selection = SplitSelection::new();
        selection.request(&order, "cola", 2).unwrap();
        selection.clear();
        assert!(selection.is_empty());
        assert_eq!(selection.requested("cola"), 0);
    }
}
