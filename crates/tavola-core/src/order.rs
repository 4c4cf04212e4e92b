//! # Orders
//!
//! The line items a table has ordered and the totals derived from them.
//!
//! ## Order Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Operations                                     │
//! │                                                                         │
//! │  UI Action                Operation                    Order Change     │
//! │  ─────────                ─────────                    ────────────     │
//! │                                                                         │
//! │  Tap product ───────────► apply_product_selection() ─► qty+1 or append │
//! │                                                                         │
//! │  "+" / "-" ─────────────► increment() / decrement() ─► qty±1 (min 1)   │
//! │                                                                         │
//! │  Type quantity ─────────► set_quantity() ────────────► qty = n (n ≥ 1) │
//! │                                                                         │
//! │  Trash icon ────────────► remove_item() ─────────────► line dropped    │
//! │                                                                         │
//! │  Every change ──────────► totals() ──────────────────► TableStatus     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Line ids are unique within an order (selecting a product twice bumps
//!   the existing line)
//! - Every line has `quantity >= 1`; a line is removed, never kept at 0
//! - A failed operation leaves the order exactly as it was

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::trace;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;
use crate::validation::{validate_price, validate_quantity};
use crate::{MAX_ITEM_QUANTITY, MAX_ORDER_LINES};

// =============================================================================
// Line Item
// =============================================================================

/// One line of an order.
///
/// ## Price Snapshot
/// `name` and `unit_price` are copied from the product when it is first
/// selected. A later menu price change does not touch lines already ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    /// Product id; unique within the order.
    pub id: String,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
}

impl LineItem {
    /// Creates a line with quantity 1, snapshotting the product.
    pub fn from_product(product: &Product) -> Self {
        LineItem {
            id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity: 1,
        }
    }

    /// Same line, different quantity.
    pub fn with_quantity(&self, quantity: i64) -> Self {
        LineItem {
            quantity,
            ..self.clone()
        }
    }

    /// unit_price × quantity
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Order
// =============================================================================

/// The ordered list of line items belonging to one table.
///
/// An empty order is a free table. Serializes as a plain array of lines;
/// deserializing checks the same rules the mutators enforce.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(try_from = "Vec<LineItem>")]
#[ts(export)]
pub struct Order(Vec<LineItem>);

impl Order {
    pub fn new() -> Self {
        Order(Vec::new())
    }

    /// Builds an order from lines already known to satisfy the invariants.
    pub(crate) fn from_lines(lines: Vec<LineItem>) -> Self {
        Order(lines)
    }

    pub fn items(&self) -> &[LineItem] {
        &self.0
    }

    pub fn get(&self, item_id: &str) -> Option<&LineItem> {
        self.0.iter().find(|i| i.id == item_id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Sum of all line quantities.
    pub fn total_quantity(&self) -> i64 {
        self.0.iter().map(|i| i.quantity).sum()
    }

    /// Σ unit_price × quantity
    pub fn total(&self) -> Money {
        self.0.iter().map(LineItem::line_total).sum()
    }

    /// Adds one unit of a product to the order.
    ///
    /// ## Behavior
    /// - Product already ordered: that line's quantity goes up by one,
    ///   keeping the price captured the first time
    /// - New product: appended with quantity 1 at the current menu price
    ///
    /// ## Errors
    /// - `QuantityTooLarge` if the line is already at MAX_ITEM_QUANTITY
    /// - `OrderTooLarge` if a new line would exceed MAX_ORDER_LINES
    /// - `Validation` if the product carries a negative price
    pub fn apply_product_selection(&mut self, product: &Product) -> CoreResult<()> {
        if let Some(item) = self.0.iter_mut().find(|i| i.id == product.id) {
            let new_qty = item.quantity + 1;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.quantity = new_qty;
            trace!(item_id = %product.id, quantity = new_qty, "line quantity bumped");
            return Ok(());
        }

        if self.0.len() >= MAX_ORDER_LINES {
            return Err(CoreError::OrderTooLarge {
                max: MAX_ORDER_LINES,
            });
        }
        validate_price(product.price)?;

        self.0.push(LineItem::from_product(product));
        trace!(item_id = %product.id, "line appended");
        Ok(())
    }

    /// Overwrites the quantity of a line.
    ///
    /// ## Preconditions
    /// `quantity >= 1`. Setting zero or less is not a way to remove a line:
    /// it is rejected and the order is left unchanged. Use
    /// [`Order::remove_item`] instead.
    ///
    /// An unknown `item_id` is a no-op, like the list it came from no
    /// longer showing that line.
    pub fn set_quantity(&mut self, item_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }
        validate_quantity(quantity)?;

        match self.0.iter_mut().find(|i| i.id == item_id) {
            Some(item) => item.quantity = quantity,
            None => trace!(item_id, "set_quantity on absent line ignored"),
        }
        Ok(())
    }

    /// "+" button on an order line.
    pub fn increment(&mut self, item_id: &str) -> CoreResult<()> {
        let current = self.quantity_of(item_id)?;
        self.set_quantity(item_id, current + 1)
    }

    /// "-" button on an order line; stops at 1.
    pub fn decrement(&mut self, item_id: &str) -> CoreResult<()> {
        let current = self.quantity_of(item_id)?;
        if current > 1 {
            self.set_quantity(item_id, current - 1)?;
        }
        Ok(())
    }

    /// Drops a line. Absent ids are not an error.
    pub fn remove_item(&mut self, item_id: &str) {
        self.0.retain(|i| i.id != item_id);
    }

    /// Derives the table-facing totals for this order.
    ///
    /// ## Guest Count Rule
    /// ```text
    /// previous order  this order   guest_count
    /// ──────────────  ──────────   ─────────────────────────
    /// any             empty        0
    /// empty (0)       non-empty    default_guest_count (2)
    /// non-empty (n)   non-empty    n (preserved)
    /// ```
    pub fn totals(&self, previous_guest_count: u32, default_guest_count: u32) -> OrderTotals {
        let is_occupied = !self.is_empty();
        let guest_count = match (is_occupied, previous_guest_count) {
            (false, _) => 0,
            (true, 0) => default_guest_count,
            (true, n) => n,
        };

        OrderTotals {
            total_amount: self.total(),
            guest_count,
            is_occupied,
            item_count: self.len(),
            total_quantity: self.total_quantity(),
        }
    }

    fn quantity_of(&self, item_id: &str) -> CoreResult<i64> {
        self.get(item_id)
            .map(|i| i.quantity)
            .ok_or_else(|| CoreError::LineItemNotFound(item_id.to_string()))
    }
}

impl FromIterator<LineItem> for Order {
    /// Collects lines, dropping any with a non-positive quantity.
    fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
        Order(iter.into_iter().filter(|i| i.quantity > 0).collect())
    }
}

impl TryFrom<Vec<LineItem>> for Order {
    type Error = CoreError;

    /// Accepts lines only if each id appears once, every quantity is within
    /// `1..=MAX_ITEM_QUANTITY` and no price is negative.
    fn try_from(items: Vec<LineItem>) -> CoreResult<Self> {
        if items.len() > MAX_ORDER_LINES {
            return Err(CoreError::OrderTooLarge {
                max: MAX_ORDER_LINES,
            });
        }

        let mut seen = HashSet::new();
        for item in &items {
            validate_quantity(item.quantity)?;
            if item.quantity > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: item.quantity,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            validate_price(item.unit_price)?;
            if !seen.insert(item.id.as_str()) {
                return Err(CoreError::DuplicateLineItem(item.id.clone()));
            }
        }

        Ok(Order(items))
    }
}

// =============================================================================
// Order Totals
// =============================================================================

/// Totals shown on the table card and in the order summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderTotals {
    pub total_amount: Money,
    pub guest_count: u32,
    pub is_occupied: bool,
    /// Distinct lines ("3 items" in the summary header).
    pub item_count: usize,
    pub total_quantity: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
