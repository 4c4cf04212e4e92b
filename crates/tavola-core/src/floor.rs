//! # Table Registry
//!
//! Owns every table on the floor: where it stands and what it has ordered.
//!
//! ## Registry Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Table Registry                                    │
//! │                                                                         │
//! │  EDIT mode                          ORDER mode                          │
//! │  ─────────                          ──────────                          │
//! │  update_position(id, pos)           select_table(id)                    │
//! │                                     add_product / set_quantity /        │
//! │                                     increment / decrement / remove_item │
//! │                                     apply_settlement(settlement)        │
//! │                                     reset_status(id)                    │
//! │                                                                         │
//! │  Every order change:                                                    │
//! │    order' = f(order.clone())  ──►  status = TableStatus::from_order()  │
//! │    (whole status replaced, never patched field by field)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tables are created once from a seed list and never removed; paying the
//! bill resets a table's status, it does not delete the table.

use serde::Serialize;
use tracing::{debug, info};
use ts_rs::TS;

use crate::billing::{Settlement, TableEffect};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::order::Order;
use crate::types::{FloorMode, Position, Product};
use crate::validation::validate_id;
use crate::DEFAULT_GUEST_COUNT;

// =============================================================================
// Table Status
// =============================================================================

/// What the table card shows: occupancy, guests, running total, order.
///
/// ## Invariants
/// - `is_occupied == !order_items.is_empty()`
/// - `guest_count > 0` only while occupied
/// - `total_amount == order_items.total()`
///
/// Fields are private; a status is only ever built from an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TableStatus {
    is_occupied: bool,
    guest_count: u32,
    total_amount: Money,
    order_items: Order,
}

impl TableStatus {
    /// A free table.
    pub fn unoccupied() -> Self {
        TableStatus::default()
    }

    /// Derives the status for `order`, carrying the guest count over from
    /// the previous status when the table stays occupied.
    pub fn from_order(order: Order, previous_guest_count: u32, default_guest_count: u32) -> Self {
        let totals = order.totals(previous_guest_count, default_guest_count);
        TableStatus {
            is_occupied: totals.is_occupied,
            guest_count: totals.guest_count,
            total_amount: totals.total_amount,
            order_items: order,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.is_occupied
    }

    pub fn guest_count(&self) -> u32 {
        self.guest_count
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn order(&self) -> &Order {
        &self.order_items
    }
}

// =============================================================================
// Table
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Table {
    id: String,
    /// Number painted on the card. Display only.
    table_number: u32,
    position: Position,
    status: TableStatus,
}

impl Table {
    /// A new, unoccupied table.
    pub fn new(id: impl Into<String>, table_number: u32, position: Position) -> Self {
        Table {
            id: id.into(),
            table_number,
            position,
            status: TableStatus::unoccupied(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn table_number(&self) -> u32 {
        self.table_number
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn status(&self) -> &TableStatus {
        &self.status
    }
}

// =============================================================================
// Layout Snapshot
// =============================================================================

/// Where one table stands.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TablePlacement {
    pub id: String,
    pub table_number: u32,
    pub position: Position,
}

/// Table positions handed to layout persistence on "Save Layout".
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct LayoutSnapshot {
    pub tables: Vec<TablePlacement>,
}

impl LayoutSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// =============================================================================
// Table Registry
// =============================================================================

/// The single owner of all table state on the floor.
#[derive(Debug, Clone)]
pub struct TableRegistry {
    tables: Vec<Table>,
    mode: FloorMode,
    active: Option<String>,
    default_guest_count: u32,
}

impl TableRegistry {
    /// Builds a registry in order mode with no table selected.
    pub fn new(tables: Vec<Table>) -> Self {
        TableRegistry {
            tables,
            mode: FloorMode::Order,
            active: None,
            default_guest_count: DEFAULT_GUEST_COUNT,
        }
    }

    /// The starting floor: three free tables in a row.
    ///
    /// ```text
    ///   (100,100)    (300,100)    (500,100)
    ///   ┌───────┐    ┌───────┐    ┌───────┐
    ///   │   1   │    │   2   │    │   3   │
    ///   └───────┘    └───────┘    └───────┘
    /// ```
    pub fn seeded() -> Self {
        TableRegistry::new(vec![
            Table::new("1", 1, Position::new(100.0, 100.0)),
            Table::new("2", 2, Position::new(300.0, 100.0)),
            Table::new("3", 3, Position::new(500.0, 100.0)),
        ])
    }

    /// Guests assumed when a free table places its first order.
    pub fn with_default_guest_count(mut self, guests: u32) -> Self {
        self.default_guest_count = guests;
        self
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, table_id: &str) -> CoreResult<&Table> {
        let idx = self.index_of(table_id)?;
        Ok(&self.tables[idx])
    }

    pub fn mode(&self) -> FloorMode {
        self.mode
    }

    /// Switches between edit and order mode.
    ///
    /// Entering edit mode drops the current selection: selected tables only
    /// exist for ordering.
    pub fn set_mode(&mut self, mode: FloorMode) {
        if self.mode != mode {
            info!(from = %self.mode, to = %mode, "floor mode changed");
        }
        self.mode = mode;
        if mode == FloorMode::Edit {
            self.active = None;
        }
    }

    pub fn active_table_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The selected table, or `NoActiveTable`.
    pub fn active_table(&self) -> CoreResult<&Table> {
        let id = self.active.as_deref().ok_or(CoreError::NoActiveTable)?;
        self.table(id)
    }

    /// Makes a table the target of subsequent order and billing operations.
    pub fn select_table(&mut self, table_id: &str) -> CoreResult<&Table> {
        self.require_mode(FloorMode::Order)?;
        let idx = self.index_of(table_id)?;

        debug!(table_id, "table selected");
        self.active = Some(self.tables[idx].id.clone());
        Ok(&self.tables[idx])
    }

    pub fn deselect(&mut self) {
        self.active = None;
    }

    /// Moves a table. Tables may overlap; nothing checks for collisions.
    pub fn update_position(&mut self, table_id: &str, position: Position) -> CoreResult<()> {
        self.require_mode(FloorMode::Edit)?;
        let idx = self.index_of(table_id)?;
        self.tables[idx].position = position;
        Ok(())
    }

    /// Frees a table: no order, no guests, zero total.
    pub fn reset_status(&mut self, table_id: &str) -> CoreResult<()> {
        self.require_mode(FloorMode::Order)?;
        let idx = self.index_of(table_id)?;
        self.tables[idx].status = TableStatus::unoccupied();
        debug!(table_id, "table reset");
        Ok(())
    }

    pub fn add_product(&mut self, table_id: &str, product: &Product) -> CoreResult<&TableStatus> {
        self.update_order(table_id, |order| order.apply_product_selection(product))
    }

    pub fn set_quantity(
        &mut self,
        table_id: &str,
        item_id: &str,
        quantity: i64,
    ) -> CoreResult<&TableStatus> {
        self.update_order(table_id, |order| order.set_quantity(item_id, quantity))
    }

    pub fn increment(&mut self, table_id: &str, item_id: &str) -> CoreResult<&TableStatus> {
        self.update_order(table_id, |order| order.increment(item_id))
    }

    pub fn decrement(&mut self, table_id: &str, item_id: &str) -> CoreResult<&TableStatus> {
        self.update_order(table_id, |order| order.decrement(item_id))
    }

    pub fn remove_item(&mut self, table_id: &str, item_id: &str) -> CoreResult<&TableStatus> {
        self.update_order(table_id, |order| {
            order.remove_item(item_id);
            Ok(())
        })
    }

    /// Fails exactly when [`apply_settlement`](Self::apply_settlement) would
    /// for this table. Run it before charging so a payment is never taken for
    /// a table that cannot record it.
    pub fn check_settleable(&self, table_id: &str) -> CoreResult<()> {
        self.require_mode(FloorMode::Order)?;
        self.index_of(table_id).map(|_| ())
    }

    /// Applies the outcome of a payment to the table it was taken for.
    ///
    /// - `ResetTable`: the table is freed and, if it was selected, deselected
    /// - `ReplaceOrder`: the table keeps its guests and carries the residual
    pub fn apply_settlement(&mut self, settlement: &Settlement) -> CoreResult<&Table> {
        let table_id = settlement.receipt.table_id.as_str();

        match &settlement.effect {
            TableEffect::ResetTable => {
                self.reset_status(table_id)?;
                if self.active.as_deref() == Some(table_id) {
                    self.active = None;
                }
            }
            TableEffect::ReplaceOrder(rest) => {
                let rest = rest.clone();
                self.update_order(table_id, move |order| {
                    *order = rest;
                    Ok(())
                })?;
            }
        }

        self.table(table_id)
    }

    /// Positions of every table, for "Save Layout".
    pub fn layout(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            tables: self
                .tables
                .iter()
                .map(|t| TablePlacement {
                    id: t.id.clone(),
                    table_number: t.table_number,
                    position: t.position,
                })
                .collect(),
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.tables.iter().filter(|t| t.status.is_occupied).count()
    }

    /// Sum of all unpaid table totals.
    pub fn open_total(&self) -> Money {
        self.tables.iter().map(|t| t.status.total_amount).sum()
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Runs `f` on a copy of the table's order and, if it succeeds, replaces
    /// the whole status with one derived from the new order.
    fn update_order<F>(&mut self, table_id: &str, f: F) -> CoreResult<&TableStatus>
    where
        F: FnOnce(&mut Order) -> CoreResult<()>,
    {
        self.require_mode(FloorMode::Order)?;
        let idx = self.index_of(table_id)?;
        let default_guests = self.default_guest_count;
        let table = &mut self.tables[idx];

        let mut order = table.status.order_items.clone();
        f(&mut order)?;

        table.status = TableStatus::from_order(order, table.status.guest_count, default_guests);
        debug!(
            table_id = %table.id,
            lines = table.status.order_items.len(),
            total = %table.status.total_amount,
            "table order updated"
        );
        Ok(&table.status)
    }

    fn require_mode(&self, expected: FloorMode) -> CoreResult<()> {
        if self.mode != expected {
            return Err(CoreError::ModeMismatch {
                expected,
                actual: self.mode,
            });
        }
        Ok(())
    }

    fn index_of(&self, table_id: &str) -> CoreResult<usize> {
        let table_id = validate_id("table id", table_id)?;
        self.tables
            .iter()
            .position(|t| t.id == table_id)
            .ok_or_else(|| CoreError::TableNotFound(table_id.to_string()))
    }
}

impl Default for TableRegistry {
    fn default() -> Self {
        TableRegistry::seeded()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
