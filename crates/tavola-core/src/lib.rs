//! # tavola-core: Pure Business Logic for Tavola
//!
//! Order aggregation, bill splitting, billing settlement and the table
//! registry of a table-service restaurant. No I/O happens in this crate.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tavola Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Floor UI (table cards, menu, bill)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tavola-floor commands                        │   │
//! │  │    select_table, add_product, open_billing, settle, etc.       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tavola-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   order   │  │   split   │  │  billing  │  │   floor   │  │   │
//! │  │   │   Order   │  │ Selection │  │  Session  │  │ Registry  │  │   │
//! │  │   │ LineItem  │  │ residual  │  │ Terminal  │  │   Table   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product, Category, Position, FloorMode, PaymentMethod
//! - [`money`] - Money type with integer arithmetic
//! - [`catalog`] - The menu
//! - [`order`] - Line items and order totals
//! - [`split`] - Split selection, split order and residual
//! - [`billing`] - Billing session and payment terminal seam
//! - [`floor`] - Table registry
//! - [`error`] - Domain error types
//! - [`validation`] - Input rules
//!
//! ## Example Usage
//!
//! ```rust
//! use tavola_core::{Catalog, Money, TableRegistry};
//!
//! let catalog = Catalog::default_menu();
//! let mut floor = TableRegistry::seeded();
//!
//! let cola = catalog.find("1").unwrap().clone();
//! floor.add_product("1", &cola).unwrap();
//! floor.add_product("1", &cola).unwrap();
//!
//! let status = floor.table("1").unwrap().status();
//! assert!(status.is_occupied());
//! assert_eq!(status.total_amount(), Money::from_cents(500));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod billing;
pub mod catalog;
pub mod error;
pub mod floor;
pub mod money;
pub mod order;
pub mod split;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use billing::{
    BillingSession, BillingState, PaymentReceipt, PaymentScope, PaymentTerminal, Settlement,
    SimulatedTerminal, TableEffect,
};
pub use catalog::Catalog;
pub use error::{CoreError, CoreResult, ValidationError};
pub use floor::{LayoutSnapshot, Table, TableRegistry, TableStatus};
pub use money::Money;
pub use order::{LineItem, Order, OrderTotals};
pub use split::{compute_split, residual, SplitOrder, SplitSelection};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Guests assumed when a free table places its first order.
pub const DEFAULT_GUEST_COUNT: u32 = 2;

/// Maximum quantity of a single line item.
///
/// Catches a mistyped 100 where 10 was meant.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum number of distinct lines on one table's order.
pub const MAX_ORDER_LINES: usize = 100;
