//! # State Module
//!
//! Application state for the floor service.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────┐      ┌──────────────────────────┐    │
//! │  │        FloorState            │      │       ConfigState        │    │
//! │  │                              │      │                          │    │
//! │  │  Arc<Mutex<Floor {           │      │  store_name              │    │
//! │  │    registry, billing,        │      │  currency_symbol         │    │
//! │  │    catalog, terminal }>>     │      │  default_payment_method  │    │
//! │  │                              │      │  default_guest_count     │    │
//! │  │  (read-write)                │      │  (read-only)             │    │
//! │  └──────────────────────────────┘      └──────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod floor;

pub use config::{ConfigError, ConfigState};
pub use floor::{Floor, FloorState};
