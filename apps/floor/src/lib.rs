//! # tavola-floor
//!
//! Application layer of Tavola: holds the floor in memory and exposes the
//! commands a UI shell drives (table cards, order sidebar, billing dialog).
//!
//! ## Module Structure
//! ```text
//! tavola_floor_lib/
//! ├── lib.rs          ← You are here (entry point, tracing setup)
//! ├── error.rs        ← ApiError for command responses
//! ├── state/
//! │   ├── mod.rs      ← State exports
//! │   ├── config.rs   ← ConfigState (floor.toml + TAVOLA_* env)
//! │   └── floor.rs    ← FloorState (registry, billing, terminal)
//! └── commands/
//!     ├── mod.rs      ← Command exports
//!     ├── floor.rs    ← Mode, selection, layout
//!     ├── order.rs    ← Menu and order sidebar
//!     └── billing.rs  ← Billing dialog, split payment
//! ```
//!
//! ## Startup Sequence
//! ```text
//! run()
//!  ├── init_tracing()            RUST_LOG or "info,tavola=debug"
//!  ├── ConfigState::load_or_default(None)
//!  ├── FloorState::from_config(&config)
//!  └── run_service(&floor, &config)
//! ```

pub mod commands;
pub mod error;
pub mod state;

use tavola_core::FloorMode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::{billing, floor, order};
use error::ApiError;
use state::{ConfigState, FloorState};

/// Application entry point, called from `main.rs`.
pub fn run() -> Result<(), ApiError> {
    init_tracing();

    info!("Starting Tavola floor service");

    let config = ConfigState::load_or_default(None);
    info!(store = %config.store_name, "Configuration loaded");

    let floor_state = FloorState::from_config(&config);
    info!("State initialized");

    run_service(&floor_state, &config)
}

/// One service on a fresh floor: two tables order, table 1 splits its bill
/// and table 2 pays in full.
pub fn run_service(floor_state: &FloorState, config: &ConfigState) -> Result<(), ApiError> {
    floor::select_table(floor_state, "1")?;
    order::add_product(floor_state, config, "1")?;
    order::add_product(floor_state, config, "1")?;
    order::add_product(floor_state, config, "2")?;

    floor::select_table(floor_state, "2")?;
    order::add_product(floor_state, config, "3")?;

    let summary = floor::get_floor(floor_state, config)?;
    info!(
        occupied = summary.occupied_count,
        open_total = %summary.open_total_display,
        "Floor after ordering"
    );

    floor::select_table(floor_state, "1")?;
    billing::open_billing(floor_state, config)?;
    billing::begin_split(floor_state, config)?;
    billing::set_split_quantity(floor_state, config, "1", 1)?;
    billing::confirm_split(floor_state, config)?;
    let split = billing::pay(floor_state, config)?;
    info!(
        table = %split.table.id(),
        paid = %split.amount_display,
        remaining = %config.format_money(split.table.status().total_amount()),
        "Split payment"
    );

    billing::select_payment_method(floor_state, config, "cash")?;
    billing::pay(floor_state, config)?;

    floor::select_table(floor_state, "2")?;
    billing::open_billing(floor_state, config)?;
    billing::pay(floor_state, config)?;

    floor::set_mode(floor_state, config, FloorMode::Edit)?;
    floor::move_table(floor_state, "3", 500.0, 300.0)?;
    floor::save_layout(floor_state)?;
    floor::set_mode(floor_state, config, FloorMode::Order)?;

    let summary = floor::get_floor(floor_state, config)?;
    info!(
        occupied = summary.occupied_count,
        open_total = %summary.open_total_display,
        "Service finished"
    );
    Ok(())
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` overrides the default filter, e.g. `RUST_LOG=tavola_core=trace`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tavola=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_leaves_floor_free() {
        let config = ConfigState::default();
        let floor_state = FloorState::from_config(&config);

        run_service(&floor_state, &config).unwrap();

        let summary = floor::get_floor(&floor_state, &config).unwrap();
        assert_eq!(summary.occupied_count, 0);
        assert_eq!(summary.open_total_display, "$0.00");
        assert_eq!(summary.mode, FloorMode::Order);

        let t3 = summary.tables.iter().find(|t| t.id() == "3").unwrap();
        assert_eq!(t3.position(), tavola_core::Position::new(500.0, 300.0));
    }
}
