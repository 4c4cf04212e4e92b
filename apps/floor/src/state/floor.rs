//! # Floor State
//!
//! The in-memory floor: table registry, billing dialog, menu and payment
//! terminal, behind one mutex.
//!
//! ## Thread Safety
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    FloorState Access                                    │
//! │                                                                         │
//! │  command A ──► with_floor_mut(|f| ...) ──┐                              │
//! │                                          ▼                              │
//! │                               Arc<Mutex<Floor>>                         │
//! │                                          ▲                              │
//! │  command B ──► with_floor(|f| ...) ──────┘  (waits for A)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every command sees the floor whole: no other command can observe a table
//! between its order changing and its status being recomputed.

use std::sync::{Arc, Mutex};

use tavola_core::{
    BillingSession, Catalog, CoreError, CoreResult, Order, PaymentTerminal, Settlement,
    SimulatedTerminal, TableRegistry,
};
use tracing::error;

use crate::error::ApiError;
use crate::state::ConfigState;

/// Everything a floor command may touch.
pub struct Floor {
    pub registry: TableRegistry,
    pub billing: BillingSession,
    pub catalog: Catalog,
    terminal: Box<dyn PaymentTerminal>,
}

impl Floor {
    pub fn new(
        registry: TableRegistry,
        billing: BillingSession,
        catalog: Catalog,
        terminal: Box<dyn PaymentTerminal>,
    ) -> Self {
        Floor {
            registry,
            billing,
            catalog,
            terminal,
        }
    }

    /// The seeded floor with the default menu and a simulated terminal.
    pub fn from_config(config: &ConfigState) -> Self {
        Floor::new(
            TableRegistry::seeded().with_default_guest_count(config.default_guest_count),
            BillingSession::new(config.default_payment_method),
            Catalog::default_menu(),
            Box::new(SimulatedTerminal::new()),
        )
    }

    /// Id of the selected table, or `NoActiveTable`.
    pub fn active_table_id(&self) -> CoreResult<String> {
        self.registry
            .active_table_id()
            .map(str::to_string)
            .ok_or(CoreError::NoActiveTable)
    }

    /// Current order of the table the billing dialog is open for.
    pub fn billing_order(&self) -> CoreResult<Order> {
        let table_id = self.billing.table_id().ok_or_else(|| {
            CoreError::InvalidBillingTransition {
                state: self.billing.state().name().to_string(),
                action: "read the bill".to_string(),
            }
        })?;
        Ok(self.registry.table(table_id)?.status().order().clone())
    }

    /// Charges the open bill and applies the outcome to its table.
    ///
    /// The table is checked before the terminal is charged; once the charge
    /// goes through, recording it on the table cannot fail.
    pub fn settle(&mut self) -> CoreResult<Settlement> {
        let order = self.billing_order()?;
        if let Some(table_id) = self.billing.table_id() {
            self.registry.check_settleable(table_id)?;
        }
        let settlement = self.billing.settle(&order, self.terminal.as_mut())?;
        self.registry.apply_settlement(&settlement)?;
        Ok(settlement)
    }
}

/// Thread-safe floor state.
#[derive(Clone)]
pub struct FloorState {
    floor: Arc<Mutex<Floor>>,
}

impl FloorState {
    pub fn new(floor: Floor) -> Self {
        FloorState {
            floor: Arc::new(Mutex::new(floor)),
        }
    }

    pub fn from_config(config: &ConfigState) -> Self {
        FloorState::new(Floor::from_config(config))
    }

    /// Executes a function with read access to the floor.
    pub fn with_floor<F, R>(&self, f: F) -> Result<R, ApiError>
    where
        F: FnOnce(&Floor) -> R,
    {
        let floor = self.floor.lock().map_err(|_| {
            error!("Floor mutex poisoned");
            ApiError::internal("Floor state is unavailable")
        })?;
        Ok(f(&floor))
    }

    /// Executes a function with write access to the floor.
    pub fn with_floor_mut<F, R>(&self, f: F) -> Result<R, ApiError>
    where
        F: FnOnce(&mut Floor) -> R,
    {
        let mut floor = self.floor.lock().map_err(|_| {
            error!("Floor mutex poisoned");
            ApiError::internal("Floor state is unavailable")
        })?;
        Ok(f(&mut floor))
    }
}

impl Default for FloorState {
    fn default() -> Self {
        FloorState::from_config(&ConfigState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tavola_core::{FloorMode, PaymentMethod, TableEffect};

    struct DecliningTerminal;

    impl PaymentTerminal for DecliningTerminal {
        fn charge(
            &mut self,
            _request: &tavola_core::billing::ChargeRequest,
        ) -> CoreResult<tavola_core::billing::TerminalApproval> {
            Err(CoreError::PaymentDeclined {
                reason: "card expired".into(),
            })
        }
    }

    fn floor_with_cola(terminal: Box<dyn PaymentTerminal>) -> Floor {
        let mut floor = Floor::new(
            TableRegistry::seeded(),
            BillingSession::new(PaymentMethod::Card),
            Catalog::default_menu(),
            terminal,
        );
        let cola = floor.catalog.find("1").unwrap().clone();
        floor.registry.select_table("1").unwrap();
        floor.registry.add_product("1", &cola).unwrap();
        floor
    }

    #[test]
    fn test_settle_resets_table() {
        let mut floor = floor_with_cola(Box::new(SimulatedTerminal::new()));
        floor.billing.open("1").unwrap();

        let settlement = floor.settle().unwrap();
        assert_eq!(settlement.effect, TableEffect::ResetTable);
        assert_eq!(settlement.receipt.amount.cents(), 250);
        assert!(!floor.registry.table("1").unwrap().status().is_occupied());
    }

    #[test]
    fn test_declined_payment_keeps_order() {
        let mut floor = floor_with_cola(Box::new(DecliningTerminal));
        floor.billing.open("1").unwrap();

        assert!(matches!(
            floor.settle(),
            Err(CoreError::PaymentDeclined { .. })
        ));
        assert!(floor.billing.is_open());
        assert!(floor.registry.table("1").unwrap().status().is_occupied());
    }

    #[test]
    fn test_settle_in_edit_mode_takes_no_payment() {
        let mut floor = floor_with_cola(Box::new(SimulatedTerminal::new()));
        floor.billing.open("1").unwrap();
        floor.registry.set_mode(FloorMode::Edit);

        assert!(matches!(
            floor.settle(),
            Err(CoreError::ModeMismatch { .. })
        ));
        assert!(floor.billing.is_open());
        assert!(floor.registry.table("1").unwrap().status().is_occupied());

        // back in order mode the same bill goes through
        floor.registry.set_mode(FloorMode::Order);
        let settlement = floor.settle().unwrap();
        assert_eq!(settlement.effect, TableEffect::ResetTable);
        assert!(!floor.billing.is_open());
    }

    #[test]
    fn test_state_from_config() {
        let config = ConfigState {
            default_payment_method: PaymentMethod::Cash,
            default_guest_count: 5,
            ..ConfigState::default()
        };
        let state = FloorState::from_config(&config);

        let guests = state
            .with_floor_mut(|f| {
                let coffee = f.catalog.find("3").unwrap().clone();
                f.registry.add_product("2", &coffee).unwrap().guest_count()
            })
            .unwrap();
        assert_eq!(guests, 5);

        let method = state.with_floor(|f| f.billing.method()).unwrap();
        assert_eq!(method, PaymentMethod::Cash);
    }
}
