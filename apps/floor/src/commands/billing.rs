//! Billing dialog commands: full payment, split payment, cancel.
//!
//! ## Dialog Flow
//! ```text
//! open_billing ──► [awaiting payment] ──pay──► table reset, dialog closed
//!                        │      ▲
//!            begin_split │      │ back_to_full_bill
//!                        ▼      │
//!                  [splitting]  │
//!                        │      │
//!          confirm_split ▼      │
//!              [awaiting split payment] ──pay──► residual written back,
//!                                                dialog shows the rest
//! ```
//!
//! `cancel_billing` leaves from any step without touching the table.

use serde::Serialize;
use tavola_core::{
    BillingState, CoreError, CoreResult, LineItem, Money, PaymentMethod, PaymentReceipt,
    PaymentScope, SplitOrder, Table, ValidationError,
};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{ConfigState, Floor, FloorState};

/// What the billing dialog shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingResponse {
    pub table_id: Option<String>,
    pub step: String,
    pub method: PaymentMethod,
    pub order_items: Vec<LineItem>,
    /// Live preview while splitting, the confirmed split while paying it
    pub split: Option<SplitOrder>,
    pub amount_due: Option<Money>,
    pub amount_due_display: Option<String>,
}

impl BillingResponse {
    fn build(floor: &Floor, config: &ConfigState) -> CoreResult<Self> {
        let billing = &floor.billing;
        if !billing.is_open() {
            return Ok(BillingResponse {
                table_id: None,
                step: billing.state().name().to_string(),
                method: billing.method(),
                order_items: Vec::new(),
                split: None,
                amount_due: None,
                amount_due_display: None,
            });
        }

        let order = floor.billing_order()?;
        let split = match billing.state() {
            BillingState::SplitInProgress { .. } => Some(billing.split_preview(&order)?),
            BillingState::AwaitingMethodSelection {
                scope: PaymentScope::Split(split),
                ..
            } => Some(split.clone()),
            _ => None,
        };
        let amount_due = billing.amount_due(&order);

        Ok(BillingResponse {
            table_id: billing.table_id().map(str::to_string),
            step: billing.state().name().to_string(),
            method: billing.method(),
            order_items: order.items().to_vec(),
            split,
            amount_due,
            amount_due_display: amount_due.map(|a| config.format_money(a)),
        })
    }
}

/// Result of "Pay".
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub receipt: PaymentReceipt,
    pub amount_display: String,
    pub table: Table,
    pub billing: BillingResponse,
}

pub fn get_billing(floor: &FloorState, config: &ConfigState) -> Result<BillingResponse, ApiError> {
    debug!("get_billing command");
    floor
        .with_floor(|f| BillingResponse::build(f, config))?
        .map_err(ApiError::from)
}

/// "Pay" button on the order sidebar: opens the dialog for the selected
/// table. A table with nothing ordered has nothing to pay.
pub fn open_billing(floor: &FloorState, config: &ConfigState) -> Result<BillingResponse, ApiError> {
    debug!("open_billing command");
    billing_step(floor, config, |f| {
        let table = f.registry.active_table()?;
        if table.status().order().is_empty() {
            return Err(ValidationError::Required {
                field: "order items".to_string(),
            }
            .into());
        }
        let table_id = table.id().to_string();
        f.billing.open(&table_id)
    })
}

/// Card / Cash toggle.
pub fn select_payment_method(
    floor: &FloorState,
    config: &ConfigState,
    method: &str,
) -> Result<BillingResponse, ApiError> {
    debug!(method, "select_payment_method command");
    let method: PaymentMethod = method.parse().map_err(CoreError::from)?;
    billing_step(floor, config, |f| f.billing.select_method(method))
}

/// "Split Bill".
pub fn begin_split(floor: &FloorState, config: &ConfigState) -> Result<BillingResponse, ApiError> {
    debug!("begin_split command");
    billing_step(floor, config, |f| f.billing.begin_split())
}

/// One quantity input of the split view.
pub fn set_split_quantity(
    floor: &FloorState,
    config: &ConfigState,
    item_id: &str,
    quantity: i64,
) -> Result<BillingResponse, ApiError> {
    debug!(item_id, quantity, "set_split_quantity command");
    billing_step(floor, config, |f| {
        let order = f.billing_order()?;
        f.billing.request_split_quantity(&order, item_id, quantity)
    })
}

/// "Confirm Split".
pub fn confirm_split(floor: &FloorState, config: &ConfigState) -> Result<BillingResponse, ApiError> {
    debug!("confirm_split command");
    billing_step(floor, config, |f| {
        let order = f.billing_order()?;
        f.billing.confirm_split(&order).map(|_| ())
    })
}

/// Back arrow on the split payment view.
pub fn back_to_full_bill(
    floor: &FloorState,
    config: &ConfigState,
) -> Result<BillingResponse, ApiError> {
    debug!("back_to_full_bill command");
    billing_step(floor, config, |f| f.billing.back_to_full())
}

/// "Pay": charges the terminal and updates the table.
pub fn pay(floor: &FloorState, config: &ConfigState) -> Result<PaymentResponse, ApiError> {
    debug!("pay command");
    let response = floor
        .with_floor_mut(|f| -> CoreResult<PaymentResponse> {
            let settlement = f.settle()?;
            let table = f.registry.table(&settlement.receipt.table_id)?.clone();
            Ok(PaymentResponse {
                amount_display: config.format_money(settlement.receipt.amount),
                receipt: settlement.receipt,
                table,
                billing: BillingResponse::build(f, config)?,
            })
        })?
        .map_err(ApiError::from)?;

    info!(
        store = %config.store_name,
        receipt_id = %response.receipt.id,
        amount = %response.amount_display,
        "payment completed"
    );
    Ok(response)
}

/// "Cancel": closes the dialog, the table keeps its order.
pub fn cancel_billing(floor: &FloorState, config: &ConfigState) -> Result<BillingResponse, ApiError> {
    debug!("cancel_billing command");
    billing_step(floor, config, |f| {
        f.billing.cancel();
        Ok(())
    })
}

/// Runs one dialog step and returns the refreshed dialog.
fn billing_step<F>(floor: &FloorState, config: &ConfigState, op: F) -> Result<BillingResponse, ApiError>
where
    F: FnOnce(&mut Floor) -> CoreResult<()>,
{
    floor
        .with_floor_mut(|f| {
            op(f)?;
            BillingResponse::build(f, config)
        })?
        .map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::floor::select_table;
    use crate::commands::order::{add_product, get_order};
    use crate::error::ErrorCode;

    /// Table 1 with Cola x2 and Water x1.
    fn two_colas_and_water() -> (FloorState, ConfigState) {
        let state = FloorState::default();
        let config = ConfigState::default();
        select_table(&state, "1").unwrap();
        add_product(&state, &config, "1").unwrap();
        add_product(&state, &config, "1").unwrap();
        add_product(&state, &config, "2").unwrap();
        (state, config)
    }

    #[test]
    fn test_full_payment() {
        let (state, config) = two_colas_and_water();

        let dialog = open_billing(&state, &config).unwrap();
        assert_eq!(dialog.step, "awaiting payment");
        assert_eq!(dialog.amount_due_display.as_deref(), Some("$6.50"));
        assert_eq!(dialog.method, PaymentMethod::Card);

        select_payment_method(&state, &config, "cash").unwrap();
        let paid = pay(&state, &config).unwrap();

        assert_eq!(paid.receipt.amount, Money::from_cents(650));
        assert_eq!(paid.receipt.method, PaymentMethod::Cash);
        assert!(!paid.receipt.is_split);
        assert!(!paid.table.status().is_occupied());
        assert_eq!(paid.billing.step, "idle");
    }

    #[test]
    fn test_split_payment_leaves_residual() {
        let (state, config) = two_colas_and_water();
        open_billing(&state, &config).unwrap();
        begin_split(&state, &config).unwrap();

        let dialog = set_split_quantity(&state, &config, "1", 1).unwrap();
        let preview = dialog.split.unwrap();
        assert_eq!(preview.total(), Money::from_cents(250));
        assert_eq!(preview.selected_count(), 1);

        let dialog = confirm_split(&state, &config).unwrap();
        assert_eq!(dialog.amount_due, Some(Money::from_cents(250)));

        let paid = pay(&state, &config).unwrap();
        assert!(paid.receipt.is_split);
        assert_eq!(paid.table.status().total_amount(), Money::from_cents(400));
        assert_eq!(paid.billing.step, "awaiting payment");
        assert_eq!(paid.billing.amount_due, Some(Money::from_cents(400)));

        // the rest is paid in full and the table is freed
        let paid = pay(&state, &config).unwrap();
        assert_eq!(paid.receipt.amount, Money::from_cents(400));
        assert!(!paid.table.status().is_occupied());
    }

    #[test]
    fn test_out_of_range_split_keeps_previous_value() {
        let (state, config) = two_colas_and_water();
        open_billing(&state, &config).unwrap();
        begin_split(&state, &config).unwrap();
        set_split_quantity(&state, &config, "1", 2).unwrap();

        let err = set_split_quantity(&state, &config, "1", 3).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let dialog = get_billing(&state, &config).unwrap();
        assert_eq!(dialog.split.unwrap().total(), Money::from_cents(500));
    }

    #[test]
    fn test_empty_split_cannot_be_confirmed() {
        let (state, config) = two_colas_and_water();
        open_billing(&state, &config).unwrap();
        begin_split(&state, &config).unwrap();

        let err = confirm_split(&state, &config).unwrap_err();
        assert_eq!(err.code, ErrorCode::BillingState);
        assert_eq!(get_billing(&state, &config).unwrap().step, "splitting");
    }

    #[test]
    fn test_back_to_full_bill() {
        let (state, config) = two_colas_and_water();
        open_billing(&state, &config).unwrap();
        begin_split(&state, &config).unwrap();
        set_split_quantity(&state, &config, "2", 1).unwrap();
        confirm_split(&state, &config).unwrap();

        let dialog = back_to_full_bill(&state, &config).unwrap();
        assert!(dialog.split.is_none());
        assert_eq!(dialog.amount_due, Some(Money::from_cents(650)));
    }

    #[test]
    fn test_cancel_keeps_order() {
        let (state, config) = two_colas_and_water();
        open_billing(&state, &config).unwrap();
        begin_split(&state, &config).unwrap();
        set_split_quantity(&state, &config, "1", 2).unwrap();

        let dialog = cancel_billing(&state, &config).unwrap();
        assert_eq!(dialog.step, "idle");
        assert_eq!(get_order(&state, &config).unwrap().total_display, "$6.50");
    }

    #[test]
    fn test_open_requires_an_order() {
        let state = FloorState::default();
        let config = ConfigState::default();
        select_table(&state, "3").unwrap();

        let err = open_billing(&state, &config).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_pay_without_open_dialog() {
        let (state, config) = two_colas_and_water();
        let err = pay(&state, &config).unwrap_err();
        assert_eq!(err.code, ErrorCode::BillingState);
    }

    #[test]
    fn test_unknown_payment_method() {
        let (state, config) = two_colas_and_water();
        open_billing(&state, &config).unwrap();
        let err = select_payment_method(&state, &config, "voucher").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("must be one of: card, cash"));
    }
}
