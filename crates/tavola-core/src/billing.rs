//! # Billing Settlement
//!
//! The payment dialog: full payment, split payment, and what happens to the
//! table once money has changed hands.
//!
//! ## Dialog States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Billing State Machine                            │
//! │                                                                         │
//! │   ┌──────┐  open   ┌───────────────────────────┐  begin_split  ┌──────┐ │
//! │   │ Idle │───────►│ AwaitingMethodSelection    │─────────────►│Split │ │
//! │   └──────┘        │ scope = Full               │              │In    │ │
//! │      ▲            └───────────────────────────┘◄──────┐       │Prog. │ │
//! │      │                 │ settle        ▲              │       └──┬───┘ │
//! │      │                 ▼               │ back_to_full │          │     │
//! │      │          reset table            │   or settle  │  confirm │     │
//! │      │◄─────────  (Idle)        ┌──────┴──────────────┴───┐      │     │
//! │      │                          │ AwaitingMethodSelection │◄─────┘     │
//! │      │                          │ scope = Split(order)    │            │
//! │      │                          └─────────────────────────┘            │
//! │      │                              │ settle, residual empty           │
//! │      └──────────────────────────────┘ → reset table (Idle)             │
//! │                                                                         │
//! │   cancel(): any state ──► Idle, table untouched                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Settling a split whose residual is not empty writes the residual back to
//! the table and returns the dialog to the full-order scope, so the next
//! guest pays from what is left.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::order::Order;
use crate::split::{compute_split, residual, SplitOrder, SplitSelection};
use crate::types::PaymentMethod;

// =============================================================================
// Payment Terminal
// =============================================================================

/// One charge sent to the payment terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeRequest {
    pub receipt_id: String,
    pub table_id: String,
    pub amount: Money,
    pub method: PaymentMethod,
}

/// Terminal's answer to an accepted charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalApproval {
    /// Authorization code or cash drawer reference.
    pub reference: String,
}

/// Whatever takes the money: a card reader, a cash drawer, a test double.
///
/// Returning an error leaves the billing dialog where it was.
pub trait PaymentTerminal: Send {
    fn charge(&mut self, request: &ChargeRequest) -> CoreResult<TerminalApproval>;
}

/// A terminal that approves every charge and remembers it.
#[derive(Debug, Default)]
pub struct SimulatedTerminal {
    charges: Vec<ChargeRequest>,
}

impl SimulatedTerminal {
    pub fn new() -> Self {
        SimulatedTerminal::default()
    }

    /// Every charge approved so far, oldest first.
    pub fn charges(&self) -> &[ChargeRequest] {
        &self.charges
    }
}

impl PaymentTerminal for SimulatedTerminal {
    fn charge(&mut self, request: &ChargeRequest) -> CoreResult<TerminalApproval> {
        info!(
            table_id = %request.table_id,
            amount = %request.amount,
            method = %request.method,
            "simulated terminal approved charge"
        );
        self.charges.push(request.clone());
        Ok(TerminalApproval {
            reference: format!("SIM-{:04}", self.charges.len()),
        })
    }
}

// =============================================================================
// Billing State
// =============================================================================

/// What the guest is paying for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentScope {
    /// The table's whole order.
    Full,
    /// A confirmed split sub-order.
    Split(SplitOrder),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BillingState {
    /// Dialog closed.
    #[default]
    Idle,
    /// Dialog open, waiting for Pay.
    AwaitingMethodSelection { table_id: String, scope: PaymentScope },
    /// Guest is choosing which quantities to split off.
    SplitInProgress {
        table_id: String,
        selection: SplitSelection,
    },
}

impl BillingState {
    /// Short name used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            BillingState::Idle => "idle",
            BillingState::AwaitingMethodSelection {
                scope: PaymentScope::Full,
                ..
            } => "awaiting payment",
            BillingState::AwaitingMethodSelection {
                scope: PaymentScope::Split(_),
                ..
            } => "awaiting split payment",
            BillingState::SplitInProgress { .. } => "splitting",
        }
    }
}

// =============================================================================
// Settlement
// =============================================================================

/// Record of one completed payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PaymentReceipt {
    /// UUID v4.
    pub id: String,
    pub table_id: String,
    pub amount: Money,
    pub method: PaymentMethod,
    /// Lines covered by this payment.
    pub item_count: usize,
    pub is_split: bool,
    pub terminal_reference: String,
    #[ts(as = "String")]
    pub settled_at: DateTime<Utc>,
}

/// What the table registry must do after a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "order")]
pub enum TableEffect {
    /// Nothing left to pay: free the table.
    ResetTable,
    /// Part of the bill is still open: this is what remains.
    ReplaceOrder(Order),
}

/// Outcome of [`BillingSession::settle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub receipt: PaymentReceipt,
    pub effect: TableEffect,
}

// =============================================================================
// Billing Session
// =============================================================================

/// The billing dialog for one table at a time.
///
/// The session never owns the order: callers pass the table's current order
/// to each operation and apply the returned [`Settlement`] to the registry.
#[derive(Debug, Clone, Default)]
pub struct BillingSession {
    state: BillingState,
    method: PaymentMethod,
    default_method: PaymentMethod,
}

impl BillingSession {
    pub fn new(default_method: PaymentMethod) -> Self {
        BillingSession {
            state: BillingState::Idle,
            method: default_method,
            default_method,
        }
    }

    pub fn state(&self) -> &BillingState {
        &self.state
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, BillingState::Idle)
    }

    /// Table the dialog is open for.
    pub fn table_id(&self) -> Option<&str> {
        match &self.state {
            BillingState::Idle => None,
            BillingState::AwaitingMethodSelection { table_id, .. }
            | BillingState::SplitInProgress { table_id, .. } => Some(table_id),
        }
    }

    /// Opens the dialog for a table. Payment method resets to the default.
    pub fn open(&mut self, table_id: &str) -> CoreResult<()> {
        if self.is_open() {
            return Err(self.invalid("open billing"));
        }

        debug!(table_id, "billing opened");
        self.method = self.default_method;
        self.state = BillingState::AwaitingMethodSelection {
            table_id: table_id.to_string(),
            scope: PaymentScope::Full,
        };
        Ok(())
    }

    /// Card / Cash toggle. Recorded only.
    pub fn select_method(&mut self, method: PaymentMethod) -> CoreResult<()> {
        match self.state {
            BillingState::AwaitingMethodSelection { .. } => {
                self.method = method;
                Ok(())
            }
            _ => Err(self.invalid("select payment method")),
        }
    }

    /// "Split Bill": only offered while paying the whole order.
    pub fn begin_split(&mut self) -> CoreResult<()> {
        match &self.state {
            BillingState::AwaitingMethodSelection {
                table_id,
                scope: PaymentScope::Full,
            } => {
                self.state = BillingState::SplitInProgress {
                    table_id: table_id.clone(),
                    selection: SplitSelection::new(),
                };
                Ok(())
            }
            _ => Err(self.invalid("split the bill")),
        }
    }

    /// One quantity input of the split view.
    pub fn request_split_quantity(
        &mut self,
        order: &Order,
        item_id: &str,
        quantity: i64,
    ) -> CoreResult<()> {
        if let BillingState::SplitInProgress { selection, .. } = &mut self.state {
            return selection.request(order, item_id, quantity);
        }
        Err(self.invalid("choose split quantities"))
    }

    /// Live preview of the split (selected count and total).
    pub fn split_preview(&self, order: &Order) -> CoreResult<SplitOrder> {
        match &self.state {
            BillingState::SplitInProgress { selection, .. } => {
                Ok(compute_split(order, selection))
            }
            _ => Err(self.invalid("preview a split")),
        }
    }

    /// "Confirm Split": moves to paying for the selected sub-order.
    ///
    /// An empty selection is refused and the split view stays open.
    pub fn confirm_split(&mut self, order: &Order) -> CoreResult<SplitOrder> {
        let (table_id, split) = match &self.state {
            BillingState::SplitInProgress {
                table_id,
                selection,
            } => (table_id.clone(), compute_split(order, selection)),
            _ => return Err(self.invalid("confirm a split")),
        };

        if !split.is_valid_selection() {
            return Err(CoreError::EmptySplit);
        }

        debug!(
            table_id = %table_id,
            lines = split.selected_count(),
            total = %split.total(),
            "split confirmed"
        );
        self.state = BillingState::AwaitingMethodSelection {
            table_id,
            scope: PaymentScope::Split(split.clone()),
        };
        Ok(split)
    }

    /// Back arrow on the split payment view: pay the whole order instead.
    pub fn back_to_full(&mut self) -> CoreResult<()> {
        match &self.state {
            BillingState::AwaitingMethodSelection {
                table_id,
                scope: PaymentScope::Split(_),
            } => {
                self.state = BillingState::AwaitingMethodSelection {
                    table_id: table_id.clone(),
                    scope: PaymentScope::Full,
                };
                Ok(())
            }
            _ => Err(self.invalid("return to the full bill")),
        }
    }

    /// Amount on the Pay button, if the dialog is showing one.
    pub fn amount_due(&self, order: &Order) -> Option<Money> {
        match &self.state {
            BillingState::AwaitingMethodSelection {
                scope: PaymentScope::Full,
                ..
            } => Some(order.total()),
            BillingState::AwaitingMethodSelection {
                scope: PaymentScope::Split(split),
                ..
            } => Some(split.total()),
            _ => None,
        }
    }

    /// "Pay": charges the terminal and decides what happens to the table.
    ///
    /// ## Outcomes
    /// ```text
    /// scope   residual    effect               dialog
    /// ─────   ─────────   ──────────────────   ───────────────────────
    /// Full    -           ResetTable           Idle
    /// Split   empty       ResetTable           Idle
    /// Split   non-empty   ReplaceOrder(rest)   AwaitingMethodSelection
    ///                                          (Full, over the rest)
    /// ```
    ///
    /// A terminal error is returned as-is and the dialog stays put.
    pub fn settle(
        &mut self,
        order: &Order,
        terminal: &mut dyn PaymentTerminal,
    ) -> CoreResult<Settlement> {
        let (table_id, scope) = match &self.state {
            BillingState::AwaitingMethodSelection { table_id, scope } => {
                (table_id.clone(), scope.clone())
            }
            _ => return Err(self.invalid("settle")),
        };

        let (amount, item_count, effect) = match &scope {
            PaymentScope::Full => (order.total(), order.len(), TableEffect::ResetTable),
            PaymentScope::Split(split) => {
                let rest = residual(order, split);
                let effect = if rest.is_empty() {
                    TableEffect::ResetTable
                } else {
                    TableEffect::ReplaceOrder(rest)
                };
                (split.total(), split.selected_count(), effect)
            }
        };

        let request = ChargeRequest {
            receipt_id: Uuid::new_v4().to_string(),
            table_id: table_id.clone(),
            amount,
            method: self.method,
        };
        let approval = terminal.charge(&request).map_err(|e| {
            warn!(table_id = %table_id, error = %e, "payment not completed");
            e
        })?;

        let receipt = PaymentReceipt {
            id: request.receipt_id,
            table_id: table_id.clone(),
            amount,
            method: self.method,
            item_count,
            is_split: matches!(scope, PaymentScope::Split(_)),
            terminal_reference: approval.reference,
            settled_at: Utc::now(),
        };

        self.state = match effect {
            TableEffect::ResetTable => BillingState::Idle,
            TableEffect::ReplaceOrder(_) => BillingState::AwaitingMethodSelection {
                table_id: table_id.clone(),
                scope: PaymentScope::Full,
            },
        };

        info!(
            table_id = %table_id,
            amount = %receipt.amount,
            method = %receipt.method,
            split = receipt.is_split,
            "payment settled"
        );
        Ok(Settlement { receipt, effect })
    }

    /// Closes the dialog from any state. The table is never touched and an
    /// in-progress split selection is discarded.
    pub fn cancel(&mut self) {
        if self.is_open() {
            debug!(state = self.state.name(), "billing cancelled");
        }
        self.state = BillingState::Idle;
        self.method = self.default_method;
    }

    fn invalid(&self, action: &str) -> CoreError {
        CoreError::InvalidBillingTransition {
            state: self.state.name().to_string(),
            action: action.to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
