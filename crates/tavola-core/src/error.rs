//! # Error Types
//!
//! Domain-specific error types for tavola-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tavola-core errors (this file)                                        │
//! │  ├── CoreError        - Floor, order and billing rule violations       │
//! │  └── ValidationError  - Input boundary rejections                      │
//! │                                                                         │
//! │  floor app errors (apps/floor)                                         │
//! │  └── ApiError         - What the UI shell sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → UI                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Order math is total: totals, split and residual never fail
//! 2. Only input that would break an invariant is rejected, and the
//!    state is left untouched when that happens
//! 3. Errors are enum variants, never String

use thiserror::Error;

use crate::types::FloorMode;

// =============================================================================
// Core Error
// =============================================================================

/// Floor, order and billing errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No table with this id exists on the floor.
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Product id is not on the menu.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The order has no line with this id.
    #[error("Line item not found: {0}")]
    LineItemNotFound(String),

    /// Two lines of one order share an id.
    #[error("Duplicate line item: {0}")]
    DuplicateLineItem(String),

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Order has reached the maximum number of distinct lines.
    #[error("Order cannot have more than {max} lines")]
    OrderTooLarge { max: usize },

    /// Operation belongs to the other floor mode.
    ///
    /// ## When This Occurs
    /// - Selecting a table for ordering while the floor is in edit mode
    /// - Dragging a table while the floor is in order mode
    #[error("Operation requires {expected} mode, floor is in {actual} mode")]
    ModeMismatch {
        expected: FloorMode,
        actual: FloorMode,
    },

    /// An order or billing operation was invoked with no table selected.
    #[error("No table is selected")]
    NoActiveTable,

    /// Billing operation is not valid in the current dialog state.
    #[error("Cannot {action} while billing is {state}")]
    InvalidBillingTransition { state: String, action: String },

    /// Confirming a split with every requested quantity at zero.
    #[error("Split selection is empty")]
    EmptySplit,

    /// The payment terminal refused the charge.
    #[error("Payment declined: {reason}")]
    PaymentDeclined { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value is not one of the accepted choices.
    #[error("{field} must be one of: {allowed}")]
    InvalidChoice { field: String, allowed: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ModeMismatch {
            expected: FloorMode::Order,
            actual: FloorMode::Edit,
        };
        assert_eq!(
            err.to_string(),
            "Operation requires order mode, floor is in edit mode"
        );

        let err = CoreError::InvalidBillingTransition {
            state: "idle".to_string(),
            action: "settle".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot settle while billing is idle");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");

        let err = ValidationError::OutOfRange {
            field: "split quantity".to_string(),
            min: 0,
            max: 2,
        };
        assert_eq!(err.to_string(), "split quantity must be between 0 and 2");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "table id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
