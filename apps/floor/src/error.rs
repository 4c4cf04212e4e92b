//! # Error Module
//!
//! Unified error type for floor commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Flow                                      │
//! │                                                                         │
//! │  ┌────────────────┐     ┌────────────────┐                             │
//! │  │  CoreError     │     │  ConfigError   │                             │
//! │  │  (tavola-core) │     │  (floor.toml)  │                             │
//! │  └───────┬────────┘     └───────┬────────┘                             │
//! │          └──────────┬───────────┘                                      │
//! │                     ▼                                                   │
//! │            ┌─────────────────┐                                         │
//! │            │    ApiError     │ ──► { "code": "...", "message": "..." } │
//! │            └─────────────────┘                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tavola_core::CoreError;

use crate::state::ConfigError;

/// Error returned from floor commands.
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Table not found: 9"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Table, product or line item not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Operation not allowed in the current floor mode
    WrongMode,

    /// No table is selected
    NoActiveTable,

    /// Operation not allowed in the current billing step
    BillingState,

    /// Order limits exceeded
    OrderError,

    /// Payment terminal refused the charge
    PaymentError,

    /// Configuration could not be loaded
    ConfigError,

    /// Internal error
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::TableNotFound(id) => ApiError::not_found("Table", &id),
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::LineItemNotFound(id) => ApiError::not_found("Order item", &id),
            CoreError::QuantityTooLarge { .. } => ApiError::validation(err.to_string()),
            CoreError::OrderTooLarge { .. } | CoreError::DuplicateLineItem(_) => {
                ApiError::new(ErrorCode::OrderError, err.to_string())
            }
            CoreError::ModeMismatch { .. } => ApiError::new(ErrorCode::WrongMode, err.to_string()),
            CoreError::NoActiveTable => ApiError::new(ErrorCode::NoActiveTable, err.to_string()),
            CoreError::InvalidBillingTransition { .. } | CoreError::EmptySplit => {
                ApiError::new(ErrorCode::BillingState, err.to_string())
            }
            CoreError::PaymentDeclined { .. } => {
                ApiError::new(ErrorCode::PaymentError, err.to_string())
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        tracing::error!("Config error: {}", err);
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tavola_core::{FloorMode, ValidationError};

    #[test]
    fn test_not_found_mapping() {
        let err = ApiError::from(CoreError::TableNotFound("9".into()));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Table not found: 9");
    }

    #[test]
    fn test_mode_mismatch_mapping() {
        let err = ApiError::from(CoreError::ModeMismatch {
            expected: FloorMode::Order,
            actual: FloorMode::Edit,
        });
        assert_eq!(err.code, ErrorCode::WrongMode);
        assert!(err.message.contains("order"));
    }

    #[test]
    fn test_validation_mapping() {
        let err = ApiError::from(CoreError::Validation(ValidationError::MustBePositive {
            field: "quantity".into(),
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_serializes_screaming_snake_code() {
        let err = ApiError::new(ErrorCode::NoActiveTable, "No table selected");
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(
            json,
            r#"{"code":"NO_ACTIVE_TABLE","message":"No table selected"}"#
        );
    }
}
