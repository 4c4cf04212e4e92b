//! # Input Rules
//!
//! Checks run on values coming from the floor UI before any order or split
//! state is touched. A value that fails here is never stored.
//!
//! ```text
//! input                  rule                         on failure
//! ─────────────────────  ───────────────────────────  ──────────────────────
//! line quantity          n >= 1                       MustBePositive
//! split quantity         0 <= n <= line quantity      OutOfRange, old value kept
//! product price          cents >= 0                   OutOfRange
//! table / item id        non-blank after trim         Required
//! ```
//!
//! Upper bounds on order size (`MAX_ITEM_QUANTITY`, `MAX_ORDER_LINES`) are
//! enforced by [`crate::order::Order`] itself and reported as `CoreError`s.

use crate::error::ValidationError;
use crate::money::Money;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// A line quantity typed into the order sidebar.
///
/// Zero is not "remove": removing a line is its own action.
///
/// ```rust
/// use tavola_core::validation::validate_quantity;
///
/// assert!(validate_quantity(3).is_ok());
/// assert!(validate_quantity(0).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".into(),
        });
    }
    Ok(())
}

/// A split input against what the line holds. 0 leaves the line out.
pub fn validate_split_quantity(requested: i64, available: i64) -> ValidationResult<()> {
    if !(0..=available).contains(&requested) {
        return Err(ValidationError::OutOfRange {
            field: "split quantity".into(),
            min: 0,
            max: available,
        });
    }
    Ok(())
}

/// Menu prices may be zero (on the house) but never negative.
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.cents() < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".into(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Trims an id; blank ids are rejected.
pub fn validate_id<'a>(field: &str, id: &'a str) -> ValidationResult<&'a str> {
    match id.trim() {
        "" => Err(ValidationError::Required {
            field: field.to_string(),
        }),
        trimmed => Ok(trimmed),
    }
}
