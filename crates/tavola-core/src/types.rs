//! # Domain Types
//!
//! Shared value types used throughout the floor.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   Category      │   │   Position      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  x              │       │
//! │  │  name           │   │  name           │   │  y              │       │
//! │  │  price (Money)  │   └─────────────────┘   └─────────────────┘       │
//! │  │  category_id    │                                                    │
//! │  └─────────────────┘   ┌─────────────────┐   ┌─────────────────┐       │
//! │                        │  FloorMode      │   │ PaymentMethod   │       │
//! │                        │  ─────────────  │   │  ─────────────  │       │
//! │                        │  Edit           │   │  Card (default) │       │
//! │                        │  Order          │   │  Cash           │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A menu entry the waiter can add to an order.
///
/// Products are supplied by the catalog and never mutated by order logic;
/// a line item copies `name` and `price` when the product is first selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Money,
    /// Menu tab this product is listed under.
    pub category_id: String,
    pub image: Option<String>,
    pub description: Option<String>,
}

impl Product {
    /// Creates a product without image or description.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        category_id: impl Into<String>,
    ) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            price,
            category_id: category_id.into(),
            image: None,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

// =============================================================================
// Category
// =============================================================================

/// A menu tab (Drinks, Food, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub name: String,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Category {
            id: id.into(),
            name: name.into(),
        }
    }
}

// =============================================================================
// Position
// =============================================================================

/// Top-left corner of a table on the floor plan, in floor pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

// =============================================================================
// Floor Mode
// =============================================================================

/// Which of the two floor-plan modes is active.
///
/// ```text
/// EDIT   tables can be dragged, nothing else
/// ORDER  tables can be selected, ordered for and billed
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FloorMode {
    Edit,
    #[default]
    Order,
}

impl fmt::Display for FloorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FloorMode::Edit => write!(f, "edit"),
            FloorMode::Order => write!(f, "order"),
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the guest pays.
///
/// The method is a tag only: it is recorded on the receipt and handed to
/// the payment terminal, and no billing rule branches on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PaymentMethod {
    #[default]
    Card,
    Cash,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Cash => write!(f, "cash"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "card" => Ok(PaymentMethod::Card),
            "cash" => Ok(PaymentMethod::Cash),
            "" => Err(ValidationError::Required {
                field: "payment method".to_string(),
            }),
            _ => Err(ValidationError::InvalidChoice {
                field: "payment method".to_string(),
                allowed: "card, cash".to_string(),
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_mode_default() {
        assert_eq!(FloorMode::default(), FloorMode::Order);
    }

    #[test]
    fn test_payment_method_default() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Card);
    }

    #[test]
    fn test_payment_method_from_str() {
        assert_eq!("card".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!(" CASH ".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert!("".parse::<PaymentMethod>().is_err());

        let err = "cheque".parse::<PaymentMethod>().unwrap_err();
        assert_eq!(err.to_string(), "payment method must be one of: card, cash");
    }

    #[test]
    fn test_product_builder() {
        let product = Product::new("1", "Cola", Money::from_cents(250), "drinks")
            .with_description("Refreshing cola drink");
        assert_eq!(product.price.cents(), 250);
        assert_eq!(product.description.as_deref(), Some("Refreshing cola drink"));
        assert!(product.image.is_none());
    }

    #[test]
    fn test_serde_wire_names() {
        let json = serde_json::to_string(&FloorMode::Edit).unwrap();
        assert_eq!(json, "\"edit\"");

        let product = Product::new("1", "Cola", Money::from_cents(250), "drinks");
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["categoryId"], "drinks");
        assert_eq!(json["price"], 250);
    }
}
