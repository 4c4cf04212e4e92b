//! # Catalog
//!
//! The menu the order sidebar shows: category tabs plus a product grid.
//!
//! Fetching a real menu is somebody else's job; the floor only needs a list
//! of products to pick from, so [`Catalog::default_menu`] ships a fixed one.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Category, Product};

/// Products and the category tabs they are grouped under.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    categories: Vec<Category>,
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>, products: Vec<Product>) -> Self {
        Catalog {
            categories,
            products,
        }
    }

    /// The built-in menu.
    ///
    /// ```text
    /// Drinks │ Food │ Shisha │ Desserts │ Specials
    /// ───────┴──────┴────────┴──────────┴─────────
    ///  Cola    2.50
    ///  Water   1.50
    ///  Coffee  3.00
    /// ```
    pub fn default_menu() -> Self {
        let categories = vec![
            Category::new("drinks", "Drinks"),
            Category::new("food", "Food"),
            Category::new("shisha", "Shisha"),
            Category::new("desserts", "Desserts"),
            Category::new("specials", "Specials"),
        ];

        let products = vec![
            Product::new("1", "Cola", Money::from_cents(250), "drinks")
                .with_image("https://dummyimage.com/100/e0e0e0/666666&text=Cola")
                .with_description("Refreshing cola drink"),
            Product::new("2", "Water", Money::from_cents(150), "drinks")
                .with_image("https://dummyimage.com/100/e0e0e0/666666&text=Water")
                .with_description("Still mineral water"),
            Product::new("3", "Coffee", Money::from_cents(300), "drinks")
                .with_image("https://dummyimage.com/100/e0e0e0/666666&text=Coffee")
                .with_description("Hot brewed coffee"),
        ];

        Catalog::new(categories, products)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Looks up a product by id.
    pub fn find(&self, product_id: &str) -> CoreResult<&Product> {
        self.products
            .iter()
            .find(|p| p.id == product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))
    }

    /// Products listed under one category tab, in menu order.
    pub fn in_category<'a>(&'a self, category_id: &'a str) -> impl Iterator<Item = &'a Product> {
        self.products
            .iter()
            .filter(move |p| p.category_id == category_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
