//! Order sidebar commands for the selected table.

use serde::Serialize;
use tavola_core::{Category, CoreError, CoreResult, LineItem, Money, Product, TableStatus};
use tracing::debug;

use crate::error::ApiError;
use crate::state::{ConfigState, Floor, FloorState};

/// The menu, optionally narrowed to one category tab.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuResponse {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
}

/// The order sidebar of one table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub table_id: String,
    pub items: Vec<LineItem>,
    pub is_occupied: bool,
    pub guest_count: u32,
    pub total_quantity: i64,
    pub total_amount: Money,
    pub total_display: String,
}

impl OrderResponse {
    fn build(table_id: &str, status: &TableStatus, config: &ConfigState) -> Self {
        OrderResponse {
            table_id: table_id.to_string(),
            items: status.order().items().to_vec(),
            is_occupied: status.is_occupied(),
            guest_count: status.guest_count(),
            total_quantity: status.order().total_quantity(),
            total_amount: status.total_amount(),
            total_display: config.format_money(status.total_amount()),
        }
    }
}

pub fn get_menu(floor: &FloorState, category_id: Option<&str>) -> Result<MenuResponse, ApiError> {
    debug!(?category_id, "get_menu command");
    floor.with_floor(|f| MenuResponse {
        categories: f.catalog.categories().to_vec(),
        products: match category_id {
            Some(id) => f.catalog.in_category(id).cloned().collect(),
            None => f.catalog.products().to_vec(),
        },
    })
}

pub fn get_order(floor: &FloorState, config: &ConfigState) -> Result<OrderResponse, ApiError> {
    debug!("get_order command");
    floor
        .with_floor(|f| {
            let table = f.registry.active_table()?;
            Ok::<_, CoreError>(OrderResponse::build(table.id(), table.status(), config))
        })?
        .map_err(ApiError::from)
}

/// Click on a product card: one more of it on the selected table.
pub fn add_product(
    floor: &FloorState,
    config: &ConfigState,
    product_id: &str,
) -> Result<OrderResponse, ApiError> {
    debug!(product_id, "add_product command");
    update_active_order(floor, config, |f, table_id| {
        let product = f.catalog.find(product_id)?.clone();
        f.registry.add_product(table_id, &product)?;
        Ok(())
    })
}

pub fn set_item_quantity(
    floor: &FloorState,
    config: &ConfigState,
    item_id: &str,
    quantity: i64,
) -> Result<OrderResponse, ApiError> {
    debug!(item_id, quantity, "set_item_quantity command");
    update_active_order(floor, config, |f, table_id| {
        f.registry.set_quantity(table_id, item_id, quantity)?;
        Ok(())
    })
}

/// "+" on an order line.
pub fn increment_item(
    floor: &FloorState,
    config: &ConfigState,
    item_id: &str,
) -> Result<OrderResponse, ApiError> {
    debug!(item_id, "increment_item command");
    update_active_order(floor, config, |f, table_id| {
        f.registry.increment(table_id, item_id)?;
        Ok(())
    })
}

/// "-" on an order line. Stops at 1; removing is a separate action.
pub fn decrement_item(
    floor: &FloorState,
    config: &ConfigState,
    item_id: &str,
) -> Result<OrderResponse, ApiError> {
    debug!(item_id, "decrement_item command");
    update_active_order(floor, config, |f, table_id| {
        f.registry.decrement(table_id, item_id)?;
        Ok(())
    })
}

pub fn remove_item(
    floor: &FloorState,
    config: &ConfigState,
    item_id: &str,
) -> Result<OrderResponse, ApiError> {
    debug!(item_id, "remove_item command");
    update_active_order(floor, config, |f, table_id| {
        f.registry.remove_item(table_id, item_id)?;
        Ok(())
    })
}

/// Applies `op` to the selected table and returns its refreshed sidebar.
///
/// The order of a table whose bill is being paid is frozen until the
/// billing dialog closes.
fn update_active_order<F>(
    floor: &FloorState,
    config: &ConfigState,
    op: F,
) -> Result<OrderResponse, ApiError>
where
    F: FnOnce(&mut Floor, &str) -> CoreResult<()>,
{
    floor
        .with_floor_mut(|f| -> CoreResult<OrderResponse> {
            let table_id = f.active_table_id()?;
            if f.billing.table_id() == Some(table_id.as_str()) {
                return Err(CoreError::InvalidBillingTransition {
                    state: f.billing.state().name().to_string(),
                    action: "change the order".to_string(),
                });
            }

            op(f, &table_id)?;
            let status = f.registry.table(&table_id)?.status();
            Ok(OrderResponse::build(&table_id, status, config))
        })?
        .map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::billing::open_billing;
    use crate::commands::floor::{select_table, set_mode};
    use crate::error::ErrorCode;
    use tavola_core::FloorMode;

    fn setup() -> (FloorState, ConfigState) {
        let state = FloorState::default();
        let config = ConfigState::default();
        select_table(&state, "1").unwrap();
        (state, config)
    }

    #[test]
    fn test_menu_filter() {
        let state = FloorState::default();
        let all = get_menu(&state, None).unwrap();
        assert_eq!(all.products.len(), 3);
        assert_eq!(all.categories.len(), 5);

        let food = get_menu(&state, Some("food")).unwrap();
        assert!(food.products.is_empty());
    }

    #[test]
    fn test_order_flow() {
        let (state, config) = setup();

        add_product(&state, &config, "1").unwrap();
        add_product(&state, &config, "1").unwrap();
        let order = add_product(&state, &config, "2").unwrap();

        assert_eq!(order.items.len(), 2);
        assert_eq!(order.total_quantity, 3);
        assert_eq!(order.guest_count, 2);
        assert_eq!(order.total_display, "$6.50");

        let order = increment_item(&state, &config, "2").unwrap();
        assert_eq!(order.total_amount, Money::from_cents(800));

        let order = decrement_item(&state, &config, "2").unwrap();
        let order_again = decrement_item(&state, &config, "2").unwrap();
        assert_eq!(order.total_amount, order_again.total_amount);

        let order = set_item_quantity(&state, &config, "1", 5).unwrap();
        assert_eq!(order.total_amount, Money::from_cents(1400));

        remove_item(&state, &config, "1").unwrap();
        let order = remove_item(&state, &config, "2").unwrap();
        assert!(!order.is_occupied);
        assert_eq!(order.guest_count, 0);
    }

    #[test]
    fn test_no_table_selected() {
        let state = FloorState::default();
        let config = ConfigState::default();
        let err = add_product(&state, &config, "1").unwrap_err();
        assert_eq!(err.code, ErrorCode::NoActiveTable);
    }

    #[test]
    fn test_unknown_product() {
        let (state, config) = setup();
        let err = add_product(&state, &config, "99").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let (state, config) = setup();
        add_product(&state, &config, "1").unwrap();

        let err = set_item_quantity(&state, &config, "1", 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(get_order(&state, &config).unwrap().total_quantity, 1);
    }

    #[test]
    fn test_order_frozen_while_billing() {
        let (state, config) = setup();
        add_product(&state, &config, "1").unwrap();
        open_billing(&state, &config).unwrap();

        let err = add_product(&state, &config, "1").unwrap_err();
        assert_eq!(err.code, ErrorCode::BillingState);
    }

    #[test]
    fn test_edit_mode_drops_selection() {
        let (state, config) = setup();
        set_mode(&state, &config, FloorMode::Edit).unwrap();

        let err = get_order(&state, &config).unwrap_err();
        assert_eq!(err.code, ErrorCode::NoActiveTable);
    }
}
