//! Floor plan commands: mode switch, table selection and layout.

use serde::Serialize;
use tavola_core::{FloorMode, Money, Position, Table};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{ConfigState, Floor, FloorState};

/// The whole floor as the table cards show it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorResponse {
    pub store_name: String,
    pub mode: FloorMode,
    pub active_table_id: Option<String>,
    pub tables: Vec<Table>,
    pub occupied_count: usize,
    pub open_total: Money,
    pub open_total_display: String,
}

impl FloorResponse {
    pub(crate) fn build(floor: &Floor, config: &ConfigState) -> Self {
        let open_total = floor.registry.open_total();
        FloorResponse {
            store_name: config.store_name.clone(),
            mode: floor.registry.mode(),
            active_table_id: floor.registry.active_table_id().map(str::to_string),
            tables: floor.registry.tables().to_vec(),
            occupied_count: floor.registry.occupied_count(),
            open_total,
            open_total_display: config.format_money(open_total),
        }
    }
}

pub fn get_floor(floor: &FloorState, config: &ConfigState) -> Result<FloorResponse, ApiError> {
    debug!("get_floor command");
    floor.with_floor(|f| FloorResponse::build(f, config))
}

/// Edit / Order toggle.
///
/// Entering edit mode closes an open billing dialog; orders are kept.
pub fn set_mode(
    floor: &FloorState,
    config: &ConfigState,
    mode: FloorMode,
) -> Result<FloorResponse, ApiError> {
    debug!(mode = %mode, "set_mode command");
    floor.with_floor_mut(|f| {
        if mode == FloorMode::Edit {
            f.billing.cancel();
        }
        f.registry.set_mode(mode);
        FloorResponse::build(f, config)
    })
}

/// Click on a table card in order mode.
pub fn select_table(floor: &FloorState, table_id: &str) -> Result<Table, ApiError> {
    debug!(table_id, "select_table command");
    floor.with_floor_mut(|f| f.registry.select_table(table_id).cloned())?
        .map_err(ApiError::from)
}

/// Drop of a dragged table card in edit mode.
pub fn move_table(floor: &FloorState, table_id: &str, x: f64, y: f64) -> Result<Table, ApiError> {
    debug!(table_id, x, y, "move_table command");
    floor.with_floor_mut(|f| {
        f.registry.update_position(table_id, Position::new(x, y))?;
        f.registry.table(table_id).cloned()
    })?
    .map_err(ApiError::from)
}

/// "Save Layout": hands the table positions to persistence as JSON.
pub fn save_layout(floor: &FloorState) -> Result<String, ApiError> {
    let layout = floor.with_floor(|f| f.registry.layout())?;
    let json = layout
        .to_json()
        .map_err(|e| ApiError::internal(format!("Failed to serialize layout: {}", e)))?;

    info!(tables = layout.tables.len(), "layout saved");
    debug!(layout = %json, "layout snapshot");
    Ok(json)
}
