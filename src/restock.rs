use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::{error, warn};

use crate::util::write_file;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub item: String,
    pub stock: f64,
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestockLine {
    pub item: String,
    pub current_stock: f64,
    pub recent_sales: f64,
    pub restock: bool,
    pub recommended_order: f64,
}

/// An item needs restocking when stock < sales * multiplier.
pub fn plan_restock(items: &[InventoryItem], multiplier: f64) -> Vec<RestockLine> {
    items
        .iter()
        .map(|it| {
            let target = it.sales * multiplier;
            let restock = it.stock < target;
            RestockLine {
                item: it.item.clone(),
                current_stock: it.stock,
                recent_sales: it.sales,
                restock,
                recommended_order: if restock { target - it.stock } else { 0.0 },
            }
        })
        .collect()
}

/// Missing or malformed input degrades to an empty inventory; malformed
/// items are skipped one at a time.
pub fn load_inventory(path: &Path) -> Vec<InventoryItem> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            error!("inventory file {} unreadable: {err}", path.display());
            return Vec::new();
        }
    };
    let values: Vec<Value> = match serde_json::from_str(&raw) {
        Ok(values) => values,
        Err(err) => {
            error!("inventory file {} contains invalid JSON: {err}", path.display());
            return Vec::new();
        }
    };
    values
        .into_iter()
        .enumerate()
        .filter_map(|(i, v)| match serde_json::from_value::<InventoryItem>(v) {
            Ok(item) => Some(item),
            Err(err) => {
                warn!("skipping inventory item {i} in {}: {err}", path.display());
                None
            }
        })
        .collect()
}

pub fn save_plan(path: &Path, lines: &[RestockLine]) -> Result<()> {
    write_file(path, &serde_json::to_string_pretty(lines)?)
}
