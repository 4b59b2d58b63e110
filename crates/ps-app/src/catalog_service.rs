//! Catalog and configuration loading, pump listing.

use crate::error::{AppError, AppResult};
use ps_catalog::Catalog;
use ps_engine::{OperationMode, SelectionConfig};
use std::path::Path;

/// One line of a catalog listing.
#[derive(Debug, Clone, PartialEq)]
pub struct PumpSummary {
    pub code: String,
    pub manufacturer: String,
    pub pump_type: String,
    pub mode: OperationMode,
    pub bep_flow: Option<f64>,
    pub bep_head: Option<f64>,
    pub curve_count: usize,
    pub largest_diameter: Option<f64>,
    /// Reference curve carries power and NPSH-required columns.
    pub has_power: bool,
    pub has_npsh: bool,
}

/// Load and validate a catalog from YAML or JSON.
pub fn load_catalog(path: &Path) -> AppResult<Catalog> {
    let catalog = ps_catalog::load(path)?;
    tracing::info!(
        path = %path.display(),
        pumps = catalog.pumps.len(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// Load a selection configuration. Unnamed fields keep their defaults.
pub fn load_config(path: &Path) -> AppResult<SelectionConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let config: SelectionConfig = match ext.as_deref() {
        Some("json") => serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config JSON: {}", e)))?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config YAML: {}", e)))?,
        other => {
            return Err(AppError::Config(format!(
                "Unsupported config extension: {}",
                other.unwrap_or("<none>")
            )));
        }
    };

    config.validate()?;
    Ok(config)
}

pub fn list_pumps(catalog: &Catalog) -> Vec<PumpSummary> {
    catalog
        .pumps
        .iter()
        .map(|p| PumpSummary {
            code: p.code.clone(),
            manufacturer: p.manufacturer.clone(),
            pump_type: p.pump_type.clone(),
            mode: OperationMode::from_capabilities(p.variable_speed, p.variable_diameter),
            bep_flow: p.bep_flow,
            bep_head: p.bep_head,
            curve_count: p.curves.len(),
            largest_diameter: p.reference_curve().map(|c| c.diameter),
            has_power: p.reference_curve().is_some_and(|c| c.has_power()),
            has_npsh: p.reference_curve().is_some_and(|c| c.has_npsh()),
        })
        .collect()
}
