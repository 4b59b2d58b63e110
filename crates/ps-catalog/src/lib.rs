//! ps-catalog: pump catalog file format and load-time validation.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{ValidationError, validate_catalog, validate_pump};

use std::path::Path;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported catalog format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validate a catalog and order every pump's curves largest diameter first.
pub fn prepare(mut catalog: Catalog) -> CatalogResult<Catalog> {
    validate_catalog(&catalog)?;
    for pump in &mut catalog.pumps {
        pump.curves.sort_by(|a, b| b.diameter.total_cmp(&a.diameter));
    }
    tracing::debug!(
        catalog = %catalog.name,
        pumps = catalog.pumps.len(),
        "catalog prepared"
    );
    Ok(catalog)
}

pub fn load_yaml(path: &Path) -> CatalogResult<Catalog> {
    let content = std::fs::read_to_string(path)?;
    let catalog: Catalog = serde_yaml::from_str(&content)?;
    prepare(catalog)
}

pub fn load_json(path: &Path) -> CatalogResult<Catalog> {
    let content = std::fs::read_to_string(path)?;
    let catalog: Catalog = serde_json::from_str(&content)?;
    prepare(catalog)
}

/// Load a catalog, picking the parser from the file extension.
pub fn load(path: &Path) -> CatalogResult<Catalog> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match extension.as_str() {
        "yaml" | "yml" => load_yaml(path),
        "json" => load_json(path),
        _ => Err(CatalogError::UnsupportedFormat { extension }),
    }
}
