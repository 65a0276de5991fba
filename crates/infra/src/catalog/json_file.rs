use std::path::PathBuf;

use serde_json::Value;
use tracing::debug;

use kilinc_products::Product;

use super::r#trait::{CatalogError, CatalogProvider, CatalogResult};

/// Catalog stored as a JSON array on disk.
///
/// The file is re-read on every `load`, so edits show up without a restart.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogProvider for JsonFileCatalog {
    fn load(&self) -> CatalogResult<Vec<Product>> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })?;

        let products = parse_catalog(&raw)?;
        debug!(path = %self.path.display(), count = products.len(), "catalog loaded");
        Ok(products)
    }
}

/// Parse a catalog document. The top level must be an array.
pub fn parse_catalog(raw: &str) -> CatalogResult<Vec<Product>> {
    let document: Value = serde_json::from_str(raw)?;
    let found = json_kind(&document);
    match document {
        Value::Array(items) => Ok(items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Product>, _>>()?),
        _ => Err(CatalogError::NotAList { found }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
