use std::path::PathBuf;

use thiserror::Error;

use kilinc_products::Product;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document parsed but its top level is not an array.
    #[error("catalog must contain a list of products, found {found}")]
    NotAList { found: &'static str },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Supplies the raw product list for one request.
pub trait CatalogProvider: Send + Sync {
    fn load(&self) -> CatalogResult<Vec<Product>>;
}
