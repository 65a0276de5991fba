use kilinc_products::Product;

use super::r#trait::{CatalogProvider, CatalogResult};

/// Fixed product list.
///
/// Intended for tests/dev.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
}

impl InMemoryCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

impl CatalogProvider for InMemoryCatalog {
    fn load(&self) -> CatalogResult<Vec<Product>> {
        Ok(self.products.clone())
    }
}
