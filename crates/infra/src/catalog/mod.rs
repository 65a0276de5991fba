//! Catalog provider boundary.
//!
//! The query pipeline only needs "the current list of products"; where it
//! comes from (a JSON file on disk, a fixed list in tests) stays behind
//! `CatalogProvider`.

pub mod in_memory;
pub mod json_file;
pub mod r#trait;

pub use in_memory::InMemoryCatalog;
pub use json_file::JsonFileCatalog;
pub use r#trait::{CatalogError, CatalogProvider, CatalogResult};
