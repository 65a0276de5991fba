//! Products domain module.
//!
//! This crate contains the catalog rules: the raw product record, the pricing
//! engine that derives a USD price and a star rating from the gold spot price,
//! and the query pipeline (enrich, filter, sort). Everything here is
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod pricing;
pub mod product;
pub mod query;

pub use pricing::{compute_price, compute_rating, resolve_image};
pub use product::{Color, Product};
pub use query::{
    EnrichedProduct, PriceBounds, QueryCriteria, QueryResult, SortKey, SortOrder, SortSpec, enrich,
    query,
};
