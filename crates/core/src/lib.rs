//! `kilinc-core`: shared building blocks for the catalog service.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the domain error model and the clock abstraction used by time-based caches.

pub mod clock;
pub mod error;

pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "test-utils"))]
pub use clock::ManualClock;
pub use error::{DomainError, DomainResult};
