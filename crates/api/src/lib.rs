//! HTTP API: configuration, routing, CORS and request/response mapping.

pub mod app;
pub mod config;
pub mod middleware;
