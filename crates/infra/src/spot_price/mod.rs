//! Gold spot price: remote sources and the TTL cache in front of them.
//!
//! Sources are capability-typed: an `HttpSpotSource` pairs an endpoint with
//! the `QuoteShape` that reads its body, so adding or removing a provider is a
//! change to the list built in `default_sources`, not to the cache.

pub mod cache;
pub mod source;

use std::sync::Arc;

use reqwest::Client;

pub use cache::{QuoteOrigin, SpotPriceCache, SpotPriceConfig, SpotQuote};
pub use source::{
    HttpSpotSource, OUNCE_TO_GRAM, PriceField, QuoteShape, SpotPriceError, SpotPriceResult,
    SpotPriceSource, SymbolRate, normalize_symbol_rate,
};

/// goldapi.io: `{"price": <USD per ounce>, ...}`.
pub const GOLDAPI_URL: &str = "https://www.goldapi.io/api/XAU/USD";

/// metals-api: `{"rates": {"XAU": <rate>}, ...}`.
pub const METALS_API_URL: &str = "https://metals-api.com/api/latest?base=USD&symbols=XAU";

/// Shared HTTP client for all sources; `config.request_timeout` bounds every call.
pub fn http_client(config: &SpotPriceConfig) -> SpotPriceResult<Client> {
    Ok(Client::builder().timeout(config.request_timeout).build()?)
}

/// Production source list, in priority order: goldapi.io, then metals-api.
///
/// The goldapi access token is only sent when a key is configured.
pub fn default_sources(client: &Client, gold_api_key: Option<&str>) -> Vec<Arc<dyn SpotPriceSource>> {
    let mut goldapi = HttpSpotSource::new("goldapi", client.clone(), GOLDAPI_URL, PriceField::new("price"));
    if let Some(key) = gold_api_key {
        goldapi = goldapi.with_header("x-access-token", key);
    }

    let goldapi: Arc<dyn SpotPriceSource> = Arc::new(goldapi);
    let metals_api: Arc<dyn SpotPriceSource> = Arc::new(HttpSpotSource::new(
        "metals-api",
        client.clone(),
        METALS_API_URL,
        SymbolRate::new("XAU"),
    ));

    vec![goldapi, metals_api]
}
