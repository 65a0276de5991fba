//! Gold spot price caching with TTL and fallback.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use kilinc_core::Clock;

use super::source::SpotPriceSource;

/// Configuration for the spot price cache.
#[derive(Debug, Clone)]
pub struct SpotPriceConfig {
    /// How long a resolved price is served before sources are asked again.
    pub ttl: Duration,
    /// Per-request timeout for each remote source.
    pub request_timeout: StdDuration,
    /// Price used (and cached) when every source fails.
    pub fallback_usd_per_gram: f64,
}

impl Default for SpotPriceConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::seconds(300),
            request_timeout: StdDuration::from_secs(10),
            fallback_usd_per_gram: 80.0,
        }
    }
}

/// Where a cached price came from.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteOrigin {
    /// Name of the source that answered.
    Live(String),
    Fallback,
}

impl QuoteOrigin {
    /// Source name, or `"fallback"`.
    pub fn label(&self) -> &str {
        match self {
            QuoteOrigin::Live(source) => source,
            QuoteOrigin::Fallback => "fallback",
        }
    }
}

/// A resolved spot price.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotQuote {
    pub usd_per_gram: f64,
    pub fetched_at: DateTime<Utc>,
    pub origin: QuoteOrigin,
}

/// Process-wide spot price cache.
///
/// Reads inside the TTL never touch the network. After expiry, the first
/// reader walks the sources in order; concurrent readers wait for that refresh
/// instead of issuing their own calls.
pub struct SpotPriceCache {
    sources: Vec<Arc<dyn SpotPriceSource>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    fallback_usd_per_gram: f64,
    entry: RwLock<Option<SpotQuote>>,
    refresh: Mutex<()>,
}

impl SpotPriceCache {
    /// Sources are tried in the given order.
    pub fn new(
        sources: Vec<Arc<dyn SpotPriceSource>>,
        clock: Arc<dyn Clock>,
        config: &SpotPriceConfig,
    ) -> Self {
        Self {
            sources,
            clock,
            ttl: config.ttl,
            fallback_usd_per_gram: config.fallback_usd_per_gram,
            entry: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    /// Current price in USD per gram. Never fails.
    pub async fn spot_price(&self) -> f64 {
        self.quote().await.usd_per_gram
    }

    /// Current quote, refreshing it first if it is missing or expired.
    pub async fn quote(&self) -> SpotQuote {
        if let Some(quote) = self.fresh() {
            debug!(usd_per_gram = quote.usd_per_gram, "spot price cache hit");
            return quote;
        }

        let _guard = self.refresh.lock().await;

        // Someone else may have refreshed while we waited.
        if let Some(quote) = self.fresh() {
            return quote;
        }

        let quote = self.resolve().await;
        *self.entry.write().unwrap_or_else(PoisonError::into_inner) = Some(quote.clone());
        quote
    }

    /// Last stored quote, fresh or not, without refreshing.
    pub fn cached(&self) -> Option<SpotQuote> {
        self.entry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    fn fresh(&self) -> Option<SpotQuote> {
        let now = self.clock.now();
        self.entry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|quote| now.signed_duration_since(quote.fetched_at) < self.ttl)
            .cloned()
    }

    async fn resolve(&self) -> SpotQuote {
        let fetched_at = self.clock.now();

        for source in &self.sources {
            match source.fetch_usd_per_gram().await {
                Ok(usd_per_gram) => {
                    info!(source = source.name(), usd_per_gram, "spot price refreshed");
                    return SpotQuote {
                        usd_per_gram,
                        fetched_at,
                        origin: QuoteOrigin::Live(source.name().to_string()),
                    };
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "spot price source failed");
                }
            }
        }

        warn!(
            usd_per_gram = self.fallback_usd_per_gram,
            "all spot price sources failed; using fallback"
        );
        SpotQuote {
            usd_per_gram: self.fallback_usd_per_gram,
            fetched_at,
            origin: QuoteOrigin::Fallback,
        }
    }
}
