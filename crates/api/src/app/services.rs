use std::sync::Arc;

use kilinc_core::SystemClock;
use kilinc_infra::catalog::{CatalogProvider, CatalogResult, JsonFileCatalog};
use kilinc_infra::spot_price::{self, SpotPriceCache};
use kilinc_products::{QueryCriteria, QueryResult, query};

use crate::config::AppConfig;

/// Process-wide collaborators shared by every handler.
pub struct AppServices {
    pub catalog: Arc<dyn CatalogProvider>,
    pub spot_prices: Arc<SpotPriceCache>,
}

impl AppServices {
    pub fn new(catalog: Arc<dyn CatalogProvider>, spot_prices: Arc<SpotPriceCache>) -> Self {
        Self {
            catalog,
            spot_prices,
        }
    }

    /// Load the catalog, then price and query it at the current spot price.
    ///
    /// A broken catalog fails before any spot price lookup.
    pub async fn query_products(&self, criteria: &QueryCriteria) -> CatalogResult<QueryResult> {
        let products = self.catalog.load()?;
        let quote = self.spot_prices.quote().await;

        let result = query(&products, quote.usd_per_gram, criteria);
        tracing::debug!(
            spot_origin = quote.origin.label(),
            spot_fetched_at = %quote.fetched_at,
            catalog = products.len(),
            matched = result.count,
            filtered = !criteria.filters.is_unbounded(),
            sort = ?criteria.sort,
            "products queried"
        );
        Ok(result)
    }
}

/// Production wiring: JSON file catalog, goldapi + metals-api behind the cache.
pub fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let client = spot_price::http_client(&config.spot_price)?;
    let sources = spot_price::default_sources(&client, config.gold_api_key.as_deref());
    if config.gold_api_key.is_none() {
        tracing::warn!("GOLD_API_KEY not set; goldapi requests will be unauthenticated");
    }

    let spot_prices = SpotPriceCache::new(sources, Arc::new(SystemClock), &config.spot_price);
    tracing::info!(
        sources = ?spot_prices.source_names(),
        ttl_secs = config.spot_price.ttl.num_seconds(),
        fallback_usd_per_gram = config.spot_price.fallback_usd_per_gram,
        "spot price cache ready"
    );

    let catalog = JsonFileCatalog::new(config.products_path.clone());
    tracing::info!(path = %config.products_path.display(), "serving catalog from file");

    Ok(AppServices::new(Arc::new(catalog), Arc::new(spot_prices)))
}
