use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration as StdDuration;

use anyhow::{Context, bail};
use chrono::Duration;

use kilinc_infra::spot_price::SpotPriceConfig;
use kilinc_observability::LogFormat;

/// Origins allowed by default: local Vite dev servers and the production frontend.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "http://localhost:5174",
    "http://127.0.0.1:5174",
    "https://kilinc-api-frontend.onrender.com",
];

/// Any `https://<sub>.onrender.com` origin is trusted by default.
pub const DEFAULT_TRUSTED_DOMAIN: &str = "onrender.com";

#[derive(Clone, Debug, PartialEq)]
pub struct CorsConfig {
    /// Exact origins, compared byte for byte.
    pub allowed_origins: Vec<String>,
    /// Hosting domain whose HTTPS subdomains are all allowed.
    pub trusted_domain: Option<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
            trusted_domain: Some(DEFAULT_TRUSTED_DOMAIN.to_string()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub listen_addr: SocketAddr,

    /// JSON file holding the product list.
    pub products_path: PathBuf,

    pub cors: CorsConfig,

    /// Directory containing the `avenir/` and `montserrat/` font folders.
    pub fonts_dir: PathBuf,

    pub log_format: LogFormat,

    /// goldapi.io access token. Without it the request is still attempted.
    pub gold_api_key: Option<String>,

    pub spot_price: SpotPriceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            products_path: PathBuf::from("products.json"),
            cors: CorsConfig::default(),
            fonts_dir: PathBuf::from("."),
            log_format: LogFormat::default(),
            gold_api_key: None,
            spot_price: SpotPriceConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut cfg = Self::default();

        if let Some(addr) = var("KILINC_LISTEN_ADDR") {
            cfg.listen_addr = addr
                .parse()
                .with_context(|| format!("invalid KILINC_LISTEN_ADDR {addr:?}"))?;
        }
        if let Some(path) = var("KILINC_PRODUCTS_PATH") {
            cfg.products_path = PathBuf::from(path);
        }
        if let Some(origins) = var("KILINC_CORS_ALLOW_ORIGINS") {
            cfg.cors.allowed_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        if let Some(domain) = lookup("KILINC_CORS_TRUSTED_DOMAIN") {
            // Set but empty disables subdomain matching.
            let domain = domain.trim().trim_start_matches('.').to_string();
            cfg.cors.trusted_domain = (!domain.is_empty()).then_some(domain);
        }
        if let Some(dir) = var("KILINC_FONTS_DIR") {
            cfg.fonts_dir = PathBuf::from(dir);
        }
        if let Some(format) = var("KILINC_LOG_FORMAT") {
            cfg.log_format = format.parse().context("invalid KILINC_LOG_FORMAT")?;
        }
        cfg.gold_api_key = var("GOLD_API_KEY");

        if let Some(secs) = var("KILINC_SPOT_TTL_SECS") {
            let secs: u32 = secs
                .parse()
                .with_context(|| format!("invalid KILINC_SPOT_TTL_SECS {secs:?}"))?;
            cfg.spot_price.ttl = Duration::seconds(i64::from(secs));
        }
        if let Some(secs) = var("KILINC_SPOT_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("invalid KILINC_SPOT_TIMEOUT_SECS {secs:?}"))?;
            if secs == 0 {
                bail!("KILINC_SPOT_TIMEOUT_SECS must be at least 1");
            }
            cfg.spot_price.request_timeout = StdDuration::from_secs(secs);
        }
        if let Some(price) = var("KILINC_SPOT_FALLBACK_USD_PER_GRAM") {
            let price: f64 = price
                .parse()
                .with_context(|| format!("invalid KILINC_SPOT_FALLBACK_USD_PER_GRAM {price:?}"))?;
            if !(price.is_finite() && price > 0.0) {
                bail!("KILINC_SPOT_FALLBACK_USD_PER_GRAM must be a positive number");
            }
            cfg.spot_price.fallback_usd_per_gram = price;
        }

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_service_contract() {
        let cfg = from_pairs(&[]).unwrap();
        assert_eq!(cfg.listen_addr.port(), 8000);
        assert_eq!(cfg.products_path, PathBuf::from("products.json"));
        assert_eq!(cfg.cors, CorsConfig::default());
        assert_eq!(cfg.cors.allowed_origins.len(), 5);
        assert_eq!(cfg.cors.trusted_domain.as_deref(), Some("onrender.com"));
        assert_eq!(cfg.spot_price.ttl, Duration::seconds(300));
        assert_eq!(cfg.spot_price.request_timeout, StdDuration::from_secs(10));
        assert_eq!(cfg.spot_price.fallback_usd_per_gram, 80.0);
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert!(cfg.gold_api_key.is_none());
    }

    #[test]
    fn reads_overrides() {
        let cfg = from_pairs(&[
            ("KILINC_LISTEN_ADDR", "127.0.0.1:9100"),
            ("KILINC_PRODUCTS_PATH", "/srv/catalog/products.json"),
            ("KILINC_CORS_ALLOW_ORIGINS", "https://shop.example, http://localhost:3000,"),
            ("KILINC_CORS_TRUSTED_DOMAIN", ".pages.dev"),
            ("KILINC_LOG_FORMAT", "pretty"),
            ("GOLD_API_KEY", "goldapi-123"),
            ("KILINC_SPOT_TTL_SECS", "60"),
            ("KILINC_SPOT_TIMEOUT_SECS", "3"),
            ("KILINC_SPOT_FALLBACK_USD_PER_GRAM", "72.5"),
        ])
        .unwrap();

        assert_eq!(cfg.listen_addr, "127.0.0.1:9100".parse().unwrap());
        assert_eq!(cfg.products_path, PathBuf::from("/srv/catalog/products.json"));
        assert_eq!(
            cfg.cors.allowed_origins,
            ["https://shop.example", "http://localhost:3000"]
        );
        assert_eq!(cfg.cors.trusted_domain.as_deref(), Some("pages.dev"));
        assert_eq!(cfg.log_format, LogFormat::Pretty);
        assert_eq!(cfg.gold_api_key.as_deref(), Some("goldapi-123"));
        assert_eq!(cfg.spot_price.ttl, Duration::seconds(60));
        assert_eq!(cfg.spot_price.request_timeout, StdDuration::from_secs(3));
        assert_eq!(cfg.spot_price.fallback_usd_per_gram, 72.5);
    }

    #[test]
    fn empty_trusted_domain_disables_wildcard() {
        let cfg = from_pairs(&[("KILINC_CORS_TRUSTED_DOMAIN", "")]).unwrap();
        assert!(cfg.cors.trusted_domain.is_none());
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(from_pairs(&[("KILINC_LISTEN_ADDR", "localhost")]).is_err());
        assert!(from_pairs(&[("KILINC_SPOT_TTL_SECS", "-5")]).is_err());
        assert!(from_pairs(&[("KILINC_SPOT_TIMEOUT_SECS", "0")]).is_err());
        assert!(from_pairs(&[("KILINC_SPOT_FALLBACK_USD_PER_GRAM", "NaN")]).is_err());
        assert!(from_pairs(&[("KILINC_LOG_FORMAT", "xml")]).is_err());
    }
}
