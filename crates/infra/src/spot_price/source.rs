use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

/// Grams in one troy ounce.
pub const OUNCE_TO_GRAM: f64 = 31.1034768;

#[derive(Debug, Error)]
pub enum SpotPriceError {
    /// Transport failure, timeout, non-success status or unreadable body.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response parsed but did not have the expected shape.
    #[error("missing field: {0}")]
    MissingField(String),

    /// The field was present but not a usable price.
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

pub type SpotPriceResult<T> = Result<T, SpotPriceError>;

/// One remote source of the gold spot price.
#[async_trait]
pub trait SpotPriceSource: Send + Sync {
    /// Short name used in logs and in `QuoteOrigin::Live`.
    fn name(&self) -> &str;

    /// Current price in USD per gram.
    async fn fetch_usd_per_gram(&self) -> SpotPriceResult<f64>;
}

/// Knows how to read USD per troy ounce out of one provider's response body.
pub trait QuoteShape: Send + Sync {
    fn usd_per_ounce(&self, body: &Value) -> SpotPriceResult<f64>;
}

/// Top-level numeric field holding USD per ounce, e.g. `{"price": 2419.04}`.
#[derive(Debug, Clone)]
pub struct PriceField {
    field: String,
}

impl PriceField {
    pub fn new(field: impl Into<String>) -> Self {
        Self { field: field.into() }
    }
}

impl QuoteShape for PriceField {
    fn usd_per_ounce(&self, body: &Value) -> SpotPriceResult<f64> {
        let raw = body
            .get(&self.field)
            .ok_or_else(|| SpotPriceError::MissingField(self.field.clone()))?;
        let price = raw.as_f64().ok_or_else(|| invalid(&self.field, raw))?;
        ensure_positive(&self.field, price)
    }
}

/// Rate keyed by commodity symbol, e.g. `{"rates": {"XAU": 0.00041}}`.
///
/// The provider does not say whether the rate is ounces per dollar or dollars
/// per ounce; values below 1 are read as ounces per dollar and inverted.
#[derive(Debug, Clone)]
pub struct SymbolRate {
    symbol: String,
}

impl SymbolRate {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self { symbol: symbol.into() }
    }
}

impl QuoteShape for SymbolRate {
    fn usd_per_ounce(&self, body: &Value) -> SpotPriceResult<f64> {
        let field = format!("rates.{}", self.symbol);
        let raw = body
            .get("rates")
            .and_then(Value::as_object)
            .and_then(|rates| rates.get(&self.symbol))
            .ok_or_else(|| SpotPriceError::MissingField(field.clone()))?;

        let rate = raw
            .as_f64()
            .or_else(|| raw.as_str().and_then(|s| s.trim().parse().ok()))
            .ok_or_else(|| invalid(&field, raw))?;
        let rate = ensure_positive(&field, rate)?;

        Ok(normalize_symbol_rate(rate))
    }
}

/// `rate < 1` is taken as ounces per USD and inverted; otherwise USD per ounce.
// TODO: confirm the metals-api XAU convention against a live response and drop
// the guess once it is known.
pub fn normalize_symbol_rate(rate: f64) -> f64 {
    if rate < 1.0 { 1.0 / rate } else { rate }
}

fn ensure_positive(field: &str, value: f64) -> SpotPriceResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SpotPriceError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}

fn invalid(field: &str, raw: &Value) -> SpotPriceError {
    SpotPriceError::InvalidValue {
        field: field.to_string(),
        value: raw.to_string(),
    }
}

/// HTTP GET source whose response body is read with a `QuoteShape`.
#[derive(Debug, Clone)]
pub struct HttpSpotSource<S> {
    name: String,
    client: Client,
    url: String,
    headers: Vec<(String, String)>,
    shape: S,
}

impl<S: QuoteShape> HttpSpotSource<S> {
    /// The client carries the request timeout.
    pub fn new(name: impl Into<String>, client: Client, url: impl Into<String>, shape: S) -> Self {
        Self {
            name: name.into(),
            client,
            url: url.into(),
            headers: Vec::new(),
            shape,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[async_trait]
impl<S: QuoteShape> SpotPriceSource for HttpSpotSource<S> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_usd_per_gram(&self) -> SpotPriceResult<f64> {
        let mut request = self.client.get(&self.url);
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let body: Value = request.send().await?.error_for_status()?.json().await?;
        let per_ounce = self.shape.usd_per_ounce(&body)?;

        Ok(per_ounce / OUNCE_TO_GRAM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn price_field_reads_top_level_number() {
        let shape = PriceField::new("price");
        assert_eq!(shape.usd_per_ounce(&json!({"price": 2419.04, "currency": "USD"})).unwrap(), 2419.04);
        assert_eq!(shape.usd_per_ounce(&json!({"price": 2400})).unwrap(), 2400.0);
    }

    #[test]
    fn price_field_rejects_missing_or_bad_values() {
        let shape = PriceField::new("price");
        assert!(matches!(
            shape.usd_per_ounce(&json!({"rates": {"XAU": 0.0004}})),
            Err(SpotPriceError::MissingField(f)) if f == "price"
        ));
        assert!(matches!(
            shape.usd_per_ounce(&json!({"price": "2400"})),
            Err(SpotPriceError::InvalidValue { .. })
        ));
        assert!(shape.usd_per_ounce(&json!({"price": 0})).is_err());
        assert!(shape.usd_per_ounce(&json!({"price": -5.0})).is_err());
        assert!(shape.usd_per_ounce(&json!([1, 2])).is_err());
    }

    #[test]
    fn symbol_rate_inverts_small_rates() {
        let shape = SymbolRate::new("XAU");
        let per_ounce = shape.usd_per_ounce(&json!({"rates": {"XAU": 0.0005}})).unwrap();
        assert!((per_ounce - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn symbol_rate_keeps_large_rates() {
        let shape = SymbolRate::new("XAU");
        assert_eq!(shape.usd_per_ounce(&json!({"rates": {"XAU": 2350.5}})).unwrap(), 2350.5);
        assert_eq!(shape.usd_per_ounce(&json!({"rates": {"XAU": 1.0}})).unwrap(), 1.0);
        assert_eq!(shape.usd_per_ounce(&json!({"rates": {"XAU": "2350.5"}})).unwrap(), 2350.5);
    }

    #[test]
    fn symbol_rate_rejects_missing_or_zero() {
        let shape = SymbolRate::new("XAU");
        assert!(matches!(
            shape.usd_per_ounce(&json!({"rates": {"XAG": 0.03}})),
            Err(SpotPriceError::MissingField(f)) if f == "rates.XAU"
        ));
        assert!(shape.usd_per_ounce(&json!({"rates": []})).is_err());
        assert!(shape.usd_per_ounce(&json!({"success": false})).is_err());
        assert!(matches!(
            shape.usd_per_ounce(&json!({"rates": {"XAU": 0}})),
            Err(SpotPriceError::InvalidValue { .. })
        ));
    }

    #[test]
    fn normalize_is_identity_at_and_above_one() {
        assert_eq!(normalize_symbol_rate(1.0), 1.0);
        assert_eq!(normalize_symbol_rate(2000.0), 2000.0);
        assert_eq!(normalize_symbol_rate(0.5), 2.0);
    }

    mod http {
        use super::*;
        use axum::{Json, Router, http::HeaderMap, http::StatusCode, routing::get};
        use std::time::Duration;

        async fn serve(app: Router) -> String {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });
            format!("http://{addr}")
        }

        fn client() -> Client {
            Client::builder().timeout(Duration::from_millis(500)).build().unwrap()
        }

        #[tokio::test]
        async fn converts_ounce_price_to_grams_and_sends_headers() {
            let app = Router::new().route(
                "/api/XAU/USD",
                get(|headers: HeaderMap| async move {
                    match headers.get("x-access-token").and_then(|v| v.to_str().ok()) {
                        Some("secret") => Ok(Json(json!({"price": OUNCE_TO_GRAM * 75.0}))),
                        _ => Err(StatusCode::FORBIDDEN),
                    }
                }),
            );
            let base = serve(app).await;

            let source = HttpSpotSource::new("goldapi", client(), format!("{base}/api/XAU/USD"), PriceField::new("price"))
                .with_header("x-access-token", "secret");
            let per_gram = source.fetch_usd_per_gram().await.unwrap();
            assert!((per_gram - 75.0).abs() < 1e-9);

            let unauthenticated =
                HttpSpotSource::new("goldapi", client(), format!("{base}/api/XAU/USD"), PriceField::new("price"));
            assert!(matches!(
                unauthenticated.fetch_usd_per_gram().await,
                Err(SpotPriceError::Http(_))
            ));
        }

        #[tokio::test]
        async fn non_json_body_is_an_error() {
            let app = Router::new().route("/latest", get(|| async { "<html>maintenance</html>" }));
            let base = serve(app).await;

            let source = HttpSpotSource::new("metals-api", client(), format!("{base}/latest"), SymbolRate::new("XAU"));
            assert!(matches!(source.fetch_usd_per_gram().await, Err(SpotPriceError::Http(_))));
        }

        #[tokio::test]
        async fn slow_source_times_out() {
            let app = Router::new().route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Json(json!({"price": 2400.0}))
                }),
            );
            let base = serve(app).await;

            let source = HttpSpotSource::new("slow", client(), format!("{base}/slow"), PriceField::new("price"));
            let err = source.fetch_usd_per_gram().await.unwrap_err();
            match err {
                SpotPriceError::Http(e) => assert!(e.is_timeout()),
                other => panic!("expected timeout, got {other:?}"),
            }
        }
    }
}
