//! Query pipeline: enrich every product, filter by bounds, optionally sort.
//!
//! Inputs are already validated enums/numbers; parsing caller input happens
//! at the HTTP boundary through the `FromStr` impls below.

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use kilinc_core::{DomainError, DomainResult};

use crate::pricing::resolve_image;
use crate::product::{Color, Product};

/// Product projection returned to callers: raw fields plus computed ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedProduct {
    pub name: Option<String>,
    pub weight: Option<f64>,
    pub popularity_score: Option<f64>,
    pub rating: f64,
    #[serde(rename = "priceUSD")]
    pub price_usd: f64,
    pub image: Option<String>,
    pub images: Option<Value>,
}

impl EnrichedProduct {
    fn popularity_or_zero(&self) -> f64 {
        self.popularity_score.unwrap_or(0.0)
    }

    fn weight_or_zero(&self) -> f64 {
        self.weight.unwrap_or(0.0)
    }

    fn sort_name(&self) -> String {
        self.name.as_deref().unwrap_or_default().to_lowercase()
    }
}

/// Build the enriched projection of one product at the given spot price.
pub fn enrich(product: &Product, spot_price: f64, color: Option<Color>) -> EnrichedProduct {
    EnrichedProduct {
        name: product.name.clone(),
        weight: product.weight,
        popularity_score: product.popularity_score,
        rating: product.rating(),
        price_usd: product.price_usd(spot_price),
        image: resolve_image(product.images.as_ref(), color),
        images: product.images.clone(),
    }
}

/// Inclusive bounds on price and popularity. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceBounds {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_popularity: Option<f64>,
    pub max_popularity: Option<f64>,
}

impl PriceBounds {
    pub fn is_unbounded(&self) -> bool {
        *self == Self::default()
    }

    /// True iff the item satisfies every bound that is set.
    pub fn admits(&self, item: &EnrichedProduct) -> bool {
        let popularity = item.popularity_or_zero();

        self.min_price.is_none_or(|min| item.price_usd >= min)
            && self.max_price.is_none_or(|max| item.price_usd <= max)
            && self.min_popularity.is_none_or(|min| popularity >= min)
            && self.max_popularity.is_none_or(|max| popularity <= max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Price,
    Popularity,
    Weight,
    Name,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Price => "price",
            SortKey::Popularity => "popularity",
            SortKey::Weight => "weight",
            SortKey::Name => "name",
        }
    }

    fn compare(&self, a: &EnrichedProduct, b: &EnrichedProduct) -> Ordering {
        match self {
            SortKey::Price => a.price_usd.total_cmp(&b.price_usd),
            SortKey::Popularity => a.popularity_or_zero().total_cmp(&b.popularity_or_zero()),
            SortKey::Weight => a.weight_or_zero().total_cmp(&b.weight_or_zero()),
            SortKey::Name => a.sort_name().cmp(&b.sort_name()),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s {
            "price" => Ok(SortKey::Price),
            "popularity" => Ok(SortKey::Popularity),
            "weight" => Ok(SortKey::Weight),
            "name" => Ok(SortKey::Name),
            _ => Err(DomainError::validation(
                "sort must be one of: price, popularity, weight, name",
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(DomainError::validation("order must be one of: asc, desc")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    /// Stable sort. Descending reverses the comparison, not the result, so
    /// equal items keep catalog order in both directions.
    pub fn apply(&self, items: &mut [EnrichedProduct]) {
        items.sort_by(|a, b| {
            let ord = self.key.compare(a, b);
            match self.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
    }
}

/// Everything a caller can ask of the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QueryCriteria {
    pub filters: PriceBounds,
    pub sort: Option<SortSpec>,
    pub color: Option<Color>,
}

/// Pipeline output, including the spot price the prices were computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    #[serde(rename = "goldPriceUSDPerGram")]
    pub spot_price: f64,
    pub count: usize,
    pub items: Vec<EnrichedProduct>,
}

/// Enrich, filter and sort `products` at `spot_price`.
pub fn query(products: &[Product], spot_price: f64, criteria: &QueryCriteria) -> QueryResult {
    let mut items: Vec<EnrichedProduct> = products
        .iter()
        .map(|p| enrich(p, spot_price, criteria.color))
        .filter(|item| criteria.filters.admits(item))
        .collect();

    if let Some(sort) = criteria.sort {
        sort.apply(&mut items);
    }

    QueryResult {
        spot_price,
        count: items.len(),
        items,
    }
}
