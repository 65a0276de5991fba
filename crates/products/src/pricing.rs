//! Pricing engine: USD price, star rating and display image for a product.
//!
//! Pure functions, no IO. The spot price is always USD per gram of gold.

use serde_json::Value;

use crate::product::{Color, Product};

/// Image key used when the caller has no preference (or it is missing).
const DEFAULT_IMAGE_KEY: &str = "yellow";

/// Highest star rating.
pub const MAX_RATING: f64 = 5.0;

/// `(popularity + 1) * weight * spot`, rounded to cents.
pub fn compute_price(popularity_score: f64, weight: f64, spot_price: f64) -> f64 {
    round_to((popularity_score + 1.0) * weight * spot_price, 2)
}

/// Popularity clamped to [0, 1], scaled to a 0-5 star rating with one decimal.
pub fn compute_rating(popularity_score: f64) -> f64 {
    round_to(popularity_score.clamp(0.0, 1.0) * MAX_RATING, 1)
}

/// Pick the image URL to display for a product.
///
/// Order: the preferred color if present, then a non-empty `yellow`, then the
/// first entry of the map. Anything that is not a JSON object yields `None`,
/// and entries whose value is not a string are skipped.
pub fn resolve_image(images: Option<&Value>, preference: Option<Color>) -> Option<String> {
    let images = images?.as_object()?;
    let lookup = |key: &str| images.get(key).and_then(Value::as_str);

    preference
        .and_then(|color| lookup(color.as_str()))
        .or_else(|| lookup(DEFAULT_IMAGE_KEY).filter(|url| !url.is_empty()))
        .or_else(|| images.values().find_map(Value::as_str))
        .map(str::to_owned)
}

impl Product {
    /// Price of this product at `spot_price`, missing numbers counting as zero.
    pub fn price_usd(&self, spot_price: f64) -> f64 {
        compute_price(self.popularity_or_zero(), self.weight_or_zero(), spot_price)
    }

    pub fn rating(&self) -> f64 {
        compute_rating(self.popularity_or_zero())
    }
}

/// Decimal rounding of the exact binary value, ties to even.
///
/// Scaling by `10^decimals` first would round twice: 2.675 (really
/// 2.67499...) scales to exactly 267.5 and would come out as 2.68.
fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}
