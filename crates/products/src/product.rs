use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use kilinc_core::{DomainError, DomainResult};

/// Catalog record as supplied by the catalog provider (read-only).
///
/// Every field is optional on the wire. Pricing treats a missing number as
/// zero; the raw values are echoed back unchanged in query responses.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub name: Option<String>,
    /// Weight in grams.
    #[serde(default)]
    pub weight: Option<f64>,
    /// Popularity in [0, 1].
    #[serde(default)]
    pub popularity_score: Option<f64>,
    /// Color variant → image URL. Kept as raw JSON: the key set is open and
    /// the provider does not guarantee an object here.
    #[serde(default)]
    pub images: Option<Value>,
}

impl Product {
    pub fn new(name: impl Into<String>, weight: f64, popularity_score: f64) -> Self {
        Self {
            name: Some(name.into()),
            weight: Some(weight),
            popularity_score: Some(popularity_score),
            images: None,
        }
    }

    pub fn with_images(mut self, images: Value) -> Self {
        self.images = Some(images);
        self
    }

    pub fn weight_or_zero(&self) -> f64 {
        self.weight.unwrap_or(0.0)
    }

    pub fn popularity_or_zero(&self) -> f64 {
        self.popularity_score.unwrap_or(0.0)
    }
}

/// Metal color variant a caller may prefer for the displayed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Yellow,
    White,
    Rose,
}

impl Color {
    pub const ALL: [Color; 3] = [Color::Yellow, Color::White, Color::Rose];

    /// Key used for this variant in a product's image map.
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Yellow => "yellow",
            Color::White => "white",
            Color::Rose => "rose",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s {
            "yellow" => Ok(Color::Yellow),
            "white" => Ok(Color::White),
            "rose" => Ok(Color::Rose),
            _ => Err(DomainError::validation(
                "color must be one of: yellow, white, rose",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_catalog_record() {
        let raw = json!({
            "name": "Engagement Ring 1",
            "popularityScore": 0.85,
            "weight": 2.1,
            "images": {
                "yellow": "https://cdn.example/ring1-y.jpg",
                "rose": "https://cdn.example/ring1-r.jpg",
                "white": "https://cdn.example/ring1-w.jpg"
            }
        });

        let product: Product = serde_json::from_value(raw).unwrap();
        assert_eq!(product.name.as_deref(), Some("Engagement Ring 1"));
        assert_eq!(product.weight, Some(2.1));
        assert_eq!(product.popularity_score, Some(0.85));

        // Insertion order of the image map is kept.
        let keys: Vec<&String> = product.images.as_ref().unwrap().as_object().unwrap().keys().collect();
        assert_eq!(keys, ["yellow", "rose", "white"]);
    }

    #[test]
    fn missing_fields_default_to_none() {
        let product: Product = serde_json::from_value(json!({})).unwrap();
        assert_eq!(product, Product::default());
        assert_eq!(product.weight_or_zero(), 0.0);
        assert_eq!(product.popularity_or_zero(), 0.0);
    }

    #[test]
    fn color_parses_only_known_variants() {
        for color in Color::ALL {
            assert_eq!(color.as_str().parse::<Color>().unwrap(), color);
        }

        assert!(matches!("Yellow".parse::<Color>(), Err(DomainError::Validation(_))));
        assert!("green".parse::<Color>().is_err());
        assert!("".parse::<Color>().is_err());
    }
}
