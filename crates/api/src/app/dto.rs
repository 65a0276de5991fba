use std::str::FromStr;

use axum::response::Response;
use serde::Deserialize;

use kilinc_core::DomainError;
use kilinc_products::{Color, PriceBounds, QueryCriteria, SortKey, SortOrder, SortSpec};

use crate::app::errors;

/// Raw `GET /api/products` query string.
///
/// Everything arrives as text so that a bad value is reported by name instead
/// of as a generic extractor rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQueryParams {
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_popularity: Option<String>,
    pub max_popularity: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub color: Option<String>,
}

impl ProductQueryParams {
    pub fn into_criteria(self) -> Result<QueryCriteria, Response> {
        let filters = PriceBounds {
            min_price: parse_number("minPrice", self.min_price.as_deref())?,
            max_price: parse_number("maxPrice", self.max_price.as_deref())?,
            min_popularity: parse_number("minPopularity", self.min_popularity.as_deref())?,
            max_popularity: parse_number("maxPopularity", self.max_popularity.as_deref())?,
        };

        // `order` is checked even when no sort key is given.
        let order = parse_enum::<SortOrder>("order", self.order.as_deref())?.unwrap_or_default();
        let sort = parse_enum::<SortKey>("sort", self.sort.as_deref())?
            .map(|key| SortSpec::new(key, order));
        let color = parse_enum::<Color>("color", self.color.as_deref())?;

        Ok(QueryCriteria { filters, sort, color })
    }
}

fn parse_number(parameter: &'static str, raw: Option<&str>) -> Result<Option<f64>, Response> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(errors::invalid_query(
            parameter,
            format!("{parameter} must be a finite number, got {raw:?}"),
        )),
    }
}

fn parse_enum<T>(parameter: &'static str, raw: Option<&str>) -> Result<Option<T>, Response>
where
    T: FromStr<Err = DomainError>,
{
    raw.map(|raw| {
        raw.parse::<T>()
            .map_err(|DomainError::Validation(msg)| errors::invalid_query(parameter, msg))
    })
    .transpose()
}
