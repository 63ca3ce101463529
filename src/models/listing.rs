//! Listing record data structure.

use serde::{Deserialize, Serialize};

/// One apartment listing as extracted from its detail page.
///
/// Only `url` is guaranteed; every other field degrades to `None` when the
/// page layout does not yield it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ListingRecord {
    pub url: String,
    pub title: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub neighborhood: Option<String>,
    /// Living area in square meters
    pub size: Option<f64>,
    pub rooms: Option<u32>,
    /// Monthly price in EUR
    pub price: Option<f64>,
    pub price_per_sqm: Option<f64>,
    pub description: Option<String>,
}

impl ListingRecord {
    /// Create an empty record for a listing URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Recompute `price_per_sqm` from the current price and size.
    pub fn derive_price_per_sqm(&mut self) {
        self.price_per_sqm = price_per_sqm(self.price, self.size);
    }
}

/// `round(price / size, 2)` when both are present and `size > 0`.
///
/// Exact halves round to even: `1608 / 64 = 25.125` gives `25.12`.
pub fn price_per_sqm(price: Option<f64>, size: Option<f64>) -> Option<f64> {
    match (price, size) {
        (Some(price), Some(size)) if size > 0.0 => Some(round2(price / size)),
        _ => None,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
