//! Nearby-market records from the proximity provider.

use serde::{Deserialize, Serialize};

/// A nearby mandi with its distance and current quote.
///
/// Informational only: nothing in the pipeline derives these values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MandiOption {
    pub mandi: String,
    pub district: String,
    pub distance_km: f64,
    pub current_price: f64,
    pub expected_7d_change_pct: f64,
}
