//! Nearby-mandi lookup boundary.

use crate::domain::MandiOption;

/// Source of markets near a farmer's location.
pub trait NearbyMandiProvider: Send + Sync {
    fn nearby(&self, district: Option<&str>, pincode: Option<&str>) -> Vec<MandiOption>;
}

/// Fixed stand-in until a geospatial source is wired up. Ignores the pincode
/// and echoes the district (or "Unknown").
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderMandiProvider;

const PLACEHOLDER_MANDIS: [(&str, f64, f64, f64); 3] = [
    ("Central Mandi", 8.4, 2410.0, 2.8),
    ("City Grain Market", 14.2, 2385.0, 1.9),
    ("Regional Agro Hub", 21.7, 2445.0, 3.4),
];

impl NearbyMandiProvider for PlaceholderMandiProvider {
    fn nearby(&self, district: Option<&str>, _pincode: Option<&str>) -> Vec<MandiOption> {
        let district = district
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or("Unknown");
        PLACEHOLDER_MANDIS
            .iter()
            .map(|&(mandi, distance_km, current_price, change)| MandiOption {
                mandi: mandi.to_string(),
                district: district.to_string(),
                distance_km,
                current_price,
                expected_7d_change_pct: change,
            })
            .collect()
    }
}
