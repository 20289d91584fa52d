//! Day-over-day price shock alert.

/// Absolute change (%) between the last two observations that counts as a shock.
pub const SHOCK_THRESHOLD_PCT: f64 = 5.0;

/// Alert text when the last observation moved at least
/// [`SHOCK_THRESHOLD_PCT`] from the one before it.
pub fn detect_price_shock(prices: &[f64]) -> Option<String> {
    let [.., previous, last] = prices else {
        return None;
    };
    if *previous == 0.0 {
        return None;
    }

    let change = (last - previous) / previous * 100.0;
    if change.abs() >= SHOCK_THRESHOLD_PCT {
        let direction = if change < 0.0 { "drop" } else { "jump" };
        Some(format!("Sudden price {direction} detected today ({change:.1}%)."))
    } else {
        None
    }
}
