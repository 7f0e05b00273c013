// Numeric helpers shared by the engine and any UI consumer.

/// Rounds to `decimals` places, halves away from zero.
pub fn round_dp(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Rounds a percentage into an integer clamped to 0..=100.
pub fn round_percent(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_dp() {
        assert_eq!(round_dp(4.090909, 2), 4.09);
        assert_eq!(round_dp(-1.818181, 2), -1.82);
        assert_eq!(round_dp(0.125, 0), 0.0);
    }

    #[test]
    fn test_round_percent_clamps() {
        assert_eq!(round_percent(49.5), 50);
        assert_eq!(round_percent(120.0), 100);
        assert_eq!(round_percent(-3.0), 0);
        assert_eq!(round_percent(f64::NAN), 0);
    }
}
