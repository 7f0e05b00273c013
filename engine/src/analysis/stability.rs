// Short-horizon price stability: how calm each recent price step was.
use shared::models::{PricePoint, StabilityPoint};

pub const STABILITY_POINTS: usize = 24;
pub const INITIAL_CONFIDENCE: u32 = 65;
pub const MIN_CONFIDENCE: u32 = 20;
pub const MAX_CONFIDENCE: u32 = 98;
const MOVE_PENALTY: f64 = 150.0;

/// Maps each price step to a 20..=98 confidence (larger step, lower confidence)
/// and keeps the most recent 24 points.
pub fn stability_series(prices: &[PricePoint]) -> Vec<StabilityPoint> {
    let mut points: Vec<StabilityPoint> = prices
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let confidence = if i == 0 {
                INITIAL_CONFIDENCE
            } else {
                step_confidence(prices[i - 1].price(), point.price())
            };
            StabilityPoint { hour: point.hour(), confidence }
        })
        .collect();

    if points.len() > STABILITY_POINTS {
        points.drain(..points.len() - STABILITY_POINTS);
    }
    points
}

fn step_confidence(prev: f64, price: f64) -> u32 {
    if !prev.is_finite() || prev <= 0.0 || !price.is_finite() {
        return MIN_CONFIDENCE;
    }
    let move_pct = ((price - prev) / prev).abs() * 100.0;
    let raw = (100.0 - move_pct * MOVE_PENALTY).round();
    raw.clamp(MIN_CONFIDENCE as f64, MAX_CONFIDENCE as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    // 2024-01-01T00:00:00Z
    const DAY_ZERO_MS: i64 = 1_704_067_200_000;
    const HOUR_MS: i64 = 3_600_000;

    fn point(hour: i64, price: f64) -> PricePoint {
        PricePoint(DateTime::from_timestamp_millis(DAY_ZERO_MS + hour * HOUR_MS).unwrap(), price)
    }

    #[test]
    fn test_empty_series() {
        assert!(stability_series(&[]).is_empty());
    }

    #[test]
    fn test_first_point_and_steps() {
        let series = stability_series(&[
            point(0, 100.0),
            point(1, 100.0),  // flat: capped at 98
            point(2, 100.1),  // 0.1% move: 100 - 15 = 85
            point(3, 101.1),  // ~1% move: floored at 20
        ]);
        let confidences: Vec<u32> = series.iter().map(|p| p.confidence).collect();
        assert_eq!(confidences, vec![65, 98, 85, 20]);
        let hours: Vec<u32> = series.iter().map(|p| p.hour).collect();
        assert_eq!(hours, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_zero_previous_price_floors() {
        let series = stability_series(&[point(0, 0.0), point(1, 50.0)]);
        assert_eq!(series[1].confidence, MIN_CONFIDENCE);
    }

    #[test]
    fn test_keeps_last_24_points() {
        let prices: Vec<PricePoint> = (0..30).map(|h| point(h, 100.0)).collect();
        let series = stability_series(&prices);
        assert_eq!(series.len(), STABILITY_POINTS);
        // Points 6..30; hour wraps after midnight.
        assert_eq!(series[0].hour, 6);
        assert_eq!(series[23].hour, 5);
        assert!(series.iter().all(|p| p.confidence == MAX_CONFIDENCE));
    }
}
