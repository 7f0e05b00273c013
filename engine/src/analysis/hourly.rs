// Hour-of-day reliability scoring over OHLC candles.
//
// Candles from different days that share a UTC hour land in the same bucket.
// Each hour is scored on how one-sided its candles are, how large the average
// move is, and whether any range was observed at all; scores are then
// normalized so the best hour reads 100.
use super::CandleAnalysis;
use serde_json::Value;
use shared::models::{Candle, HourStat, Trend};
use shared::utils::{round_dp, round_percent};
use std::cmp::Ordering;

pub const HOURS_PER_DAY: usize = 24;
pub const DEFAULT_WINDOW_SIZE: usize = 4;

#[derive(Debug, Default, Clone, Copy)]
struct HourBucket {
    count: u32,
    total_move_pct: f64,
    total_range: f64,
    bullish_count: u32,
}

impl HourBucket {
    fn add(&mut self, candle: &Candle) {
        self.count += 1;
        self.total_move_pct += (candle.close - candle.open) / candle.open * 100.0;
        self.total_range += candle.high - candle.low;
        if candle.close > candle.open {
            self.bullish_count += 1;
        }
    }
}

/// Output of one analyzer run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HourlyAnalysis {
    /// Ascending by hour; only hours that received at least one candle.
    pub stats: Vec<HourStat>,
    /// Candles excluded for a non-positive or non-finite price.
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HourlyReliabilityAnalyzer;

impl HourlyReliabilityAnalyzer {
    pub fn new() -> Self {
        HourlyReliabilityAnalyzer
    }

    pub fn run(&self, candles: &[Candle]) -> HourlyAnalysis {
        let mut scorable: Vec<&Candle> = candles.iter().filter(|c| is_scorable(c)).collect();
        let skipped = candles.len() - scorable.len();
        if skipped > 0 {
            tracing::debug!(skipped, total = candles.len(), "Excluding candles with unusable prices");
        }

        // Accumulate in a canonical order so float sums do not depend on input order.
        scorable.sort_by(|a, b| canonical_order(a, b));

        let mut buckets = [HourBucket::default(); HOURS_PER_DAY];
        for candle in scorable {
            buckets[candle.hour() as usize].add(candle);
        }

        let mut rows: Vec<(HourStat, bool)> = buckets
            .iter()
            .enumerate()
            .filter(|(_, bucket)| bucket.count > 0)
            .map(|(hour, bucket)| score_bucket(hour as u32, bucket))
            .collect();

        let max_score = rows.iter().map(|(stat, _)| stat.score).fold(0.0_f64, f64::max);
        for (stat, has_range) in rows.iter_mut() {
            stat.confidence = if max_score > 0.0 {
                round_percent(stat.score / max_score * 100.0)
            } else if *has_range {
                // Every hour scored zero: hours with observed range tie at the top.
                100
            } else {
                0
            };
        }

        HourlyAnalysis {
            stats: rows.into_iter().map(|(stat, _)| stat).collect(),
            skipped,
        }
    }
}

impl CandleAnalysis for HourlyReliabilityAnalyzer {
    type Output = HourlyAnalysis;

    fn name(&self) -> &str {
        "hourly_reliability"
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "clock": "utc", "buckets": HOURS_PER_DAY })
    }

    fn analyze(&self, data: &[Candle]) -> HourlyAnalysis {
        self.run(data)
    }
}

/// Per-hour stats for `candles`, ascending by hour.
pub fn analyze(candles: &[Candle]) -> Vec<HourStat> {
    HourlyReliabilityAnalyzer::new().run(candles).stats
}

/// Entry with the highest confidence; the lowest hour wins a tie.
pub fn strongest_hour(stats: &[HourStat]) -> Option<&HourStat> {
    stats.iter().fold(None, |best: Option<&HourStat>, stat| match best {
        Some(current)
            if current.confidence > stat.confidence
                || (current.confidence == stat.confidence && current.hour <= stat.hour) =>
        {
            Some(current)
        }
        _ => Some(stat),
    })
}

/// Up to `window_size` consecutive entries ending at `target_hour`.
/// Clipped at the start of `stats`; empty if the hour is absent.
pub fn window_around(stats: &[HourStat], target_hour: u32, window_size: usize) -> &[HourStat] {
    match stats.iter().position(|s| s.hour == target_hour) {
        Some(idx) if window_size > 0 => {
            let start = (idx + 1).saturating_sub(window_size);
            &stats[start..=idx]
        }
        _ => &[],
    }
}

/// Direction of the bullish rate at `hour` relative to the entry before it.
pub fn trend_at(stats: &[HourStat], hour: u32) -> Trend {
    match stats.iter().position(|s| s.hour == hour) {
        None => Trend::Neutral,
        Some(0) => Trend::Down,
        Some(idx) if stats[idx].bullish_rate > stats[idx - 1].bullish_rate => Trend::Up,
        Some(_) => Trend::Down,
    }
}

fn is_scorable(candle: &Candle) -> bool {
    candle.open.is_finite()
        && candle.open > 0.0
        && candle.high.is_finite()
        && candle.low.is_finite()
        && candle.close.is_finite()
}

fn canonical_order(a: &Candle, b: &Candle) -> Ordering {
    a.timestamp
        .cmp(&b.timestamp)
        .then_with(|| a.open.total_cmp(&b.open))
        .then_with(|| a.high.total_cmp(&b.high))
        .then_with(|| a.low.total_cmp(&b.low))
        .then_with(|| a.close.total_cmp(&b.close))
}

fn score_bucket(hour: u32, bucket: &HourBucket) -> (HourStat, bool) {
    let count = bucket.count as f64;
    let avg_move_pct = round_dp(bucket.total_move_pct / count, 2);
    let avg_volatility = round_dp(bucket.total_range / count, 2);
    let bullish_rate = round_percent(bucket.bullish_count as f64 / count * 100.0);

    // Scored from the rounded figures the record reports.
    let consistency = (bullish_rate as f64 - 50.0).abs() / 50.0;
    let has_range = avg_volatility > 0.0;
    let score = if has_range { avg_move_pct.abs() * consistency } else { 0.0 };

    let stat = HourStat {
        hour,
        count: bucket.count,
        avg_move_pct,
        avg_volatility,
        bullish_rate,
        score,
        confidence: 0,
    };
    (stat, has_range)
}
