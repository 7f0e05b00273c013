// The record handed to a dashboard after each analysis run.
use crate::analysis::hourly::{strongest_hour, trend_at, window_around, HourlyAnalysis};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::models::{HourStat, Trend};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReliabilitySnapshot {
    pub id: Uuid,
    pub coin_id: String,
    pub generated_at: DateTime<Utc>,
    pub candle_count: usize,
    pub skipped_candles: usize,
    pub stats: Vec<HourStat>,
    pub strongest: Option<HourStat>,
    pub window: Vec<HourStat>,
    pub trend: Trend,
}

impl ReliabilitySnapshot {
    pub fn build(coin_id: &str, candle_count: usize, analysis: HourlyAnalysis, window_size: usize) -> Self {
        let strongest = strongest_hour(&analysis.stats).cloned();
        let (window, trend) = match &strongest {
            Some(peak) => (
                window_around(&analysis.stats, peak.hour, window_size).to_vec(),
                trend_at(&analysis.stats, peak.hour),
            ),
            None => (Vec::new(), Trend::Neutral),
        };

        ReliabilitySnapshot {
            id: Uuid::new_v4(),
            coin_id: coin_id.to_string(),
            generated_at: Utc::now(),
            candle_count,
            skipped_candles: analysis.skipped,
            stats: analysis.stats,
            strongest,
            window,
            trend,
        }
    }
}
