use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One OHLC candle. Timestamps travel as epoch milliseconds on the wire.
///
/// Deserializes from either the provider's tuple shape
/// `[timestampMs, open, high, low, close]` or a named record
/// `{ "timestamp": ms, "open": .., "high": .., "low": .., "close": .. }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CandleRecord")]
pub struct Candle {
    #[serde(serialize_with = "chrono::serde::ts_milliseconds::serialize")]
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    /// Builds a candle from an epoch-millisecond timestamp. Returns `None` when
    /// the timestamp is outside chrono's representable range.
    pub fn from_millis(timestamp_ms: i64, open: f64, high: f64, low: f64, close: f64) -> Option<Self> {
        DateTime::from_timestamp_millis(timestamp_ms).map(|timestamp| Candle {
            timestamp,
            open,
            high,
            low,
            close,
        })
    }

    /// UTC hour-of-day, 0..=23.
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }
}

impl TryFrom<[f64; 5]> for Candle {
    type Error = String;

    fn try_from(row: [f64; 5]) -> Result<Self, Self::Error> {
        let [ts, open, high, low, close] = row;
        candle_from_float_millis(ts, open, high, low, close)
    }
}

// Wire shapes accepted for a candle.
#[derive(Deserialize)]
#[serde(untagged)]
enum CandleRecord {
    Tuple(f64, f64, f64, f64, f64),
    Named {
        timestamp: f64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    },
}

impl TryFrom<CandleRecord> for Candle {
    type Error = String;

    fn try_from(record: CandleRecord) -> Result<Self, Self::Error> {
        match record {
            CandleRecord::Tuple(ts, open, high, low, close) => candle_from_float_millis(ts, open, high, low, close),
            CandleRecord::Named { timestamp, open, high, low, close } => {
                candle_from_float_millis(timestamp, open, high, low, close)
            }
        }
    }
}

fn candle_from_float_millis(ts: f64, open: f64, high: f64, low: f64, close: f64) -> Result<Candle, String> {
    if !ts.is_finite() {
        return Err(format!("candle timestamp is not finite: {}", ts));
    }
    Candle::from_millis(ts.trunc() as i64, open, high, low, close)
        .ok_or_else(|| format!("candle timestamp out of range: {}", ts))
}

/// One `[timestampMs, price]` sample of a market-chart price series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint(
    #[serde(with = "chrono::serde::ts_milliseconds")] pub DateTime<Utc>,
    pub f64,
);

impl PricePoint {
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn price(&self) -> f64 {
        self.1
    }
}

/// Per-hour-of-day statistics, ready to serialize for a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourStat {
    pub hour: u32,
    pub count: u32,
    pub avg_move_pct: f64,
    pub avg_volatility: f64,
    pub bullish_rate: u32,
    pub score: f64,
    pub confidence: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

/// A point of the short-horizon price stability series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StabilityPoint {
    pub hour: u32,
    pub confidence: u32,
}

/// Lookback windows offered by the provider's OHLC endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OhlcPeriod {
    Daily,
    Weekly,
    Monthly,
    #[serde(rename = "3months")]
    ThreeMonths,
    #[serde(rename = "6months")]
    SixMonths,
    Yearly,
}

impl OhlcPeriod {
    pub fn days(&self) -> u32 {
        match self {
            OhlcPeriod::Daily => 1,
            OhlcPeriod::Weekly => 7,
            OhlcPeriod::Monthly => 30,
            OhlcPeriod::ThreeMonths => 90,
            OhlcPeriod::SixMonths => 180,
            OhlcPeriod::Yearly => 365,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            OhlcPeriod::Daily => "daily",
            OhlcPeriod::Weekly => "weekly",
            OhlcPeriod::Monthly => "monthly",
            OhlcPeriod::ThreeMonths => "3months",
            OhlcPeriod::SixMonths => "6months",
            OhlcPeriod::Yearly => "yearly",
        }
    }
}

impl fmt::Display for OhlcPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OhlcPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "1" => Ok(OhlcPeriod::Daily),
            "weekly" | "7" => Ok(OhlcPeriod::Weekly),
            "monthly" | "30" => Ok(OhlcPeriod::Monthly),
            "3months" | "three_months" | "90" => Ok(OhlcPeriod::ThreeMonths),
            "6months" | "six_months" | "180" => Ok(OhlcPeriod::SixMonths),
            "yearly" | "365" => Ok(OhlcPeriod::Yearly),
            other => Err(format!("Unknown OHLC period '{}'", other)),
        }
    }
}
