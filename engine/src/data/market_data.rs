// Keeps the candle history fetched so far, per coin.
use chrono::{DateTime, Utc};
use shared::models::Candle;
use std::collections::{BTreeMap, HashMap};

pub struct MarketDataStore {
    // Keyed by timestamp so repeated fetches overlap cleanly.
    data: HashMap<String, BTreeMap<DateTime<Utc>, Candle>>,
}

impl MarketDataStore {
    pub fn new() -> Self {
        MarketDataStore { data: HashMap::new() }
    }

    /// Merges `new_candles` into the coin's history. A candle whose timestamp is
    /// already stored replaces the stored one. Returns how many timestamps were new.
    pub fn add_candles(&mut self, coin_id: &str, new_candles: Vec<Candle>) -> usize {
        let coin_data = self.data.entry(coin_id.to_string()).or_default();
        let mut added = 0;
        for candle in new_candles {
            if coin_data.insert(candle.timestamp, candle).is_none() {
                added += 1;
            }
        }
        added
    }

    /// Candles for `coin_id` in ascending timestamp order, optionally bounded (inclusive).
    pub fn get_candles(
        &self,
        coin_id: &str,
        from_timestamp: Option<DateTime<Utc>>,
        to_timestamp: Option<DateTime<Utc>>,
    ) -> Option<Vec<Candle>> {
        self.data.get(coin_id).map(|candles| {
            candles
                .values()
                .filter(|c| from_timestamp.map_or(true, |start| c.timestamp >= start))
                .filter(|c| to_timestamp.map_or(true, |end| c.timestamp <= end))
                .copied()
                .collect()
        })
    }

    pub fn candle_count(&self, coin_id: &str) -> usize {
        self.data.get(coin_id).map_or(0, |candles| candles.len())
    }

    /// Drops candles older than `cutoff` for every coin.
    pub fn prune_before(&mut self, cutoff: DateTime<Utc>) {
        for candles in self.data.values_mut() {
            *candles = candles.split_off(&cutoff);
        }
    }
}

impl Default for MarketDataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-01-01T00:00:00Z
    const DAY_ZERO_MS: i64 = 1_704_067_200_000;
    const HOUR_MS: i64 = 3_600_000;

    fn candle_at(hour: i64, close: f64) -> Candle {
        Candle::from_millis(DAY_ZERO_MS + hour * HOUR_MS, 100.0, 101.0, 99.0, close).unwrap()
    }

    #[test]
    fn test_unknown_coin() {
        let store = MarketDataStore::new();
        assert!(store.get_candles("bitcoin", None, None).is_none());
        assert_eq!(store.candle_count("bitcoin"), 0);
    }

    #[test]
    fn test_merge_sorts_and_dedups() {
        let mut store = MarketDataStore::new();
        assert_eq!(store.add_candles("bitcoin", vec![candle_at(2, 100.5), candle_at(0, 100.1)]), 2);
        // Overlapping refresh: hour 2 revised, hour 3 new.
        assert_eq!(store.add_candles("bitcoin", vec![candle_at(3, 100.7), candle_at(2, 100.9)]), 1);

        let candles = store.get_candles("bitcoin", None, None).unwrap();
        let hours: Vec<u32> = candles.iter().map(|c| c.hour()).collect();
        assert_eq!(hours, vec![0, 2, 3]);
        assert_eq!(candles[1].close, 100.9);
    }

    #[test]
    fn test_range_query_and_prune() {
        let mut store = MarketDataStore::new();
        store.add_candles("bitcoin", (0..6).map(|h| candle_at(h, 100.0)).collect());
        store.add_candles("ethereum", vec![candle_at(1, 100.0)]);

        let from = candle_at(2, 0.0).timestamp;
        let to = candle_at(4, 0.0).timestamp;
        let ranged = store.get_candles("bitcoin", Some(from), Some(to)).unwrap();
        assert_eq!(ranged.len(), 3);

        store.prune_before(from);
        assert_eq!(store.candle_count("bitcoin"), 4);
        assert_eq!(store.candle_count("ethereum"), 0);
    }
}
