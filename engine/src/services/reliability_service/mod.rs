// engine/src/services/reliability_service/mod.rs
// The ReliabilityService ties a candle source, the in-memory store and the
// hourly analyzer together. Each operation lives in its own submodule.
use crate::analysis::hourly::HourlyReliabilityAnalyzer;
use crate::analysis::CandleAnalysis;
use crate::config::settings::EngineSettings;
use crate::data::coingecko::CandleSource;
use crate::data::market_data::MarketDataStore;
use crate::error::EngineError;
use shared::models::{Candle, OhlcPeriod};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

pub mod load_csv;
pub mod refresh;
pub mod snapshot;
pub mod watch;

pub use snapshot::ReliabilitySnapshot;

/// Candles older than this are dropped from the store on refresh.
pub const HISTORY_RETENTION_DAYS: i64 = 90;

pub struct ReliabilityService<S: CandleSource> {
    source: S,
    market_data_store: Arc<RwLock<MarketDataStore>>,
    analyzer: HourlyReliabilityAnalyzer,
    period: OhlcPeriod,
    window_size: usize,
    poll_interval: Duration,
}

impl<S: CandleSource> ReliabilityService<S> {
    pub fn new(source: S, settings: &EngineSettings) -> Self {
        if settings.poll_interval_secs == 0 {
            tracing::warn!("poll_interval_secs is 0; polling every second instead");
        }
        ReliabilityService {
            source,
            market_data_store: Arc::new(RwLock::new(MarketDataStore::new())),
            analyzer: HourlyReliabilityAnalyzer::new(),
            period: settings.ohlc_period,
            window_size: settings.window_size,
            poll_interval: Duration::from_secs(settings.poll_interval_secs.max(1)),
        }
    }

    pub fn with_period(mut self, period: OhlcPeriod) -> Self {
        self.period = period;
        self
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn market_data_store(&self) -> Arc<RwLock<MarketDataStore>> {
        self.market_data_store.clone()
    }

    /// Fetches fresh candles for `coin_id` and analyzes the stored history.
    pub async fn refresh(&self, coin_id: &str) -> Result<ReliabilitySnapshot, EngineError> {
        tracing::info!(coin_id, period = %self.period, "Refreshing hourly reliability");
        refresh::handle_refresh(self, coin_id).await
    }

    /// Loads candles from a CSV file under `coin_id` and analyzes them. No network.
    pub async fn load_csv(&self, coin_id: &str, path: &Path) -> Result<ReliabilitySnapshot, EngineError> {
        tracing::info!(coin_id, path = %path.display(), "Loading candles from CSV");
        load_csv::handle_load_csv(self, coin_id, path).await
    }

    /// Polls every configured interval until `shutdown` resolves. Returns the
    /// number of polling rounds completed.
    pub async fn watch<F, Fut>(&self, coins: &[String], sink: F, shutdown: Fut) -> usize
    where
        F: FnMut(ReliabilitySnapshot),
        Fut: Future<Output = ()>,
    {
        tracing::info!(
            coins = ?coins,
            interval_secs = self.poll_interval.as_secs(),
            "Starting reliability polling"
        );
        watch::run_watch(self, coins, sink, shutdown).await
    }

    // Shared tail of every operation: run the analyzer over `candles`.
    fn snapshot(&self, coin_id: &str, candles: &[Candle]) -> ReliabilitySnapshot {
        let analysis = self.analyzer.analyze(candles);
        tracing::debug!(
            coin_id,
            analysis = self.analyzer.name(),
            parameters = %self.analyzer.parameters(),
            hours = analysis.stats.len(),
            skipped = analysis.skipped,
            "Hourly analysis complete"
        );
        ReliabilitySnapshot::build(coin_id, candles.len(), analysis, self.window_size)
    }
}
