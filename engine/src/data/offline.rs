// Candle source for runs that must not touch the network.
use crate::data::coingecko::CandleSource;
use crate::error::EngineError;
use shared::models::{Candle, OhlcPeriod};

#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSource;

impl CandleSource for OfflineSource {
    async fn fetch_candles(&self, coin_id: &str, _period: OhlcPeriod) -> Result<Vec<Candle>, EngineError> {
        Err(EngineError::MarketDataError(format!(
            "No live market data for '{}' in offline mode",
            coin_id
        )))
    }
}
