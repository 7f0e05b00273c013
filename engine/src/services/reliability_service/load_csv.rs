// Handler for analyzing a candle history stored in a CSV file
use super::{ReliabilityService, ReliabilitySnapshot};
use crate::data::coingecko::CandleSource;
use crate::data::csv_parser::CandleCsvParser;
use crate::error::EngineError;
use std::path::Path;

pub async fn handle_load_csv<S: CandleSource>(
    service: &ReliabilityService<S>,
    coin_id: &str,
    path: &Path,
) -> Result<ReliabilitySnapshot, EngineError> {
    let candles = CandleCsvParser::load_candles_from_csv(path)?;
    let loaded = candles.len();

    let mut store = service.market_data_store.write().await;
    store.add_candles(coin_id, candles);
    let history = store.get_candles(coin_id, None, None).unwrap_or_default();
    drop(store);

    tracing::info!(coin_id, loaded, history = history.len(), "Stored CSV candles");
    Ok(service.snapshot(coin_id, &history))
}
