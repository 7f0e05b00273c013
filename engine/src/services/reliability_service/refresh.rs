// Handler for a single fetch-and-analyze round
use super::{ReliabilityService, ReliabilitySnapshot, HISTORY_RETENTION_DAYS};
use crate::data::coingecko::CandleSource;
use crate::error::EngineError;
use chrono::{Duration, Utc};

pub async fn handle_refresh<S: CandleSource>(
    service: &ReliabilityService<S>,
    coin_id: &str,
) -> Result<ReliabilitySnapshot, EngineError> {
    let fetched = match service.source.fetch_candles(coin_id, service.period).await {
        Ok(candles) => candles,
        Err(e) => {
            tracing::warn!(coin_id, error = %e, "Candle fetch failed; skipping analysis");
            return Err(e);
        }
    };
    let fetched_count = fetched.len();

    let mut store = service.market_data_store.write().await;
    let added = store.add_candles(coin_id, fetched);
    store.prune_before(Utc::now() - Duration::days(HISTORY_RETENTION_DAYS));
    let history = store.get_candles(coin_id, None, None).unwrap_or_default();
    drop(store);

    tracing::debug!(coin_id, fetched = fetched_count, added, history = history.len(), "Merged candles into store");
    Ok(service.snapshot(coin_id, &history))
}
