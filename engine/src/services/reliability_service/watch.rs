// Polling loop: refresh every coin on each tick until shutdown.
use super::{ReliabilityService, ReliabilitySnapshot};
use crate::data::coingecko::CandleSource;
use std::future::Future;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;

pub async fn run_watch<S, F, Fut>(
    service: &ReliabilityService<S>,
    coins: &[String],
    mut sink: F,
    shutdown: Fut,
) -> usize
where
    S: CandleSource,
    F: FnMut(ReliabilitySnapshot),
    Fut: Future<Output = ()>,
{
    let mut interval = tokio::time::interval(service.poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut ticks = IntervalStream::new(interval);
    tokio::pin!(shutdown);

    let mut rounds = 0;
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!(rounds, "Shutdown requested; stopping reliability polling");
                break;
            }
            tick = ticks.next() => {
                if tick.is_none() {
                    break;
                }
                for coin_id in coins {
                    match service.refresh(coin_id).await {
                        Ok(snapshot) => sink(snapshot),
                        // Provider outages leave the previous snapshot in place.
                        Err(e) if e.is_data_unavailable() => {
                            tracing::warn!(coin_id = %coin_id, error = %e, "Market data unavailable this round");
                        }
                        Err(e) => {
                            tracing::error!(coin_id = %coin_id, error = %e, "Reliability refresh failed");
                        }
                    }
                }
                rounds += 1;
            }
        }
    }
    rounds
}
