// Analytics computed from market data
pub mod gauge;
pub mod hourly;
pub mod stability;

use serde_json::Value;
use shared::models::Candle;

// Common trait for analyses run over a candle history
pub trait CandleAnalysis: Send + Sync {
    type Output;

    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this analysis instance
    fn analyze(&self, data: &[Candle]) -> Self::Output;
}
