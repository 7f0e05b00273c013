// Engine-side wire models for provider responses that are not candles.
// Candles and price points live in `shared::models`.
pub mod coingecko;
