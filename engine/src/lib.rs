// Engine library root

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod services;

pub use analysis::hourly::{analyze, strongest_hour, trend_at, window_around};
pub use analysis::stability::stability_series;
pub use error::EngineError;
pub use services::reliability_service::{ReliabilityService, ReliabilitySnapshot};
