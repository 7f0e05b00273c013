use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP transport error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    // Endpoint path only; never the full URL or headers.
    #[error("Market data API returned {status} for '{endpoint}'")]
    ApiStatus { status: u16, endpoint: String },

    #[error("Failed to decode '{endpoint}' response: {message}")]
    Decode { endpoint: String, message: String },

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error("Market data store error: {0}")]
    MarketDataError(String),

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

impl EngineError {
    /// True when the upstream provider could not supply data. Callers render
    /// an empty state instead of running any analysis.
    pub fn is_data_unavailable(&self) -> bool {
        matches!(
            self,
            EngineError::Http { .. } | EngineError::ApiStatus { .. } | EngineError::Decode { .. }
        )
    }
}
