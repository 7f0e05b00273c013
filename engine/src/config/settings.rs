// Engine settings, loaded from environment variables and passed explicitly to
// the market-data client and the reliability service.
use crate::error::EngineError;
use serde::Deserialize;
use shared::models::OhlcPeriod;
use std::fmt;

pub const ENV_BASE_URL: &str = "COINGECKO_BASE_URL";
pub const ENV_API_KEY: &str = "COINGECKO_API_KEY";

#[derive(Deserialize, Clone)]
pub struct EngineSettings {
    pub base_url: String,
    pub api_key: String,
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,
    #[serde(default = "default_coin")]
    pub default_coin: String,
    #[serde(default = "default_ohlc_period")]
    pub ohlc_period: OhlcPeriod,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_window_size")]
    pub window_size: usize,
}

// api_key is redacted so settings can be logged.
impl fmt::Debug for EngineSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("vs_currency", &self.vs_currency)
            .field("default_coin", &self.default_coin)
            .field("ohlc_period", &self.ohlc_period)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("window_size", &self.window_size)
            .finish()
    }
}

fn default_vs_currency() -> String {
    "usd".to_string()
}

fn default_coin() -> String {
    "bitcoin".to_string()
}

fn default_ohlc_period() -> OhlcPeriod {
    OhlcPeriod::Daily
}

fn default_poll_interval_secs() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_window_size() -> usize {
    4
}

impl EngineSettings {
    /// Settings with the required provider values and defaults for everything else.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        EngineSettings {
            base_url: base_url.into(),
            api_key: api_key.into(),
            vs_currency: default_vs_currency(),
            default_coin: default_coin(),
            ohlc_period: default_ohlc_period(),
            poll_interval_secs: default_poll_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            window_size: default_window_size(),
        }
    }

    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable lookup.
    ///
    /// `COINGECKO_BASE_URL` and `COINGECKO_API_KEY` are required. Optional:
    /// `ENGINE_VS_CURRENCY`, `ENGINE_DEFAULT_COIN`, `ENGINE_OHLC_PERIOD`,
    /// `ENGINE_POLL_INTERVAL_SECS`, `ENGINE_REQUEST_TIMEOUT_SECS`, `ENGINE_WINDOW_SIZE`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let base_url = get(ENV_BASE_URL)
            .ok_or_else(|| EngineError::ConfigError(format!("{} is not set", ENV_BASE_URL)))?;
        let api_key = get(ENV_API_KEY)
            .ok_or_else(|| EngineError::ConfigError(format!("{} is not set", ENV_API_KEY)))?;

        let mut settings = EngineSettings::new(base_url.trim_end_matches('/'), api_key);

        if let Some(currency) = get("ENGINE_VS_CURRENCY") {
            settings.vs_currency = currency.to_lowercase();
        }
        if let Some(coin) = get("ENGINE_DEFAULT_COIN") {
            settings.default_coin = coin;
        }
        if let Some(period) = get("ENGINE_OHLC_PERIOD") {
            settings.ohlc_period = period.parse().map_err(EngineError::ConfigError)?;
        }
        if let Some(secs) = get("ENGINE_POLL_INTERVAL_SECS") {
            settings.poll_interval_secs = parse_number("ENGINE_POLL_INTERVAL_SECS", &secs)?;
        }
        if let Some(secs) = get("ENGINE_REQUEST_TIMEOUT_SECS") {
            settings.request_timeout_secs = parse_number("ENGINE_REQUEST_TIMEOUT_SECS", &secs)?;
        }
        if let Some(size) = get("ENGINE_WINDOW_SIZE") {
            settings.window_size = parse_number("ENGINE_WINDOW_SIZE", &size)?;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Poll interval and request timeout must both be non-zero.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.poll_interval_secs == 0 {
            return Err(EngineError::ConfigError(
                "ENGINE_POLL_INTERVAL_SECS must be greater than 0".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(EngineError::ConfigError(
                "ENGINE_REQUEST_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, EngineError> {
    raw.parse::<T>()
        .map_err(|_| EngineError::ConfigError(format!("{} must be a non-negative integer, got '{}'", name, raw)))
}
