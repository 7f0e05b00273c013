// HTTP client for the CoinGecko REST API.
// Configuration is injected; the client holds no global state.
use crate::config::settings::EngineSettings;
use crate::error::EngineError;
use crate::models::coingecko::{Category, CoinOverview, MarketChart, MarketCoin, TrendingCoin, TrendingResponse};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use shared::models::{Candle, OhlcPeriod, PricePoint};
use std::future::Future;
use std::time::Duration;

pub const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// Anything that can supply an OHLC history for a coin.
pub trait CandleSource: Send + Sync {
    fn fetch_candles(
        &self,
        coin_id: &str,
        period: OhlcPeriod,
    ) -> impl Future<Output = Result<Vec<Candle>, EngineError>> + Send;
}

pub struct CoinGeckoClient {
    http: reqwest::Client,
    settings: EngineSettings,
}

impl CoinGeckoClient {
    pub fn new(settings: EngineSettings) -> Result<Self, EngineError> {
        settings.validate()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;
        Ok(CoinGeckoClient { http, settings })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// `GET {base_url}/{endpoint}` decoded as `T`. Empty query values are dropped.
    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, String)]) -> Result<T, EngineError> {
        let request = self.build_request(endpoint, params)?;
        tracing::debug!(endpoint, "Requesting market data");

        let response = self.http.execute(request).await.map_err(|e| {
            tracing::warn!(endpoint, error = %e, "Market data request failed");
            EngineError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(endpoint, status = status.as_u16(), "Market data API returned an error status");
            return Err(EngineError::ApiStatus {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| EngineError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    pub async fn ohlc(&self, coin_id: &str, period: OhlcPeriod) -> Result<Vec<Candle>, EngineError> {
        validate_coin_id(coin_id)?;
        let endpoint = format!("coins/{}/ohlc", coin_id);
        let candles: Vec<Candle> = self
            .fetch(
                &endpoint,
                &[
                    ("vs_currency", self.settings.vs_currency.clone()),
                    ("days", period.days().to_string()),
                    ("precision", "full".to_string()),
                ],
            )
            .await?;
        tracing::debug!(coin_id, %period, count = candles.len(), "Fetched OHLC candles");
        Ok(candles)
    }

    pub async fn market_chart(&self, coin_id: &str, days: u32) -> Result<Vec<PricePoint>, EngineError> {
        validate_coin_id(coin_id)?;
        let endpoint = format!("coins/{}/market_chart", coin_id);
        let chart: MarketChart = self
            .fetch(
                &endpoint,
                &[
                    ("vs_currency", self.settings.vs_currency.clone()),
                    ("days", days.to_string()),
                ],
            )
            .await?;
        Ok(chart.prices)
    }

    pub async fn trending(&self) -> Result<Vec<TrendingCoin>, EngineError> {
        let response: TrendingResponse = self.fetch("search/trending", &[]).await?;
        Ok(response.coins.into_iter().map(|entry| entry.item).collect())
    }

    pub async fn categories(&self) -> Result<Vec<Category>, EngineError> {
        self.fetch("coins/categories", &[]).await
    }

    pub async fn coin_overview(&self, coin_id: &str) -> Result<CoinOverview, EngineError> {
        validate_coin_id(coin_id)?;
        let endpoint = format!("coins/{}", coin_id);
        self.fetch(&endpoint, &[("dex_pair_format", "symbol".to_string())]).await
    }

    /// `/coins/markets` rows for `coin_ids`, with the 24h price change.
    pub async fn markets(&self, coin_ids: &[String]) -> Result<Vec<MarketCoin>, EngineError> {
        let params = self.markets_params(coin_ids)?;
        let coins: Vec<MarketCoin> = self.fetch("coins/markets", &params).await?;
        tracing::debug!(requested = coin_ids.len(), count = coins.len(), "Fetched market rows");
        Ok(coins)
    }

    /// The `limit` largest coins by market cap.
    pub async fn top_markets(&self, limit: u32) -> Result<Vec<MarketCoin>, EngineError> {
        self.fetch("coins/markets", &self.top_markets_params(limit)).await
    }

    fn markets_params(&self, coin_ids: &[String]) -> Result<Vec<(&'static str, String)>, EngineError> {
        if coin_ids.is_empty() {
            return Err(EngineError::MarketDataError("No coin ids requested".to_string()));
        }
        for coin_id in coin_ids {
            validate_coin_id(coin_id)?;
        }
        Ok(vec![
            ("vs_currency", self.settings.vs_currency.clone()),
            ("ids", coin_ids.join(",")),
            ("price_change_percentage", "24h".to_string()),
        ])
    }

    fn top_markets_params(&self, limit: u32) -> Vec<(&'static str, String)> {
        vec![
            ("vs_currency", self.settings.vs_currency.clone()),
            ("order", "market_cap_desc".to_string()),
            ("per_page", limit.max(1).to_string()),
            ("price_change_percentage", "24h".to_string()),
        ]
    }

    fn build_request(&self, endpoint: &str, params: &[(&str, String)]) -> Result<reqwest::Request, EngineError> {
        let url = format!(
            "{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        let query: Vec<(&str, &str)> = params
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (*key, value.as_str()))
            .collect();

        let mut api_key = HeaderValue::from_str(&self.settings.api_key).map_err(|_| {
            EngineError::ConfigError("COINGECKO_API_KEY contains characters not allowed in a header".to_string())
        })?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(self.http.get(url).headers(headers).query(&query).build()?)
    }
}

impl CandleSource for CoinGeckoClient {
    async fn fetch_candles(&self, coin_id: &str, period: OhlcPeriod) -> Result<Vec<Candle>, EngineError> {
        self.ohlc(coin_id, period).await
    }
}

// Coin ids are API slugs ("bitcoin", "usd-coin") and are spliced into the URL path.
fn validate_coin_id(coin_id: &str) -> Result<(), EngineError> {
    let valid = !coin_id.is_empty()
        && coin_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
    if valid {
        Ok(())
    } else {
        Err(EngineError::MarketDataError(format!("Invalid coin id '{}'", coin_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> CoinGeckoClient {
        CoinGeckoClient::new(EngineSettings::new("https://api.example.test/api/v3/", "demo-key")).unwrap()
    }

    #[test]
    fn test_build_request_url_and_headers() {
        let client = test_client();
        let request = client
            .build_request(
                "/coins/bitcoin/ohlc",
                &[("vs_currency", "usd".to_string()), ("days", "7".to_string())],
            )
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://api.example.test/api/v3/coins/bitcoin/ohlc?vs_currency=usd&days=7"
        );
        let key = request.headers().get(API_KEY_HEADER).unwrap();
        assert_eq!(key.to_str().unwrap(), "demo-key");
        assert!(key.is_sensitive());
        assert_eq!(request.headers().get(ACCEPT).unwrap().to_str().unwrap(), "application/json");
    }

    #[test]
    fn test_build_request_skips_empty_params() {
        let client = test_client();
        let request = client
            .build_request("search/trending", &[("page", String::new())])
            .unwrap();
        assert_eq!(request.url().as_str(), "https://api.example.test/api/v3/search/trending");
    }

    #[test]
    fn test_invalid_api_key_is_config_error() {
        let client = CoinGeckoClient::new(EngineSettings::new("https://api.example.test", "bad\nkey")).unwrap();
        let result = client.build_request("ping", &[]);
        assert!(matches!(result, Err(EngineError::ConfigError(_))));
    }

    #[test]
    fn test_markets_query() {
        let client = test_client();
        let ids = vec!["bitcoin".to_string(), "ethereum".to_string()];
        let params = client.markets_params(&ids).unwrap();
        let request = client.build_request("coins/markets", &params).unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://api.example.test/api/v3/coins/markets?vs_currency=usd&ids=bitcoin%2Cethereum&price_change_percentage=24h"
        );
    }

    #[test]
    fn test_markets_rejects_empty_and_bad_ids() {
        let client = test_client();
        assert!(matches!(client.markets_params(&[]), Err(EngineError::MarketDataError(_))));
        let bad = vec!["bitcoin".to_string(), "a/b".to_string()];
        assert!(matches!(client.markets_params(&bad), Err(EngineError::MarketDataError(_))));
    }

    #[test]
    fn test_top_markets_query() {
        let client = test_client();
        let request = client.build_request("coins/markets", &client.top_markets_params(3)).unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://api.example.test/api/v3/coins/markets?vs_currency=usd&order=market_cap_desc&per_page=3&price_change_percentage=24h"
        );
    }

    #[test]
    fn test_client_rejects_zero_timeout() {
        let mut settings = EngineSettings::new("https://api.example.test", "demo-key");
        settings.request_timeout_secs = 0;
        assert!(matches!(CoinGeckoClient::new(settings), Err(EngineError::ConfigError(_))));
    }

    #[test]
    fn test_validate_coin_id() {
        assert!(validate_coin_id("bitcoin").is_ok());
        assert!(validate_coin_id("usd-coin").is_ok());
        assert!(validate_coin_id("").is_err());
        assert!(validate_coin_id("../admin").is_err());
        assert!(validate_coin_id("bitcoin?x=1").is_err());
    }

    #[tokio::test]
    async fn test_ohlc_rejects_bad_coin_id_before_any_request() {
        let client = test_client();
        let result = client.ohlc("a/b", OhlcPeriod::Daily).await;
        match result {
            Err(EngineError::MarketDataError(msg)) => assert!(msg.contains("a/b")),
            other => panic!("expected MarketDataError, got {:?}", other.map(|c| c.len())),
        }
    }
}
