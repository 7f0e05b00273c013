// Response shapes of the CoinGecko endpoints the engine reads.
// Only the fields a dashboard renders are kept; unknown fields are ignored.
use serde::{Deserialize, Serialize};
use shared::models::PricePoint;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingResponse {
    #[serde(default)]
    pub coins: Vec<TrendingEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingEntry {
    pub item: TrendingCoin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
    #[serde(default)]
    pub data: Option<TrendingCoinData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingCoinData {
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: HashMap<String, f64>,
}

impl TrendingCoin {
    pub fn change_24h(&self, vs_currency: &str) -> Option<f64> {
        self.data
            .as_ref()
            .and_then(|d| d.price_change_percentage_24h.get(vs_currency).copied())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_change_24h: Option<f64>,
    #[serde(default)]
    pub volume_24h: Option<f64>,
    #[serde(default)]
    pub top_3_coins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinOverview {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<CoinImage>,
    #[serde(default)]
    pub market_data: Option<CoinMarketData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinImage {
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinMarketData {
    #[serde(default)]
    pub current_price: HashMap<String, f64>,
}

impl CoinOverview {
    pub fn current_price(&self, vs_currency: &str) -> Option<f64> {
        self.market_data
            .as_ref()
            .and_then(|m| m.current_price.get(vs_currency).copied())
    }
}

/// One row of `/coins/markets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketCoin {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketChart {
    #[serde(default)]
    pub prices: Vec<PricePoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trending_decodes_nested_items() {
        let json = r#"{
            "coins": [
                {"item": {"id": "bitcoin", "coin_id": 1, "name": "Bitcoin", "symbol": "BTC",
                          "market_cap_rank": 1, "thumb": "t.png", "large": "l.png",
                          "data": {"price": 89113.0, "price_change_percentage_24h": {"usd": 2.5}}}},
                {"item": {"id": "newcoin", "name": "New", "symbol": "NEW", "market_cap_rank": null}}
            ],
            "nfts": []
        }"#;
        let trending: TrendingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(trending.coins.len(), 2);
        assert_eq!(trending.coins[0].item.change_24h("usd"), Some(2.5));
        assert_eq!(trending.coins[1].item.market_cap_rank, None);
        assert_eq!(trending.coins[1].item.change_24h("usd"), None);
    }

    #[test]
    fn test_category_defaults() {
        let json = r#"[{"id": "layer-1", "name": "Layer 1", "market_cap_change_24h": -1.2,
                        "top_3_coins": ["a.png", "b.png", "c.png"]},
                       {"id": "meme", "name": "Meme", "market_cap": null}]"#;
        let categories: Vec<Category> = serde_json::from_str(json).unwrap();
        assert_eq!(categories[0].top_3_coins.len(), 3);
        assert_eq!(categories[0].market_cap_change_24h, Some(-1.2));
        assert!(categories[1].top_3_coins.is_empty());
    }

    #[test]
    fn test_coin_overview_price() {
        let json = r#"{"id": "bitcoin", "symbol": "btc", "name": "Bitcoin",
                       "image": {"large": "l.png"},
                       "market_data": {"current_price": {"usd": 89000.5, "eur": 82000.0}}}"#;
        let coin: CoinOverview = serde_json::from_str(json).unwrap();
        assert_eq!(coin.current_price("usd"), Some(89000.5));
        assert_eq!(coin.current_price("jpy"), None);
    }

    #[test]
    fn test_markets_rows() {
        let json = r#"[{"id": "bitcoin", "symbol": "btc", "name": "Bitcoin", "image": "b.png",
                        "current_price": 89000.5, "market_cap": 1.7e12, "market_cap_rank": 1,
                        "price_change_percentage_24h": -2.25, "roi": null},
                       {"id": "tiny", "symbol": "tny", "name": "Tiny",
                        "current_price": null, "price_change_percentage_24h": null}]"#;
        let coins: Vec<MarketCoin> = serde_json::from_str(json).unwrap();
        assert_eq!(coins[0].price_change_percentage_24h, Some(-2.25));
        assert_eq!(coins[0].market_cap_rank, Some(1));
        assert_eq!(coins[1].current_price, None);
        assert_eq!(coins[1].price_change_percentage_24h, None);
    }

    #[test]
    fn test_market_chart_prices() {
        let json = r#"{"prices": [[1704067200000, 42000.0], [1704070800000, 42100.0]],
                       "market_caps": [], "total_volumes": []}"#;
        let chart: MarketChart = serde_json::from_str(json).unwrap();
        assert_eq!(chart.prices.len(), 2);
        assert_eq!(chart.prices[1].hour(), 1);
    }
}
