// 24h price change mapped onto a dial.
use crate::models::coingecko::{MarketCoin, TrendingCoin};
use serde::Serialize;

/// How a 24h change in percent is spread over the dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GaugeScale {
    /// `(change + 10) * 5`, clamped to 0..=100: -10% reads 0, +10% reads 100.
    Single,
    /// `(change + 5) * 10`, clamped to 10..=95. Used when several coins share a panel.
    Grouped,
}

impl GaugeScale {
    fn offset(&self) -> f64 {
        match self {
            GaugeScale::Single => 10.0,
            GaugeScale::Grouped => 5.0,
        }
    }

    fn factor(&self) -> f64 {
        match self {
            GaugeScale::Single => 5.0,
            GaugeScale::Grouped => 10.0,
        }
    }

    fn bounds(&self) -> (f64, f64) {
        match self {
            GaugeScale::Single => (0.0, 100.0),
            GaugeScale::Grouped => (10.0, 95.0),
        }
    }
}

/// Dial position for `change_24h` (percent). `None` when the change is not a number.
pub fn gauge_percentage(change_24h: f64, scale: GaugeScale) -> Option<u32> {
    if !change_24h.is_finite() {
        return None;
    }
    let (min, max) = scale.bounds();
    let raw = (change_24h + scale.offset()) * scale.factor();
    Some(raw.clamp(min, max).round() as u32)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gauge {
    pub coin_id: String,
    pub name: String,
    pub symbol: String,
    pub current_price: Option<f64>,
    pub change_24h: Option<f64>,
    pub scale: GaugeScale,
    /// Absent when the provider reported no 24h change.
    pub percentage: Option<u32>,
}

impl Gauge {
    pub fn from_market(coin: &MarketCoin, scale: GaugeScale) -> Self {
        Gauge {
            coin_id: coin.id.clone(),
            name: coin.name.clone(),
            symbol: coin.symbol.clone(),
            current_price: coin.current_price,
            change_24h: coin.price_change_percentage_24h,
            scale,
            percentage: coin
                .price_change_percentage_24h
                .and_then(|change| gauge_percentage(change, scale)),
        }
    }

    pub fn from_trending(coin: &TrendingCoin, vs_currency: &str, scale: GaugeScale) -> Self {
        let change = coin.change_24h(vs_currency);
        Gauge {
            coin_id: coin.id.clone(),
            name: coin.name.clone(),
            symbol: coin.symbol.clone(),
            current_price: coin.data.as_ref().and_then(|d| d.price),
            change_24h: change,
            scale,
            percentage: change.and_then(|c| gauge_percentage(c, scale)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::coingecko::TrendingCoinData;
    use std::collections::HashMap;

    fn market_coin(change: Option<f64>) -> MarketCoin {
        MarketCoin {
            id: "bitcoin".to_string(),
            symbol: "btc".to_string(),
            name: "Bitcoin".to_string(),
            image: None,
            current_price: Some(89000.0),
            market_cap: None,
            market_cap_rank: Some(1),
            price_change_percentage_24h: change,
        }
    }

    #[test]
    fn test_single_scale() {
        assert_eq!(gauge_percentage(0.0, GaugeScale::Single), Some(50));
        assert_eq!(gauge_percentage(2.5, GaugeScale::Single), Some(63));
        assert_eq!(gauge_percentage(-3.0, GaugeScale::Single), Some(35));
    }

    #[test]
    fn test_single_scale_clamps() {
        assert_eq!(gauge_percentage(-10.0, GaugeScale::Single), Some(0));
        assert_eq!(gauge_percentage(-40.0, GaugeScale::Single), Some(0));
        assert_eq!(gauge_percentage(10.0, GaugeScale::Single), Some(100));
        assert_eq!(gauge_percentage(250.0, GaugeScale::Single), Some(100));
    }

    #[test]
    fn test_grouped_scale_clamps() {
        assert_eq!(gauge_percentage(0.0, GaugeScale::Grouped), Some(50));
        assert_eq!(gauge_percentage(-4.0, GaugeScale::Grouped), Some(10));
        assert_eq!(gauge_percentage(-20.0, GaugeScale::Grouped), Some(10));
        assert_eq!(gauge_percentage(4.5, GaugeScale::Grouped), Some(95));
        assert_eq!(gauge_percentage(30.0, GaugeScale::Grouped), Some(95));
        assert_eq!(gauge_percentage(-3.0, GaugeScale::Grouped), Some(20));
    }

    #[test]
    fn test_non_finite_change_has_no_reading() {
        assert_eq!(gauge_percentage(f64::NAN, GaugeScale::Single), None);
        assert_eq!(gauge_percentage(f64::INFINITY, GaugeScale::Grouped), None);
    }

    #[test]
    fn test_gauge_from_market() {
        let gauge = Gauge::from_market(&market_coin(Some(-1.0)), GaugeScale::Single);
        assert_eq!(gauge.percentage, Some(45));
        assert_eq!(gauge.current_price, Some(89000.0));

        let missing = Gauge::from_market(&market_coin(None), GaugeScale::Grouped);
        assert_eq!(missing.percentage, None);
        assert_eq!(missing.scale, GaugeScale::Grouped);
    }

    #[test]
    fn test_gauge_from_trending_uses_vs_currency() {
        let mut changes = HashMap::new();
        changes.insert("usd".to_string(), 4.0);
        let coin = TrendingCoin {
            id: "pepe".to_string(),
            name: "Pepe".to_string(),
            symbol: "PEPE".to_string(),
            market_cap_rank: None,
            thumb: None,
            large: None,
            data: Some(TrendingCoinData { price: Some(0.00001), price_change_percentage_24h: changes }),
        };
        assert_eq!(Gauge::from_trending(&coin, "usd", GaugeScale::Single).percentage, Some(70));
        assert_eq!(Gauge::from_trending(&coin, "eur", GaugeScale::Single).percentage, None);
    }

    #[test]
    fn test_gauge_serializes_camel_case() {
        let json = serde_json::to_value(Gauge::from_market(&market_coin(Some(0.0)), GaugeScale::Single)).unwrap();
        assert_eq!(json["coinId"], "bitcoin");
        assert_eq!(json["change24h"], 0.0);
        assert_eq!(json["scale"], "single");
        assert_eq!(json["percentage"], 50);
    }
}
