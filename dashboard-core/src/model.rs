use serde_json::{Number, Value};

use crate::response::Payload;

/// Current conditions pulled out of a weather payload.
///
/// Values stay as the provider wrote them so `21.0` still prints as `21.0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherResult {
    pub temperature_celsius: Option<Number>,
    pub wind_speed_kmh: Option<Number>,
}

impl WeatherResult {
    /// Reads `current_weather.temperature` and `current_weather.windspeed`.
    /// Anything missing or non-numeric is left as `None`.
    pub fn from_payload(payload: &Payload) -> Self {
        let current = payload.get("current_weather");
        let number = |field: &str| match current.and_then(|c| c.get(field)) {
            Some(Value::Number(n)) => Some(n.clone()),
            _ => None,
        };

        Self {
            temperature_celsius: number("temperature"),
            wind_speed_kmh: number("windspeed"),
        }
    }
}

/// Prices for one coin, keyed by lower-case currency code.
#[derive(Debug, Clone, PartialEq)]
pub struct CoinPrices {
    pub coin_id: String,
    pub prices: Vec<(String, Number)>,
}

impl CoinPrices {
    pub fn price(&self, currency_key: &str) -> Option<&Number> {
        self.prices
            .iter()
            .find(|(currency, _)| currency == currency_key)
            .map(|(_, price)| price)
    }
}

/// Coin id -> currency -> price, in the order the provider returned them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CryptoPriceMap {
    coins: Vec<CoinPrices>,
}

impl CryptoPriceMap {
    pub fn from_payload(payload: &Payload) -> Self {
        let coins = payload
            .iter()
            .map(|(coin_id, quotes)| CoinPrices {
                coin_id: coin_id.clone(),
                prices: quotes
                    .as_object()
                    .map(|quotes| {
                        quotes
                            .iter()
                            .filter_map(|(currency, price)| match price {
                                Value::Number(p) => Some((currency.clone(), p.clone())),
                                _ => None,
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect();

        Self { coins }
    }

    pub fn coins(&self) -> &[CoinPrices] {
        &self.coins
    }

    pub fn price(&self, coin_id: &str, currency_key: &str) -> Option<&Number> {
        self.coins
            .iter()
            .find(|c| c.coin_id == coin_id)
            .and_then(|c| c.price(currency_key))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsArticle {
    pub title: Option<String>,
}

impl NewsArticle {
    pub fn from_value(value: &Value) -> Self {
        let title = value
            .get("title")
            .and_then(Value::as_str)
            .map(str::to_string);

        Self { title }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            _ => panic!("test payload must be an object"),
        }
    }

    #[test]
    fn weather_reads_current_conditions() {
        let weather = WeatherResult::from_payload(&payload(json!({
            "latitude": 28.625,
            "current_weather": { "temperature": 21.5, "windspeed": 10, "weathercode": 3 }
        })));

        assert_eq!(weather.temperature_celsius.and_then(|t| t.as_f64()), Some(21.5));
        assert_eq!(weather.wind_speed_kmh.map(|w| w.to_string()).as_deref(), Some("10"));
    }

    #[test]
    fn weather_without_current_block_is_empty() {
        let weather = WeatherResult::from_payload(&payload(json!({ "latitude": 1.0 })));
        assert_eq!(weather, WeatherResult::default());
    }

    #[test]
    fn weather_ignores_non_numeric_fields() {
        let weather = WeatherResult::from_payload(&payload(json!({
            "current_weather": { "temperature": "warm" }
        })));

        assert_eq!(weather.temperature_celsius, None);
        assert_eq!(weather.wind_speed_kmh, None);
    }

    #[test]
    fn crypto_keeps_provider_order() {
        let prices = CryptoPriceMap::from_payload(&payload(json!({
            "ethereum": { "usd": 3000.5 },
            "bitcoin": { "usd": 50000, "eur": 46000 }
        })));

        let ids: Vec<&str> = prices.coins().iter().map(|c| c.coin_id.as_str()).collect();
        assert_eq!(ids, ["ethereum", "bitcoin"]);
        assert_eq!(prices.price("bitcoin", "eur"), Some(&Number::from(46000)));
        assert_eq!(prices.price("ethereum", "eur"), None);
        assert_eq!(prices.price("dogecoin", "usd"), None);
    }

    #[test]
    fn weather_keeps_provider_number_text() {
        let weather = WeatherResult::from_payload(&payload(json!({
            "current_weather": { "temperature": 21.0, "windspeed": 7 }
        })));

        assert_eq!(weather.temperature_celsius.map(|t| t.to_string()).as_deref(), Some("21.0"));
        assert_eq!(weather.wind_speed_kmh.map(|w| w.to_string()).as_deref(), Some("7"));
    }

    #[test]
    fn crypto_entry_that_is_not_an_object_has_no_prices() {
        let prices = CryptoPriceMap::from_payload(&payload(json!({ "bitcoin": 5 })));

        assert_eq!(prices.coins().len(), 1);
        assert!(prices.coins()[0].prices.is_empty());
    }

    #[test]
    fn article_title_is_optional() {
        assert_eq!(
            NewsArticle::from_value(&json!({ "title": "Chip news", "url": "https://x" })).title,
            Some("Chip news".to_string())
        );
        assert_eq!(NewsArticle::from_value(&json!({ "title": null })).title, None);
        assert_eq!(NewsArticle::from_value(&json!("not an article")).title, None);
    }
}
