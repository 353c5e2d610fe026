use reqwest::RequestBuilder;
use tracing::{debug, info};

use crate::{ClientResult, Payload, Settings, response::handle_response};

use super::HttpProvider;

const SIMPLE_PRICE_URL: &str = "https://api.coingecko.com/api/v3/simple/price";
const DEMO_KEY_HEADER: &str = "x-cg-demo-api-key";

/// Ticker symbols the dashboard shows when nothing else is asked for.
pub const DEFAULT_SYMBOLS: &[&str] = &["BTC", "ETH"];

const KNOWN_SYMBOLS: &[(&str, &str)] = &[
    ("BTC", "bitcoin"),
    ("ETH", "ethereum"),
    ("SOL", "solana"),
    ("BNB", "binancecoin"),
    ("XRP", "ripple"),
    ("ADA", "cardano"),
    ("DOGE", "dogecoin"),
    ("DOT", "polkadot"),
    ("LTC", "litecoin"),
    ("USDT", "tether"),
];

/// Map a ticker such as "BTC" to the CoinGecko id "bitcoin".
/// Anything unrecognised is assumed to already be an id.
pub fn coin_id_for_symbol(symbol: &str) -> String {
    let symbol = symbol.trim();
    KNOWN_SYMBOLS
        .iter()
        .find(|(ticker, _)| ticker.eq_ignore_ascii_case(symbol))
        .map(|(_, id)| id.to_string())
        .unwrap_or_else(|| symbol.to_lowercase())
}

/// Coin ids for `symbols`, blanks and duplicates dropped, order kept.
pub fn coin_ids(symbols: &[&str]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::with_capacity(symbols.len());
    for symbol in symbols.iter().filter(|s| !s.trim().is_empty()) {
        let id = coin_id_for_symbol(symbol);
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

impl HttpProvider {
    pub(crate) async fn crypto_prices(
        &self,
        settings: &Settings,
        symbols: &[&str],
    ) -> ClientResult<Payload> {
        info!(symbols = %symbols.join(", "), "Fetching crypto prices");

        let ids = coin_ids(symbols);
        if ids.is_empty() {
            debug!("No coins requested, skipping price lookup");
            return Ok(Payload::new());
        }

        let res = self.price_request(settings, &ids).send().await?;
        handle_response(res).await
    }

    fn price_request(&self, settings: &Settings, ids: &[String]) -> RequestBuilder {
        let request = self.http.get(SIMPLE_PRICE_URL).query(&[
            ("ids", ids.join(",")),
            ("vs_currencies", settings.currency_key()),
        ]);

        match settings.crypto_api_key() {
            Some(key) => request.header(DEMO_KEY_HEADER, key.expose()),
            None => request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileSettings, provider::query_pairs};

    #[test]
    fn tickers_map_to_coin_ids() {
        assert_eq!(coin_id_for_symbol("BTC"), "bitcoin");
        assert_eq!(coin_id_for_symbol("eth"), "ethereum");
        assert_eq!(coin_id_for_symbol("Monero"), "monero");
    }

    #[test]
    fn coin_ids_drop_duplicates_and_blanks() {
        assert_eq!(
            coin_ids(&["BTC", "bitcoin", " ", "ETH", "sol"]),
            ["bitcoin", "ethereum", "solana"]
        );
        assert!(coin_ids(&[]).is_empty());
    }

    #[test]
    fn price_request_honours_symbols_and_currency() {
        let provider = HttpProvider::new().unwrap();
        let settings = Settings::default().with_overrides(None, Some("EUR"));
        let ids = coin_ids(&["BTC", "DOGE"]);

        let pairs = query_pairs(provider.price_request(&settings, &ids));

        assert_eq!(
            pairs,
            [
                ("ids".to_string(), "bitcoin,dogecoin".to_string()),
                ("vs_currencies".to_string(), "eur".to_string()),
            ]
        );
    }

    #[test]
    fn api_key_goes_in_header_only_when_configured() {
        let provider = HttpProvider::new().unwrap();
        let ids = coin_ids(DEFAULT_SYMBOLS);

        let without = provider.price_request(&Settings::default(), &ids).build().unwrap();
        assert!(without.headers().get(DEMO_KEY_HEADER).is_none());

        let settings = Settings::resolve(FileSettings::default(), |name| {
            (name == "CRYPTO_API_KEY").then(|| "cg-demo".to_string())
        });
        let with = provider.price_request(&settings, &ids).build().unwrap();

        assert_eq!(with.headers()[DEMO_KEY_HEADER], "cg-demo");
        assert!(!with.url().as_str().contains("cg-demo"));
    }

    #[tokio::test]
    async fn empty_symbol_list_makes_no_request() {
        let provider = HttpProvider::new().unwrap();
        let payload = provider.crypto_prices(&Settings::default(), &[]).await.unwrap();

        assert!(payload.is_empty());
    }
}
