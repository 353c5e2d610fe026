use serde_json::Number;
use std::fmt;
use tracing::debug;

use crate::{
    ClientResult, CryptoPriceMap, NewsArticle, Settings, WeatherResult,
    provider::{DashboardProvider, crypto::DEFAULT_SYMBOLS},
};

/// Headlines shown when the caller doesn't ask for a different number.
pub const DEFAULT_HEADLINE_LIMIT: usize = 5;

const WIDTH: usize = 60;
const TITLE: &str = " API Dashboard ";
const HEADLINE_WIDTH: usize = 70;
const ELLIPSIS: &str = "...";
const MISSING: &str = "N/A";
const UNTITLED: &str = "Untitled";

/// Everything one dashboard run shows, already pulled out of the payloads.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub city: String,
    pub currency: String,
    pub currency_key: String,
    pub weather: WeatherResult,
    pub crypto: CryptoPriceMap,
    pub headlines: Vec<NewsArticle>,
}

/// Call weather, crypto and news in that order and collect the results.
///
/// The first failure is returned as-is; later providers are not called and
/// no partial report is produced.
pub async fn build_report(
    provider: &dyn DashboardProvider,
    settings: &Settings,
    limit: usize,
) -> ClientResult<Report> {
    let weather = provider.fetch_weather(settings).await?;
    let crypto = provider.fetch_crypto_prices(settings, DEFAULT_SYMBOLS).await?;
    let news = provider.fetch_top_headlines(settings, limit).await?;

    debug!(coins = crypto.len(), articles = news.len(), "All providers answered");

    Ok(Report {
        city: settings.city().to_string(),
        currency: settings.base_currency().to_string(),
        currency_key: settings.currency_key(),
        weather: WeatherResult::from_payload(&weather),
        crypto: CryptoPriceMap::from_payload(&crypto),
        headlines: news.iter().take(limit).map(NewsArticle::from_value).collect(),
    })
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(WIDTH);

        writeln!(f, "{rule}")?;
        writeln!(f, "{TITLE:=^WIDTH$}")?;
        writeln!(f, "{rule}")?;

        writeln!(f, "\n[Weather]")?;
        writeln!(f, "City: {}", self.city)?;
        writeln!(f, "Temperature: {}°C", or_missing(self.weather.temperature_celsius.as_ref()))?;
        writeln!(f, "Wind: {} km/h", or_missing(self.weather.wind_speed_kmh.as_ref()))?;

        writeln!(f, "\n[Crypto]")?;
        for coin in self.crypto.coins() {
            writeln!(
                f,
                "{:<10} {} {}",
                title_case(&coin.coin_id),
                or_missing(coin.price(&self.currency_key)),
                self.currency
            )?;
        }

        writeln!(f, "\n[Top Tech News]")?;
        for (idx, article) in self.headlines.iter().enumerate() {
            let title = article.title.as_deref().unwrap_or(UNTITLED);
            writeln!(f, "{}. {}", idx + 1, shorten(title, HEADLINE_WIDTH))?;
        }

        writeln!(f, "\n{rule}")
    }
}

fn or_missing(value: Option<&Number>) -> String {
    value.map_or_else(|| MISSING.to_string(), Number::to_string)
}

/// Upper-case the first letter of every word, lower-case the rest.
/// "bitcoin-cash" becomes "Bitcoin-Cash".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Collapse whitespace and fit `text` into `width` characters, cutting at a
/// word boundary and ending with "..." when anything was dropped.
pub fn shorten(text: &str, width: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let collapsed = words.join(" ");
    if collapsed.chars().count() <= width {
        return collapsed;
    }

    let budget = width.saturating_sub(ELLIPSIS.len());
    let mut out = String::new();
    let mut used = 0;
    for word in &words {
        let len = word.chars().count();
        let needed = if out.is_empty() { len } else { len + 1 };
        if used + needed > budget {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
        used += needed;
    }

    // A single word longer than the budget gets cut mid-word.
    if out.is_empty() {
        out = collapsed.chars().take(budget).collect();
    }

    out.push_str(ELLIPSIS);
    out
}
