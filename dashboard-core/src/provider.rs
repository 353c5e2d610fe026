use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::{fmt::Debug, time::Duration};

use crate::{ClientResult, Payload, Settings};

pub mod crypto;
pub mod news;
pub mod weather;

/// Every provider request gives up after this long. There are no retries.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent string for HTTP requests
pub const USER_AGENT: &str = concat!("api-dashboard/", env!("CARGO_PKG_VERSION"));

/// The three data sources behind the dashboard.
///
/// Payloads come back as decoded but otherwise unmodified JSON; picking
/// fields out of them is the renderer's job.
#[async_trait]
pub trait DashboardProvider: Send + Sync + Debug {
    async fn fetch_weather(&self, settings: &Settings) -> ClientResult<Payload>;

    async fn fetch_crypto_prices(
        &self,
        settings: &Settings,
        symbols: &[&str],
    ) -> ClientResult<Payload>;

    /// The `articles` array of the headlines payload, empty if absent.
    async fn fetch_top_headlines(
        &self,
        settings: &Settings,
        limit: usize,
    ) -> ClientResult<Vec<Value>>;
}

/// Talks to Open-Meteo, CoinGecko and NewsAPI over HTTP.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    http: Client,
}

impl HttpProvider {
    pub fn new() -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { http })
    }
}

#[async_trait]
impl DashboardProvider for HttpProvider {
    async fn fetch_weather(&self, settings: &Settings) -> ClientResult<Payload> {
        self.weather(settings).await
    }

    async fn fetch_crypto_prices(
        &self,
        settings: &Settings,
        symbols: &[&str],
    ) -> ClientResult<Payload> {
        self.crypto_prices(settings, symbols).await
    }

    async fn fetch_top_headlines(
        &self,
        settings: &Settings,
        limit: usize,
    ) -> ClientResult<Vec<Value>> {
        self.top_headlines(settings, limit).await
    }
}

#[cfg(test)]
pub(crate) fn query_pairs(request: reqwest::RequestBuilder) -> Vec<(String, String)> {
    let request = request.build().expect("request should build");
    request.url().query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
}
