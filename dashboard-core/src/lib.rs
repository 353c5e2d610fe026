//! Core library for the `api-dashboard` CLI.
//!
//! This crate defines:
//! - Settings loading (settings file, `.env`, environment)
//! - HTTP clients for the weather, crypto price and news providers
//! - The shared response validator and `ClientError`
//! - The report model and its console rendering
//!
//! It is used by `dashboard-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod provider;
pub mod response;

pub use config::{ApiKey, FileSettings, Settings};
pub use dashboard::{DEFAULT_HEADLINE_LIMIT, Report, build_report};
pub use error::{ClientError, ClientResult};
pub use model::{CoinPrices, CryptoPriceMap, NewsArticle, WeatherResult};
pub use provider::{DashboardProvider, HttpProvider};
pub use response::{Payload, handle_response};
