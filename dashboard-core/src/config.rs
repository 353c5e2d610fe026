use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{fmt, fs, path::Path, path::PathBuf};
use tracing::{debug, info};

pub const DEFAULT_CITY: &str = "Delhi";
pub const DEFAULT_CURRENCY: &str = "USD";

pub const NEWS_API_KEY_VAR: &str = "NEWS_API_KEY";
pub const WEATHER_API_KEY_VAR: &str = "WEATHER_API_KEY";
pub const CRYPTO_API_KEY_VAR: &str = "CRYPTO_API_KEY";
pub const CITY_VAR: &str = "DASHBOARD_CITY";
pub const CURRENCY_VAR: &str = "BASE_CURRENCY";

/// An API key. Formatting never reveals the value; use [`ApiKey::expose`]
/// when building a request.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Optional settings file stored on disk.
///
/// Example TOML:
/// city = "Mumbai"
/// base_currency = "EUR"
/// news_api_key = "..."
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub news_api_key: Option<ApiKey>,
    pub weather_api_key: Option<ApiKey>,
    pub crypto_api_key: Option<ApiKey>,
    pub city: Option<String>,
    pub base_currency: Option<String>,
}

impl FileSettings {
    /// Load the settings file, or return an empty default if it doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        Self::from_path(&path)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let file: FileSettings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(file)
    }

    /// Path to the settings file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "api-dashboard", "api-dashboard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Resolved configuration for one dashboard render.
///
/// Built once and never mutated; overrides produce a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    news_api_key: Option<ApiKey>,
    weather_api_key: Option<ApiKey>,
    crypto_api_key: Option<ApiKey>,
    city: String,
    base_currency: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            news_api_key: None,
            weather_api_key: None,
            crypto_api_key: None,
            city: DEFAULT_CITY.to_string(),
            base_currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the settings file, a `.env` file and the process
    /// environment, in increasing order of precedence.
    pub fn load() -> Result<Self> {
        // Variables already set in the environment win over `.env`.
        if let Ok(path) = dotenv::dotenv() {
            debug!(path = %path.display(), "Loaded .env file");
        }

        let file = FileSettings::load()?;
        let settings = Self::resolve(file, |name| std::env::var(name).ok());
        settings.log_summary();

        Ok(settings)
    }

    /// Layer `lookup` (usually the environment) over `file` over the defaults.
    pub fn resolve<F>(file: FileSettings, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let key = |name: &str, fallback: Option<ApiKey>| var(name).map(ApiKey).or(fallback);
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        Self {
            news_api_key: key(NEWS_API_KEY_VAR, file.news_api_key),
            weather_api_key: key(WEATHER_API_KEY_VAR, file.weather_api_key),
            crypto_api_key: key(CRYPTO_API_KEY_VAR, file.crypto_api_key),
            city: var(CITY_VAR)
                .or(non_empty(file.city))
                .unwrap_or_else(|| DEFAULT_CITY.to_string()),
            base_currency: var(CURRENCY_VAR)
                .or(non_empty(file.base_currency))
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        }
    }

    /// Return a copy with the given city and currency, where provided.
    /// Empty overrides are ignored.
    pub fn with_overrides(&self, city: Option<&str>, currency: Option<&str>) -> Self {
        let pick = |value: Option<&str>, current: &str| match value {
            Some(v) if !v.trim().is_empty() => v.to_string(),
            _ => current.to_string(),
        };

        Self {
            city: pick(city, &self.city),
            base_currency: pick(currency, &self.base_currency),
            ..self.clone()
        }
    }

    pub fn news_api_key(&self) -> Option<&ApiKey> {
        self.news_api_key.as_ref()
    }

    pub fn crypto_api_key(&self) -> Option<&ApiKey> {
        self.crypto_api_key.as_ref()
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// Currency code as configured, e.g. "USD" or "eur".
    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    /// Currency code in the form the price provider keys its results by.
    pub fn currency_key(&self) -> String {
        self.base_currency.to_lowercase()
    }

    fn log_summary(&self) {
        info!(
            city = %self.city,
            currency = %self.base_currency,
            news_api_key = self.news_api_key.is_some(),
            weather_api_key = self.weather_api_key.is_some(),
            crypto_api_key = self.crypto_api_key.is_some(),
            "Loaded settings"
        );
    }
}
