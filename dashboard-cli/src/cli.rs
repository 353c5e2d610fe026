use anyhow::Context;
use clap::Parser;
use dashboard_core::{DEFAULT_HEADLINE_LIMIT, HttpProvider, Settings, build_report};
use tracing::error;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "api-dashboard",
    version,
    about = "Weather, crypto prices and tech headlines in one console report"
)]
pub struct Cli {
    /// Override the city for weather (default: $DASHBOARD_CITY or Delhi).
    #[arg(long)]
    pub city: Option<String>,

    /// Override the currency for crypto prices (default: $BASE_CURRENCY or USD).
    #[arg(long)]
    pub currency: Option<String>,
}

impl Cli {
    /// Apply the command-line overrides on top of loaded settings.
    pub fn apply(&self, settings: &Settings) -> Settings {
        settings.with_overrides(self.city.as_deref(), self.currency.as_deref())
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let settings = self.apply(&Settings::load().context("Failed to load settings")?);
        let provider = HttpProvider::new()?;

        let report = build_report(&provider, &settings, DEFAULT_HEADLINE_LIMIT)
            .await
            .inspect_err(|err| error!(error = %err, "Dashboard could not be rendered"))?;

        print!("{report}");
        Ok(())
    }
}
