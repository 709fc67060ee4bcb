use anyhow::Context;
use blockscout_service_launcher::{
    database::{DatabaseConnectSettings, DatabaseSettings},
    launcher::{ConfigSettings, MetricsSettings, ServerSettings},
    tracing::{JaegerSettings, TracingSettings},
};
use chain_metrics_logic::NormalizerSettings;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub metrics: MetricsSettings,
    #[serde(default)]
    pub tracing: TracingSettings,
    #[serde(default)]
    pub jaeger: JaegerSettings,

    pub database: DatabaseSettings,
    #[serde(default)]
    pub normalizer: NormalizerSettings,
    #[serde(default)]
    pub trend: TrendSettings,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TrendSettings {
    /// Lookback used by trend queries that do not pass `days`.
    pub default_lookback_days: u32,
}

impl Default for TrendSettings {
    fn default() -> Self {
        Self {
            default_lookback_days: 30,
        }
    }
}

impl ConfigSettings for Settings {
    const SERVICE_NAME: &'static str = "CHAIN_METRICS";

    fn validate(&self) -> anyhow::Result<()> {
        self.normalizer
            .validate()
            .context("invalid normalizer settings")?;
        if self.trend.default_lookback_days == 0 {
            anyhow::bail!("trend: default_lookback_days must be positive");
        }
        Ok(())
    }
}

impl Settings {
    pub fn default(database_url: String) -> Self {
        Self {
            server: Default::default(),
            metrics: Default::default(),
            tracing: Default::default(),
            jaeger: Default::default(),
            database: DatabaseSettings {
                connect: DatabaseConnectSettings::Url(database_url),
                connect_options: Default::default(),
                create_database: Default::default(),
                run_migrations: true,
            },
            normalizer: Default::default(),
            trend: Default::default(),
        }
    }
}
