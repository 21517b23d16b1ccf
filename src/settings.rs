use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

use crate::content::sections::Markers;

/// Runtime settings, read from `NOTION_*` and `GUEST_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub token: String,
    pub database_id: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_name_property")]
    pub name_property: String,
    #[serde(default = "default_date_property")]
    pub date_property: String,
    #[serde(default = "default_topic_marker")]
    pub topic_marker: String,
    #[serde(default = "default_stop_marker")]
    pub stop_marker: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.notion.com".into()
}

fn default_version() -> String {
    "2022-06-28".into()
}

fn default_name_property() -> String {
    "Name".into()
}

fn default_date_property() -> String {
    "Recording Date".into()
}

fn default_topic_marker() -> String {
    "topic".into()
}

fn default_stop_marker() -> String {
    "pre-recording".into()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_config(
            Config::builder()
                .add_source(Environment::with_prefix("NOTION"))
                .add_source(Environment::with_prefix("GUEST"))
                .build()
                .context("Failed to read environment")?,
        )
    }

    fn from_config(config: Config) -> Result<Self> {
        config
            .try_deserialize()
            .context("Invalid settings (check NOTION_* and GUEST_* variables)")
    }

    pub fn markers(&self) -> Markers {
        Markers {
            topic: self.topic_marker.to_lowercase(),
            stop: self.stop_marker.to_lowercase(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
pub fn test_settings(api_url: &str) -> Settings {
    Settings {
        token: "secret_test".into(),
        database_id: "db123".into(),
        api_url: api_url.to_string(),
        version: default_version(),
        name_property: default_name_property(),
        date_property: default_date_property(),
        topic_marker: default_topic_marker(),
        stop_marker: default_stop_marker(),
        timeout_secs: 5,
    }
}
