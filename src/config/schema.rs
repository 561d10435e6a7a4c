//! Configuration schema for config.toml.

use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeteoConfig {
    /// Open-Meteo forecast endpoint.
    pub forecast_api_url: String,

    /// Open-Meteo geocoding endpoint.
    pub geocoding_api_url: String,

    /// User-Agent header sent with every upstream request.
    pub user_agent: String,

    /// Log level (debug, info, warn, error).
    pub log_level: String,
}

impl Default for MeteoConfig {
    fn default() -> Self {
        Self {
            forecast_api_url: "https://api.open-meteo.com/v1/forecast".into(),
            geocoding_api_url: "https://geocoding-api.open-meteo.com/v1/search".into(),
            user_agent: concat!("meteo-tools/", env!("CARGO_PKG_VERSION")).into(),
            log_level: "info".into(),
        }
    }
}
