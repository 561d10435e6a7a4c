//! Open-Meteo API client for geocoding and current-conditions forecasts.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::MeteoConfig;
use crate::types::Coordinates;

/// Fields requested by the coordinate lookup.
const COORDS_CURRENT_FIELDS: &str = "temperature_2m,wind_speed_10m";
const COORDS_HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m";

/// Fields requested by the location lookup.
const CONDITIONS_CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,wind_speed_10m,weather_code";

/// Open-Meteo API client.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    forecast_url: String,
    geocoding_url: String,
    http: reqwest::Client,
}

// -- Response types ----------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionsResponse {
    current: serde_json::Map<String, serde_json::Value>,
}

/// Current conditions block of a forecast response, as sent.
///
/// `None` means the field was absent; `Some(Value::Null)` means upstream
/// reported it as null. Open-Meteo nulls values it has no data for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentConditions {
    pub temperature_2m: Option<serde_json::Value>,
    pub relative_humidity_2m: Option<serde_json::Value>,
    pub wind_speed_10m: Option<serde_json::Value>,
    pub weather_code: Option<serde_json::Value>,
}

impl CurrentConditions {
    fn from_block(block: &serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            temperature_2m: block.get("temperature_2m").cloned(),
            relative_humidity_2m: block.get("relative_humidity_2m").cloned(),
            wind_speed_10m: block.get("wind_speed_10m").cloned(),
            weather_code: block.get("weather_code").cloned(),
        }
    }
}

impl OpenMeteoClient {
    /// Create a client against explicit endpoint URLs.
    pub fn new(forecast_url: &str, geocoding_url: &str, user_agent: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::with_http(forecast_url, geocoding_url, http))
    }

    /// Create a client around an already configured `reqwest::Client`.
    pub fn with_http(forecast_url: &str, geocoding_url: &str, http: reqwest::Client) -> Self {
        Self {
            forecast_url: forecast_url.trim_end_matches('/').to_string(),
            geocoding_url: geocoding_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Create a client from the loaded configuration.
    pub fn from_config(config: &MeteoConfig) -> Result<Self> {
        Self::new(
            &config.forecast_api_url,
            &config.geocoding_api_url,
            &config.user_agent,
        )
    }

    /// Fetch the raw forecast body for a coordinate pair.
    ///
    /// The body is parsed as JSON whatever the HTTP status, so upstream
    /// error objects reach the caller uninterpreted.
    pub async fn forecast_raw(&self, latitude: f64, longitude: f64) -> Result<serde_json::Value> {
        debug!("Open-Meteo forecast: {}, {}", latitude, longitude);

        let resp = self
            .http
            .get(&self.forecast_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", COORDS_CURRENT_FIELDS.to_string()),
                ("hourly", COORDS_HOURLY_FIELDS.to_string()),
            ])
            .send()
            .await
            .context("Open-Meteo forecast request failed")?;

        let status = resp.status();
        if !status.is_success() {
            warn!("Open-Meteo forecast returned {}", status);
        }

        let body = resp
            .text()
            .await
            .context("Failed to read forecast response body")?;
        serde_json::from_str(&body).context("Failed to parse forecast response")
    }

    /// Resolve a place name to the coordinates of its best match.
    ///
    /// Returns `Ok(None)` when the geocoder has no results for `name`.
    pub async fn geocode(&self, name: &str) -> Result<Option<Coordinates>> {
        debug!("Open-Meteo geocode: {}", name);

        let resp = self
            .http
            .get(&self.geocoding_url)
            .query(&[("name", name), ("count", "1")])
            .send()
            .await
            .context("Open-Meteo geocoding request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("Open-Meteo geocoding failed ({}): {}", status, body);
        }

        let body: GeocodingResponse = resp
            .json()
            .await
            .context("Failed to parse geocoding response")?;

        Ok(body
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|r| Coordinates {
                latitude: r.latitude,
                longitude: r.longitude,
            }))
    }

    /// Fetch temperature, humidity, wind speed and weather code for a location.
    ///
    /// Fails when the body has no `current` object; individual fields may
    /// still be null or missing.
    pub async fn current_conditions(&self, coords: Coordinates) -> Result<CurrentConditions> {
        debug!(
            "Open-Meteo current conditions: {}, {}",
            coords.latitude, coords.longitude
        );

        let resp = self
            .http
            .get(&self.forecast_url)
            .query(&[
                ("latitude", coords.latitude.to_string()),
                ("longitude", coords.longitude.to_string()),
                ("current", CONDITIONS_CURRENT_FIELDS.to_string()),
            ])
            .send()
            .await
            .context("Open-Meteo forecast request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("Open-Meteo forecast failed ({}): {}", status, body);
        }

        let body: ConditionsResponse = resp
            .json()
            .await
            .context("Failed to parse forecast response")?;
        Ok(CurrentConditions::from_block(&body.current))
    }
}
