//! Weather tools backed by Open-Meteo.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::traits::Tool;
use crate::open_meteo::{condition_for, CurrentConditions, OpenMeteoClient};

pub const GET_WEATHER_FROM_COORDS: &str = "get_weather_from_coords";
pub const GET_WEATHER: &str = "get_weather";

pub const LOCATION_NOT_FOUND: &str = "Location not found";
pub const FETCH_FAILED: &str = "Failed to fetch weather data";

// ---------------------------------------------------------------------------
// get_weather_from_coords
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CoordsArgs {
    latitude: f64,
    longitude: f64,
}

/// Current temperature at a coordinate pair. Upstream failures propagate.
#[derive(Debug, Clone)]
pub struct WeatherFromCoordsTool {
    client: OpenMeteoClient,
}

impl WeatherFromCoordsTool {
    pub fn new(client: OpenMeteoClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for WeatherFromCoordsTool {
    fn name(&self) -> &str {
        GET_WEATHER_FROM_COORDS
    }

    fn description(&self) -> &str {
        "Get the current weather"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "latitude": {
                    "type": "number"
                },
                "longitude": {
                    "type": "number"
                }
            },
            "required": ["latitude", "longitude"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<String> {
        let args: CoordsArgs =
            serde_json::from_value(args).context("Expected numeric 'latitude' and 'longitude'")?;

        let data = self.client.forecast_raw(args.latitude, args.longitude).await?;
        let temp = data
            .get("current")
            .and_then(|current| current.get("temperature_2m"))
            .cloned()
            .unwrap_or(serde_json::Value::Null);

        Ok(json!({ "temp": temp }).to_string())
    }
}

// ---------------------------------------------------------------------------
// get_weather
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct LocationArgs {
    location: String,
}

/// Formatted weather report. Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub location: String,
    pub temperature: String,
    pub condition: String,
    pub humidity: String,
    pub wind: String,
}

impl WeatherReport {
    /// Null or missing values still produce a report: a null temperature
    /// reads "0°C", a missing one "NaN°C", and humidity and wind show
    /// "null" or "undefined" before their unit.
    pub fn new(location: &str, current: &CurrentConditions) -> Self {
        let temperature = round_half_up(numeric_value(current.temperature_2m.as_ref()));
        let code = display_value(current.weather_code.as_ref()).parse::<i64>().ok();

        Self {
            location: location.to_string(),
            temperature: format!("{}°C", display_number(temperature)),
            condition: condition_for(code).to_string(),
            humidity: format!("{}%", display_value(current.relative_humidity_2m.as_ref())),
            wind: format!("{} km/h", display_value(current.wind_speed_10m.as_ref())),
        }
    }
}

#[derive(Debug, Serialize)]
struct WeatherErrorPayload<'a> {
    location: &'a str,
    error: &'a str,
}

/// Round to the nearest integer, with halves going towards positive infinity.
fn round_half_up(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Numeric reading of an upstream value: null is 0, anything unreadable is NaN.
fn numeric_value(value: Option<&serde_json::Value>) -> f64 {
    match value {
        Some(serde_json::Value::Null) => 0.0,
        Some(serde_json::Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => 0.0,
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

fn display_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".into()
    } else if n.is_infinite() {
        String::from(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n == 0.0 {
        "0".into()
    } else {
        n.to_string()
    }
}

/// Text an upstream value contributes to a formatted field.
fn display_value(value: Option<&serde_json::Value>) -> String {
    match value {
        None => "undefined".into(),
        Some(serde_json::Value::Null) => "null".into(),
        Some(serde_json::Value::Bool(b)) => b.to_string(),
        Some(serde_json::Value::Number(n)) => display_number(n.as_f64().unwrap_or(f64::NAN)),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                serde_json::Value::Null => String::new(),
                other => display_value(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(serde_json::Value::Object(_)) => "[object Object]".into(),
    }
}

/// Current conditions for a place name. Every failure becomes an error payload.
#[derive(Debug, Clone)]
pub struct WeatherTool {
    client: OpenMeteoClient,
}

impl WeatherTool {
    pub fn new(client: OpenMeteoClient) -> Self {
        Self { client }
    }

    async fn lookup(&self, location: &str) -> Result<String> {
        let Some(coords) = self.client.geocode(location).await? else {
            return error_payload(location, LOCATION_NOT_FOUND);
        };

        let current = self.client.current_conditions(coords).await?;
        let report = WeatherReport::new(location, &current);
        serde_json::to_string(&report).context("Failed to serialize weather report")
    }
}

fn error_payload(location: &str, error: &str) -> Result<String> {
    serde_json::to_string(&WeatherErrorPayload { location, error })
        .context("Failed to serialize error payload")
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        GET_WEATHER
    }

    fn description(&self) -> &str {
        "Get the current weather for a location"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "The city name, e.g. Amsterdam, New York, etc."
                }
            },
            "required": ["location"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<String> {
        let args: LocationArgs =
            serde_json::from_value(args).context("Expected a string 'location'")?;

        match self.lookup(&args.location).await {
            Ok(output) => Ok(output),
            Err(e) => {
                error!("Error getting weather data for '{}': {:#}", args.location, e);
                error_payload(&args.location, FETCH_FAILED)
            }
        }
    }
}
