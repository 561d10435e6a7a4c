//! meteo-tools: weather function tools for LLM orchestrators.
//!
//! Two tools, `get_weather_from_coords` and `get_weather`, are exposed
//! through a [`tools::ToolRegistry`] and answer with JSON-encoded strings
//! built from the Open-Meteo geocoding and forecast APIs.

pub mod config;
pub mod open_meteo;
pub mod tools;
pub mod types;
