//! WMO weather interpretation codes as reported by Open-Meteo.

/// Condition text for codes without a table entry.
pub const UNKNOWN_CONDITION: &str = "Unknown";

/// Weather code → human-readable condition.
const WEATHER_CODES: &[(i64, &str)] = &[
    (0, "Clear sky"),
    (1, "Mainly clear"),
    (2, "Partly cloudy"),
    (3, "Overcast"),
    (45, "Fog"),
    (48, "Depositing rime fog"),
    (51, "Light drizzle"),
    (53, "Moderate drizzle"),
    (55, "Dense drizzle"),
    (61, "Slight rain"),
    (63, "Moderate rain"),
    (65, "Heavy rain"),
    (71, "Slight snow"),
    (73, "Moderate snow"),
    (75, "Heavy snow"),
    (80, "Slight rain showers"),
    (81, "Moderate rain showers"),
    (82, "Violent rain showers"),
    (95, "Thunderstorm"),
    (96, "Thunderstorm with slight hail"),
    (99, "Thunderstorm with heavy hail"),
];

/// Look up the condition for a weather code, falling back to "Unknown".
pub fn condition_for(code: Option<i64>) -> &'static str {
    code.and_then(|code| {
        WEATHER_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, text)| *text)
    })
    .unwrap_or(UNKNOWN_CONDITION)
}
