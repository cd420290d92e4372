use crate::error::LookupError;

/// A validated city name: trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Trim `raw` and reject it when nothing is left.
    pub fn parse(raw: &str) -> Result<Self, LookupError> {
        let city = raw.trim();
        if city.is_empty() {
            return Err(LookupError::EmptyQuery);
        }
        Ok(Self(city.to_owned()))
    }

    pub fn city(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Current conditions for one city, built from a successful upstream payload.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherResult {
    /// `"<name>, <country>"`, or just the name when the country is unknown.
    pub display_name: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub description: String,
    pub icon_url: String,
}
