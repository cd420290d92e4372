//! Presentation mapping from a [`WeatherResult`] to display text.

use crate::WeatherResult;

/// Text and image values for every field of the result region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayUpdate {
    pub city_label: String,
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind: String,
    pub description: String,
    pub icon_url: String,
    pub icon_alt: String,
}

pub fn render(result: &WeatherResult) -> DisplayUpdate {
    DisplayUpdate {
        city_label: result.display_name.clone(),
        temperature: celsius(result.temperature_c),
        feels_like: celsius(result.feels_like_c),
        humidity: format!("{} %", result.humidity_pct),
        wind: format!("{} m/s", result.wind_speed_mps),
        description: result.description.clone(),
        icon_url: result.icon_url.clone(),
        icon_alt: result.description.clone(),
    }
}

fn celsius(value: f64) -> String {
    format!("{} °C", round_half_up(value))
}

// Nearest integer, halves towards positive infinity: 2.5 -> 3, -2.5 -> -2.
// `value + 0.5` would round 0.49999999999999994 up, so compare the fraction instead.
fn round_half_up(value: f64) -> i64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor as i64 + 1
    } else {
        floor as i64
    }
}
