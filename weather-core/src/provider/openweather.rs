use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::{Client, Request, StatusCode};
use serde::Deserialize;

use crate::{
    Config,
    error::{LookupError, TransportError},
    model::{Query, WeatherResult},
};

use super::WeatherProvider;

// Fixed for every lookup; rendering assumes Celsius and m/s.
const UNITS: &str = "metric";
const LANG: &str = "de";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    config: Config,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, config: Config) -> Self {
        Self {
            api_key,
            config,
            http: Client::new(),
        }
    }

    /// Construct a provider from config; fails when no API key is stored.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key().ok_or_else(|| {
            anyhow!(
                "No API key configured for OpenWeather.\n\
                 Hint: run `weather configure` and enter your API key."
            )
        })?;

        Ok(Self::new(api_key.to_owned(), config.clone()))
    }

    /// The single GET issued for `query`. Parameters are URL-encoded by reqwest.
    pub fn build_request(&self, query: &Query) -> Result<Request, LookupError> {
        let request = self
            .http
            .get(&self.config.endpoint)
            .query(&[
                ("q", query.city()),
                ("appid", self.api_key.as_str()),
                ("units", UNITS),
                ("lang", LANG),
            ])
            .build()?;

        Ok(request)
    }

    /// Map a finished HTTP exchange to a lookup outcome.
    pub fn interpret(&self, status: StatusCode, body: &str) -> Result<WeatherResult, LookupError> {
        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound);
        }

        if !status.is_success() {
            tracing::warn!(%status, body = %truncate_body(body), "OpenWeather request failed");
            return Err(TransportError::Status(status.as_u16()).into());
        }

        let parsed: OwCurrentResponse = serde_json::from_str(body)?;

        let first = parsed
            .weather
            .into_iter()
            .next()
            .ok_or(TransportError::NoConditions)?;

        let display_name = match parsed.sys.country.as_deref() {
            Some(country) if !country.is_empty() => format!("{}, {}", parsed.name, country),
            _ => parsed.name,
        };

        Ok(WeatherResult {
            display_name,
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
            icon_url: self.config.icon_url(&first.icon),
            description: first.description,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    #[serde(default)]
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, query: &Query) -> Result<WeatherResult, LookupError> {
        let request = self.build_request(query)?;
        tracing::debug!(city = %query, "requesting current weather");

        let res = self.http.execute(request).await?;
        let status = res.status();
        let body = res.text().await?;
        tracing::debug!(city = %query, %status, "OpenWeather responded");

        self.interpret(status, &body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BERLIN: &str = r#"{
        "name": "Berlin",
        "sys": {"country": "DE"},
        "main": {"temp": 18.4, "feels_like": 17.9, "humidity": 60},
        "wind": {"speed": 3.2},
        "weather": [
            {"description": "bewölkt", "icon": "04d"},
            {"description": "Nebel", "icon": "50d"}
        ]
    }"#;

    fn provider() -> OpenWeatherProvider {
        OpenWeatherProvider::new("SECRET".to_string(), Config::default())
    }

    #[test]
    fn from_config_errors_when_missing_api_key() {
        let err = OpenWeatherProvider::from_config(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
        assert!(err.to_string().contains("weather configure"));
    }

    #[test]
    fn request_carries_city_credential_units_and_language() {
        let query = Query::parse(" Bad Tölz ").unwrap();
        let request = provider().build_request(&query).expect("request builds");

        assert_eq!(request.method(), reqwest::Method::GET);
        assert!(request.body().is_none());

        let url = request.url();
        assert_eq!(url.host_str(), Some("api.openweathermap.org"));
        assert_eq!(url.path(), "/data/2.5/weather");

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "Bad Tölz".to_string()),
                ("appid".to_string(), "SECRET".to_string()),
                ("units".to_string(), "metric".to_string()),
                ("lang".to_string(), "de".to_string()),
            ]
        );
    }

    #[test]
    fn units_and_language_ignore_config_file() {
        let cfg = Config::from_toml(
            "api_key = \"K\"\nunits = \"imperial\"\nlang = \"en\"\n",
        )
        .expect("unknown keys are ignored");
        let provider = OpenWeatherProvider::from_config(&cfg).expect("key configured");

        let request = provider.build_request(&Query::parse("Berlin").unwrap()).unwrap();
        let pairs: Vec<(String, String)> = request.url().query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "Berlin".to_string()),
                ("appid".to_string(), "K".to_string()),
                ("units".to_string(), "metric".to_string()),
                ("lang".to_string(), "de".to_string()),
            ]
        );
    }

    #[test]
    fn interpret_builds_result_from_first_condition() {
        let result = provider().interpret(StatusCode::OK, BERLIN).expect("valid payload");

        assert_eq!(result.display_name, "Berlin, DE");
        assert_eq!(result.temperature_c, 18.4);
        assert_eq!(result.feels_like_c, 17.9);
        assert_eq!(result.humidity_pct, 60);
        assert_eq!(result.wind_speed_mps, 3.2);
        assert_eq!(result.description, "bewölkt");
        assert_eq!(result.icon_url, "https://openweathermap.org/img/wn/04d@2x.png");
    }

    #[test]
    fn interpret_uses_bare_name_without_country() {
        let body = r#"{
            "name": "Atlantis",
            "main": {"temp": 1.0, "feels_like": 0.0, "humidity": 99},
            "wind": {"speed": 0},
            "weather": [{"description": "klar", "icon": "01n"}]
        }"#;
        let result = provider().interpret(StatusCode::OK, body).expect("valid payload");
        assert_eq!(result.display_name, "Atlantis");
    }

    #[test]
    fn not_found_status_maps_to_not_found() {
        let err = provider()
            .interpret(StatusCode::NOT_FOUND, r#"{"cod":"404","message":"city not found"}"#)
            .unwrap_err();
        assert!(matches!(err, LookupError::NotFound));
    }

    #[test]
    fn other_statuses_map_to_transport() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::TOO_MANY_REQUESTS, StatusCode::BAD_GATEWAY] {
            let err = provider().interpret(status, "").unwrap_err();
            match err {
                LookupError::Transport(TransportError::Status(code)) => {
                    assert_eq!(code, status.as_u16())
                }
                other => panic!("unexpected error for {status}: {other:?}"),
            }
        }
    }

    #[test]
    fn malformed_payload_maps_to_transport() {
        let err = provider().interpret(StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, LookupError::Transport(TransportError::Decode(_))));

        let err = provider().interpret(StatusCode::OK, r#"{"name":"Berlin"}"#).unwrap_err();
        assert!(matches!(err, LookupError::Transport(TransportError::Decode(_))));
    }

    #[test]
    fn empty_conditions_map_to_transport() {
        let body = r#"{
            "name": "Berlin",
            "sys": {"country": "DE"},
            "main": {"temp": 18.4, "feels_like": 17.9, "humidity": 60},
            "wind": {"speed": 3.2},
            "weather": []
        }"#;
        let err = provider().interpret(StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, LookupError::Transport(TransportError::NoConditions)));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "ä".repeat(300);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
