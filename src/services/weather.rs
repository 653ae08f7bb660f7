use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use super::error::{truncate_body, AiError};
use crate::models::WeatherSettings;

pub const WEATHER_UNAVAILABLE: &str = "Weather information unavailable.";

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    main: WeatherMain,
    #[serde(default)]
    weather: Vec<WeatherCondition>,
}

#[derive(Debug, Deserialize)]
struct WeatherMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct WeatherCondition {
    description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub description: String,
    pub temperature: f64,
    pub humidity: i64,
}

impl fmt::Display for WeatherReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {:.1}°C, humidity {}%",
            self.description, self.temperature, self.humidity
        )
    }
}

pub struct WeatherClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    units: String,
    lang: String,
}

impl WeatherClient {
    pub fn new(settings: &WeatherSettings) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.trim().to_string(),
            units: settings.units.clone(),
            lang: settings.lang.clone(),
        })
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// One-line weather description for `location`, or [`WEATHER_UNAVAILABLE`].
    pub async fn get_weather(&self, location: &str) -> String {
        match self.fetch(location).await {
            Ok(report) => report.to_string(),
            Err(e) => {
                log::warn!("Weather lookup for {} failed: {}", location, e);
                WEATHER_UNAVAILABLE.to_string()
            }
        }
    }

    pub async fn fetch(&self, location: &str) -> Result<WeatherReport, AiError> {
        if !self.has_api_key() {
            return Err(AiError::MissingApiKey("weather"));
        }

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", location),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
                ("lang", self.lang.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(AiError::Status {
                status: status.as_u16(),
                body: truncate_body(&text),
            });
        }

        let parsed: WeatherResponse = serde_json::from_str(&text)?;
        let description = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| "no description".to_string());

        Ok(WeatherReport {
            description,
            temperature: parsed.main.temp,
            humidity: parsed.main.humidity.round() as i64,
        })
    }
}
