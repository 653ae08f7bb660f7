use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub version: String,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub ai: AISettings,
    #[serde(default)]
    pub weather: WeatherSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            database: DatabaseSettings::default(),
            ai: AISettings::default(),
            weather: WeatherSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "dailyflow.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AISettings {
    /// Filled from `OPENAI_API_KEY` when left blank.
    #[serde(default, skip_serializing)]
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AISettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSettings {
    /// Filled from `WEATHER_API_KEY` when left blank.
    #[serde(default, skip_serializing)]
    pub api_key: String,
    pub endpoint: String,
    pub units: String,
    pub lang: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            units: "metric".to_string(),
            lang: "kr".to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    pub summary_retention_days: i64,
    pub auto_cleanup: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            summary_retention_days: 30,
            auto_cleanup: true,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(
            r#"{"version":"1.0.0","storage":{"summary_retention_days":7,"auto_cleanup":false}}"#,
        )
        .unwrap();
        assert_eq!(settings.storage.summary_retention_days, 7);
        assert!(!settings.storage.auto_cleanup);
        assert_eq!(settings.ai.model, "gpt-3.5-turbo");
        assert_eq!(settings.weather.units, "metric");
    }

    #[test]
    fn api_keys_are_not_serialized() {
        let mut settings = Settings::default();
        settings.ai.api_key = "sk-secret".to_string();
        settings.weather.api_key = "weather-secret".to_string();
        let json = serde_json::to_string(&settings).unwrap();
        assert!(!json.contains("secret"));
    }
}
