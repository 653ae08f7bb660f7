use std::path::Path;

use crate::models::Settings;

const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
const ENV_WEATHER_API_KEY: &str = "WEATHER_API_KEY";
const ENV_DATABASE_PATH: &str = "DAILYFLOW_DB";

/// Load `KEY=value` pairs from `path` into the process environment.
/// Variables already set in the environment win.
pub fn load_env_file(path: &Path) -> bool {
    match dotenvy::from_path(path) {
        Ok(()) => {
            log::info!("Loaded environment from {}", path.display());
            true
        }
        Err(e) => {
            log::warn!("Could not load env file {}: {}", path.display(), e);
            false
        }
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn apply_env_defaults(settings: &mut Settings) {
    if settings.ai.api_key.trim().is_empty() {
        settings.ai.api_key = env_value(ENV_OPENAI_API_KEY).unwrap_or_default();
    }
    if settings.weather.api_key.trim().is_empty() {
        settings.weather.api_key = env_value(ENV_WEATHER_API_KEY).unwrap_or_default();
    }
    if let Some(path) = env_value(ENV_DATABASE_PATH) {
        settings.database.path = path;
    }
}

/// Read settings from an optional JSON file, then fill secrets from the environment.
/// A missing or unreadable file falls back to defaults.
pub fn load_settings(config_path: Option<&Path>) -> Settings {
    let mut settings = match config_path {
        Some(path) if path.exists() => read_settings_file(path).unwrap_or_else(|e| {
            log::warn!("Ignoring settings file {}: {}", path.display(), e);
            Settings::default()
        }),
        Some(path) => {
            log::warn!("Settings file {} not found; using defaults", path.display());
            Settings::default()
        }
        None => Settings::default(),
    };
    apply_env_defaults(&mut settings);
    settings
}

fn read_settings_file(path: &Path) -> anyhow::Result<Settings> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Missing keys leave the app in degraded mode rather than stopping it.
pub fn report_missing_keys(settings: &Settings) {
    if settings.ai.api_key.trim().is_empty() {
        log::error!("{} is not set; AI summaries will use fallback text", ENV_OPENAI_API_KEY);
    }
    if settings.weather.api_key.trim().is_empty() {
        log::error!("{} is not set; weather will be unavailable", ENV_WEATHER_API_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn settings_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"version":"1.0.0","ai":{{"endpoint":"http://localhost/v1","model":"test-model","temperature":0.1,"max_tokens":50}}}}"#
        )
        .unwrap();

        let settings = load_settings(Some(file.path()));
        assert_eq!(settings.ai.model, "test-model");
        assert_eq!(settings.ai.max_tokens, 50);
        assert_eq!(settings.ai.timeout_secs, 30);
    }

    #[test]
    fn broken_settings_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let settings = load_settings(Some(file.path()));
        assert_eq!(settings.ai.model, "gpt-3.5-turbo");
    }

    #[test]
    fn missing_settings_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(Some(&dir.path().join("absent.json")));
        assert_eq!(settings.ai.model, "gpt-3.5-turbo");
        assert_eq!(settings.storage.summary_retention_days, 30);
    }

    #[test]
    fn missing_env_file_reports_false() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!load_env_file(&dir.path().join("absent.env")));
    }
}
