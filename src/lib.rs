pub mod commands;
pub mod database;
pub mod models;
pub mod services;
pub mod utils;

use std::path::Path;
use std::sync::Arc;

use database::Store;
use models::Settings;
use services::AiService;

/// Everything a frontend needs, built once at startup and passed by reference.
pub struct AppState {
    pub settings: Settings,
    pub store: Arc<Store>,
    pub ai: AiService,
}

impl AppState {
    pub fn initialize(settings: Settings) -> anyhow::Result<Self> {
        utils::config::report_missing_keys(&settings);

        let store = Arc::new(Store::open(Path::new(&settings.database.path))?);
        Self::with_store(settings, store)
    }

    pub fn with_store(settings: Settings, store: Arc<Store>) -> anyhow::Result<Self> {
        let ai = AiService::new(store.clone(), &settings)?;

        if settings.storage.auto_cleanup {
            // Failures are logged by the store; startup continues either way.
            let _ = store.purge_old_summaries(settings.storage.summary_retention_days);
        }

        Ok(Self { settings, store, ai })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// In-memory state whose outbound endpoints point at a closed local port.
    pub fn test_state() -> AppState {
        let mut settings = Settings::default();
        settings.ai.endpoint = "http://127.0.0.1:9/v1/chat/completions".to_string();
        settings.ai.timeout_secs = 2;
        settings.weather.endpoint = "http://127.0.0.1:9/data/2.5/weather".to_string();
        settings.weather.timeout_secs = 2;

        let store = Arc::new(Store::open_in_memory().expect("in-memory store"));
        AppState::with_store(settings, store).expect("app state")
    }
}
