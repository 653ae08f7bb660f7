use std::sync::Arc;

use chrono::{Local, NaiveDate};

use super::completion::CompletionClient;
use super::error::AiError;
use super::location::resolve_location_token;
use super::prompts;
use super::weather::WeatherClient;
use crate::database::Store;
use crate::models::{Settings, User};
use crate::utils::age_on;

/// Produces the user-facing AI texts. Every public method degrades to
/// fallback text instead of returning an error.
pub struct AiService {
    store: Arc<Store>,
    completion: CompletionClient,
    weather: WeatherClient,
}

impl AiService {
    pub fn new(store: Arc<Store>, settings: &Settings) -> Result<Self, AiError> {
        Ok(Self {
            store,
            completion: CompletionClient::new(&settings.ai)?,
            weather: WeatherClient::new(&settings.weather)?,
        })
    }

    pub async fn generate_daily_summary(&self, user_id: i64) -> String {
        self.generate_daily_summary_for(user_id, Local::now().date_naive())
            .await
    }

    /// A cached entry short-circuits everything. Only completions that
    /// succeeded are written back to the cache.
    pub async fn generate_daily_summary_for(&self, user_id: i64, date: NaiveDate) -> String {
        if let Ok(Some(entry)) = self.store.get_cached_summary(user_id, date) {
            log::debug!("Using cached summary for user {} on {}", user_id, date);
            return entry.summary;
        }

        let user = self.load_user(user_id);
        let address = user.as_ref().map(|u| u.address.as_str()).unwrap_or_default();
        let location = resolve_location_token(address);

        let schedules = self
            .store
            .get_schedules_by_date(user_id, date)
            .unwrap_or_default();
        let weather = self.weather.get_weather(location).await;
        let schedule_text = prompts::format_schedule_list(&schedules);

        let name = user
            .as_ref()
            .map(|u| u.name.trim())
            .filter(|n| !n.is_empty())
            .unwrap_or("there");
        let prompt = prompts::daily_summary_prompt(name, date, &weather, &schedule_text);

        match self.completion.complete(&prompt).await {
            Some(summary) => {
                if let Err(e) = self.store.save_daily_summary(user_id, date, &summary, &weather) {
                    log::warn!("Summary generated but not cached: {}", e);
                }
                summary
            }
            None => {
                log::info!("Using fallback summary for user {} on {}", user_id, date);
                prompts::fallback_daily_summary(date, &weather, &schedule_text)
            }
        }
    }

    /// Regenerated on every call.
    pub async fn generate_todays_fortune(&self, user_id: i64) -> String {
        self.generate_fortune_for(user_id, Local::now().date_naive())
            .await
    }

    pub async fn generate_fortune_for(&self, user_id: i64, date: NaiveDate) -> String {
        let date_of_birth = self.load_user(user_id).and_then(|u| u.date_of_birth);
        let age = date_of_birth.map(|birth| age_on(birth, date));
        let prompt = prompts::fortune_prompt(date, date_of_birth, age);

        self.completion
            .complete(&prompt)
            .await
            .unwrap_or_else(|| prompts::FALLBACK_FORTUNE.to_string())
    }

    pub async fn get_weather(&self, location: &str) -> String {
        self.weather.get_weather(location).await
    }

    /// Weather for the city derived from the user's address.
    pub async fn get_weather_for_user(&self, user_id: i64) -> String {
        let user = self.load_user(user_id);
        let address = user.as_ref().map(|u| u.address.as_str()).unwrap_or_default();
        self.weather.get_weather(resolve_location_token(address)).await
    }

    pub fn completion_configured(&self) -> bool {
        self.completion.has_api_key()
    }

    pub fn weather_configured(&self) -> bool {
        self.weather.has_api_key()
    }

    fn load_user(&self, user_id: i64) -> Option<User> {
        match self.store.get_user(user_id) {
            Ok(Some(user)) => Some(user),
            Ok(None) => {
                log::warn!("No profile for user {}; using defaults", user_id);
                None
            }
            Err(_) => None,
        }
    }
}
