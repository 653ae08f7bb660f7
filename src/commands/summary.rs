use serde::Serialize;

use crate::AppState;

/// Which outbound services have credentials; unconfigured ones answer with fallback text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceStatus {
    pub completion: bool,
    pub weather: bool,
}

pub fn get_service_status(state: &AppState) -> ServiceStatus {
    ServiceStatus {
        completion: state.ai.completion_configured(),
        weather: state.ai.weather_configured(),
    }
}

/// Today's plan summary; served from the cache when one exists.
pub async fn get_daily_summary(state: &AppState, user_id: i64) -> Result<String, String> {
    Ok(state.ai.generate_daily_summary(user_id).await)
}

pub async fn get_todays_fortune(state: &AppState, user_id: i64) -> Result<String, String> {
    Ok(state.ai.generate_todays_fortune(user_id).await)
}

/// Weather for an explicit city, or for the city in the user's address.
pub async fn get_weather(
    state: &AppState,
    user_id: i64,
    location: Option<&str>,
) -> Result<String, String> {
    match location.map(str::trim).filter(|l| !l.is_empty()) {
        Some(location) => Ok(state.ai.get_weather(location).await),
        None => Ok(state.ai.get_weather_for_user(user_id).await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::prompts::FALLBACK_FORTUNE;
    use crate::services::weather::WEATHER_UNAVAILABLE;
    use crate::test_support::test_state;

    #[tokio::test]
    async fn unconfigured_services_degrade_to_fallbacks() {
        let state = test_state();

        let summary = get_daily_summary(&state, 1).await.unwrap();
        assert!(summary.contains(WEATHER_UNAVAILABLE));
        assert_eq!(get_todays_fortune(&state, 1).await.unwrap(), FALLBACK_FORTUNE);
        assert_eq!(get_weather(&state, 1, Some("Busan")).await.unwrap(), WEATHER_UNAVAILABLE);
        assert_eq!(get_weather(&state, 1, None).await.unwrap(), WEATHER_UNAVAILABLE);
    }

    #[test]
    fn service_status_reflects_api_keys() {
        let state = test_state();
        assert_eq!(
            get_service_status(&state),
            ServiceStatus { completion: false, weather: false }
        );

        let mut settings = state.settings.clone();
        settings.ai.api_key = "sk-test".to_string();
        let configured = AppState::with_store(settings, state.store.clone()).unwrap();
        assert_eq!(
            get_service_status(&configured),
            ServiceStatus { completion: true, weather: false }
        );
    }
}
