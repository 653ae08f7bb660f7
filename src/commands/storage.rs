use super::user_message;
use crate::models::StorageStats;
use crate::AppState;

pub fn get_storage_stats(state: &AppState) -> Result<StorageStats, String> {
    state.store.storage_stats().map_err(user_message)
}

/// Purges cached summaries past the retention window; `days` overrides the configured one.
pub fn cleanup_old_summaries(state: &AppState, days: Option<i64>) -> Result<usize, String> {
    let days = days.unwrap_or(state.settings.storage.summary_retention_days);
    if days < 0 {
        return Err("Retention days cannot be negative.".to_string());
    }
    state.store.purge_old_summaries(days).map_err(user_message)
}
