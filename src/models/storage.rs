use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageStats {
    pub total_size_bytes: i64,
    pub users_count: i64,
    pub schedules_count: i64,
    pub summaries_count: i64,
    pub oldest_summary_date: Option<String>,
}
