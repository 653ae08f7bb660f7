use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryCacheEntry {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub summary: String,
    pub weather_info: String,
    pub created_at: i64,
    pub updated_at: i64,
}
