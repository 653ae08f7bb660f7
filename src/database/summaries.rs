use chrono::{Days, Local, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::error::LogContext;
use super::{Store, StoreError};
use crate::models::SummaryCacheEntry;

pub(crate) fn delete_summary(conn: &Connection, user_id: i64, date: NaiveDate) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM schedule_summaries WHERE userId = ?1 AND date = ?2",
        params![user_id, date],
    )
}

impl Store {
    pub fn get_cached_summary(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Option<SummaryCacheEntry>, StoreError> {
        self.conn()
            .query_row(
                "SELECT id, userId, date, summary, weatherInfo, createdAt, updatedAt
                 FROM schedule_summaries WHERE userId = ?1 AND date = ?2",
                params![user_id, date],
                |row| {
                    Ok(SummaryCacheEntry {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        date: row.get(2)?,
                        summary: row.get(3)?,
                        weather_info: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                        created_at: row.get(5)?,
                        updated_at: row.get(6)?,
                    })
                },
            )
            .optional()
            .log_context("Failed to read cached summary")
    }

    /// Upsert keyed on (user, date). `createdAt` survives regeneration.
    pub fn save_daily_summary(
        &self,
        user_id: i64,
        date: NaiveDate,
        summary: &str,
        weather_info: &str,
    ) -> Result<(), StoreError> {
        let now = Utc::now().timestamp();
        self.conn()
            .execute(
                "INSERT INTO schedule_summaries (userId, date, summary, weatherInfo, createdAt, updatedAt)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                 ON CONFLICT(userId, date) DO UPDATE SET
                     summary = excluded.summary,
                     weatherInfo = excluded.weatherInfo,
                     updatedAt = excluded.updatedAt",
                params![user_id, date, summary, weather_info, now],
            )
            .log_context("Failed to save daily summary")?;

        log::debug!("Cached summary for user {} on {}", user_id, date);
        Ok(())
    }

    /// Returns whether an entry was removed.
    pub fn invalidate_summary(&self, user_id: i64, date: NaiveDate) -> Result<bool, StoreError> {
        let removed = delete_summary(&self.conn(), user_id, date)
            .log_context("Failed to invalidate summary")?;
        Ok(removed > 0)
    }

    /// Drops summaries dated more than `days` days before today.
    pub fn purge_old_summaries(&self, days: i64) -> Result<usize, StoreError> {
        let today = Local::now().date_naive();
        let cutoff = today
            .checked_sub_days(Days::new(days.max(0) as u64))
            .unwrap_or(NaiveDate::MIN);
        self.purge_summaries_before(cutoff)
    }

    pub fn purge_summaries_before(&self, cutoff: NaiveDate) -> Result<usize, StoreError> {
        let removed = self
            .conn()
            .execute("DELETE FROM schedule_summaries WHERE date < ?1", [cutoff])
            .log_context("Failed to purge old summaries")?;

        if removed > 0 {
            log::info!("Purged {} cached summaries dated before {}", removed, cutoff);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;

    fn store_with_users() -> (Store, i64, i64) {
        let store = Store::open_in_memory().unwrap();
        let mut ids = Vec::new();
        for name in ["alice", "bob"] {
            ids.push(
                store
                    .create_user(&NewUser {
                        username: name.to_string(),
                        password: "pw".to_string(),
                        name: name.to_string(),
                        email: format!("{}@example.com", name),
                        date_of_birth: None,
                        address: String::new(),
                    })
                    .unwrap(),
            );
        }
        (store, ids[0], ids[1])
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn empty_until_saved() {
        let (store, alice, _) = store_with_users();
        assert!(store.get_cached_summary(alice, date("2024-06-01")).unwrap().is_none());

        store
            .save_daily_summary(alice, date("2024-06-01"), "Good morning!", "clear, 21.0°C, humidity 40%")
            .unwrap();
        let entry = store.get_cached_summary(alice, date("2024-06-01")).unwrap().unwrap();
        assert_eq!(entry.summary, "Good morning!");
        assert_eq!(entry.weather_info, "clear, 21.0°C, humidity 40%");
    }

    #[test]
    fn upsert_keeps_one_row_and_created_at() {
        let (store, alice, _) = store_with_users();
        let day = date("2024-06-01");
        store.save_daily_summary(alice, day, "first", "w").unwrap();
        store
            .conn()
            .execute("UPDATE schedule_summaries SET createdAt = 1, updatedAt = 1", [])
            .unwrap();

        store.save_daily_summary(alice, day, "second", "w2").unwrap();

        let entry = store.get_cached_summary(alice, day).unwrap().unwrap();
        assert_eq!(entry.summary, "second");
        assert_eq!(entry.weather_info, "w2");
        assert_eq!(entry.created_at, 1);
        assert!(entry.updated_at > 1);

        let rows: i64 = store
            .conn()
            .query_row("SELECT COUNT(*) FROM schedule_summaries", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn invalidate_only_touches_its_key() {
        let (store, alice, bob) = store_with_users();
        store.save_daily_summary(alice, date("2024-06-01"), "a1", "").unwrap();
        store.save_daily_summary(alice, date("2024-06-02"), "a2", "").unwrap();
        store.save_daily_summary(bob, date("2024-06-01"), "b1", "").unwrap();

        assert!(store.invalidate_summary(alice, date("2024-06-01")).unwrap());
        assert!(!store.invalidate_summary(alice, date("2024-06-01")).unwrap());

        assert!(store.get_cached_summary(alice, date("2024-06-01")).unwrap().is_none());
        assert!(store.get_cached_summary(alice, date("2024-06-02")).unwrap().is_some());
        assert!(store.get_cached_summary(bob, date("2024-06-01")).unwrap().is_some());
    }

    #[test]
    fn purge_removes_entries_older_than_retention() {
        let (store, alice, _) = store_with_users();
        let today = Local::now().date_naive();
        let recent = today.checked_sub_days(Days::new(3)).unwrap();
        let stale = today.checked_sub_days(Days::new(45)).unwrap();
        store.save_daily_summary(alice, today, "today", "").unwrap();
        store.save_daily_summary(alice, recent, "recent", "").unwrap();
        store.save_daily_summary(alice, stale, "stale", "").unwrap();

        assert_eq!(store.purge_old_summaries(30).unwrap(), 1);
        assert!(store.get_cached_summary(alice, stale).unwrap().is_none());
        assert!(store.get_cached_summary(alice, recent).unwrap().is_some());
        assert!(store.get_cached_summary(alice, today).unwrap().is_some());
    }

    #[test]
    fn purge_before_explicit_cutoff() {
        let (store, alice, _) = store_with_users();
        store.save_daily_summary(alice, date("2024-01-01"), "old", "").unwrap();
        store.save_daily_summary(alice, date("2024-02-01"), "kept", "").unwrap();

        assert_eq!(store.purge_summaries_before(date("2024-02-01")).unwrap(), 1);
        assert!(store.get_cached_summary(alice, date("2024-02-01")).unwrap().is_some());
    }
}
