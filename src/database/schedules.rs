use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension, Params, Row};

use super::error::LogContext;
use super::summaries::delete_summary;
use super::{Store, StoreError};
use crate::models::{DayScheduleCount, Schedule, ScheduleInput};

const SCHEDULE_COLUMNS: &str =
    "id, userId, title, date, startTime, endTime, location, memo, category";

fn row_to_schedule(row: &Row) -> rusqlite::Result<Schedule> {
    Ok(Schedule {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        date: row.get(3)?,
        start_time: row.get(4)?,
        end_time: row.get(5)?,
        location: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        memo: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
        category: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
    })
}

/// Times are stored as `HH:MM`, matching what the calendar UI writes.
fn hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

fn month_prefix(year: i32, month: u32) -> String {
    format!("{:04}-{:02}%", year, month)
}

fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn query_schedules<P: Params>(
    conn: &Connection,
    filter: &str,
    params: P,
) -> rusqlite::Result<Vec<Schedule>> {
    let sql = format!(
        "SELECT {} FROM schedules WHERE {} ORDER BY date ASC, startTime ASC, id ASC",
        SCHEDULE_COLUMNS, filter
    );
    let mut stmt = conn.prepare(&sql)?;
    let schedules = stmt
        .query_map(params, row_to_schedule)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(schedules)
}

fn schedule_owner_and_date(
    conn: &Connection,
    schedule_id: i64,
) -> rusqlite::Result<Option<(i64, NaiveDate)>> {
    conn.query_row(
        "SELECT userId, date FROM schedules WHERE id = ?1",
        [schedule_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
    .optional()
}

impl Store {
    /// Inserts the schedule and drops the cached summary for its day.
    pub fn add_schedule(&self, user_id: i64, input: &ScheduleInput) -> Result<i64, StoreError> {
        let mut conn = self.conn();
        let tx = conn.transaction().log_context("Failed to begin transaction")?;

        tx.execute(
            "INSERT INTO schedules (userId, title, date, startTime, endTime, location, memo, category)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                user_id,
                input.title,
                input.date,
                hhmm(input.start_time),
                hhmm(input.end_time),
                input.location,
                input.memo,
                input.category,
            ],
        )
        .log_context("Failed to add schedule")?;
        let id = tx.last_insert_rowid();

        delete_summary(&tx, user_id, input.date).log_context("Failed to invalidate summary")?;
        tx.commit().log_context("Failed to commit schedule")?;

        log::debug!("Added schedule {} for user {} on {}", id, user_id, input.date);
        Ok(id)
    }

    pub fn get_schedules_by_date(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Schedule>, StoreError> {
        query_schedules(&self.conn(), "userId = ?1 AND date = ?2", params![user_id, date])
            .log_context("Failed to load schedules for date")
    }

    pub fn get_schedules_by_month(
        &self,
        user_id: i64,
        year: i32,
        month: u32,
    ) -> Result<Vec<Schedule>, StoreError> {
        if !(1..=12).contains(&month) {
            log::warn!("Ignoring schedule query for invalid month {}", month);
            return Ok(Vec::new());
        }
        query_schedules(
            &self.conn(),
            "userId = ?1 AND date LIKE ?2",
            params![user_id, month_prefix(year, month)],
        )
        .log_context("Failed to load schedules for month")
    }

    /// Per-day schedule counts for a month, for calendar markers.
    pub fn schedule_counts_for_month(
        &self,
        user_id: i64,
        year: i32,
        month: u32,
    ) -> Result<Vec<DayScheduleCount>, StoreError> {
        if !(1..=12).contains(&month) {
            return Ok(Vec::new());
        }
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT date, COUNT(*) FROM schedules
                 WHERE userId = ?1 AND date LIKE ?2
                 GROUP BY date ORDER BY date ASC",
            )
            .log_context("Failed to prepare schedule counts")?;
        let counts = stmt
            .query_map(params![user_id, month_prefix(year, month)], |row| {
                Ok(DayScheduleCount {
                    date: row.get(0)?,
                    count: row.get(1)?,
                })
            })
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .log_context("Failed to count schedules")?;
        Ok(counts)
    }

    pub fn get_schedule_by_id(&self, schedule_id: i64) -> Result<Option<Schedule>, StoreError> {
        self.conn()
            .query_row(
                &format!("SELECT {} FROM schedules WHERE id = ?1", SCHEDULE_COLUMNS),
                [schedule_id],
                row_to_schedule,
            )
            .optional()
            .log_context("Failed to load schedule")
    }

    pub fn get_all_schedules(&self, user_id: i64) -> Result<Vec<Schedule>, StoreError> {
        query_schedules(&self.conn(), "userId = ?1", [user_id])
            .log_context("Failed to load schedules")
    }

    /// Case-insensitive substring match over title, location and memo.
    pub fn search_schedules(&self, user_id: i64, keyword: &str) -> Result<Vec<Schedule>, StoreError> {
        let pattern = format!("%{}%", escape_like(keyword.trim()));
        query_schedules(
            &self.conn(),
            "userId = ?1 AND (title LIKE ?2 ESCAPE '\\'
                OR location LIKE ?2 ESCAPE '\\'
                OR memo LIKE ?2 ESCAPE '\\')",
            params![user_id, pattern],
        )
        .log_context("Failed to search schedules")
    }

    pub fn get_schedules_by_category(
        &self,
        user_id: i64,
        category: &str,
    ) -> Result<Vec<Schedule>, StoreError> {
        query_schedules(
            &self.conn(),
            "userId = ?1 AND category = ?2",
            params![user_id, category],
        )
        .log_context("Failed to load schedules by category")
    }

    /// Rewrites the schedule; both the previous and the new day lose their cached summary.
    pub fn update_schedule(&self, schedule_id: i64, input: &ScheduleInput) -> Result<(), StoreError> {
        let mut conn = self.conn();
        let tx = conn.transaction().log_context("Failed to begin transaction")?;

        let Some((user_id, old_date)) =
            schedule_owner_and_date(&tx, schedule_id).log_context("Failed to load schedule")?
        else {
            log::warn!("Update for missing schedule {}", schedule_id);
            return Err(StoreError::NotFound("schedule"));
        };

        tx.execute(
            "UPDATE schedules
             SET title = ?1, date = ?2, startTime = ?3, endTime = ?4,
                 location = ?5, memo = ?6, category = ?7
             WHERE id = ?8",
            params![
                input.title,
                input.date,
                hhmm(input.start_time),
                hhmm(input.end_time),
                input.location,
                input.memo,
                input.category,
                schedule_id,
            ],
        )
        .log_context("Failed to update schedule")?;

        delete_summary(&tx, user_id, old_date).log_context("Failed to invalidate summary")?;
        if input.date != old_date {
            delete_summary(&tx, user_id, input.date).log_context("Failed to invalidate summary")?;
        }
        tx.commit().log_context("Failed to commit schedule update")?;

        log::debug!("Updated schedule {} ({} -> {})", schedule_id, old_date, input.date);
        Ok(())
    }

    pub fn delete_schedule(&self, schedule_id: i64) -> Result<(), StoreError> {
        let mut conn = self.conn();
        let tx = conn.transaction().log_context("Failed to begin transaction")?;

        let Some((user_id, date)) =
            schedule_owner_and_date(&tx, schedule_id).log_context("Failed to load schedule")?
        else {
            log::warn!("Delete for missing schedule {}", schedule_id);
            return Err(StoreError::NotFound("schedule"));
        };

        tx.execute("DELETE FROM schedules WHERE id = ?1", [schedule_id])
            .log_context("Failed to delete schedule")?;
        delete_summary(&tx, user_id, date).log_context("Failed to invalidate summary")?;
        tx.commit().log_context("Failed to commit schedule delete")?;

        Ok(())
    }

    /// Removes every schedule the user has on `date`; returns how many went.
    pub fn delete_schedules_by_date(&self, user_id: i64, date: NaiveDate) -> Result<usize, StoreError> {
        let mut conn = self.conn();
        let tx = conn.transaction().log_context("Failed to begin transaction")?;

        let removed = tx
            .execute(
                "DELETE FROM schedules WHERE userId = ?1 AND date = ?2",
                params![user_id, date],
            )
            .log_context("Failed to delete schedules for date")?;
        delete_summary(&tx, user_id, date).log_context("Failed to invalidate summary")?;
        tx.commit().log_context("Failed to commit schedule delete")?;

        Ok(removed)
    }
}
