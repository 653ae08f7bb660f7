use serde::{Deserialize, Serialize};

use super::{parse_date, parse_time, user_message};
use crate::models::{DayScheduleCount, Schedule, ScheduleInput};
use crate::AppState;

/// Schedule fields as a form submits them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub title: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub category: String,
}

/// Category pickers label entries like "💼 Work"; only the name is stored.
pub fn normalize_category(label: &str) -> String {
    let label = label.trim();
    match label.split_once(' ') {
        Some((icon, rest)) if !icon.chars().any(char::is_alphanumeric) => rest.trim().to_string(),
        _ => label.to_string(),
    }
}

fn validate_schedule(request: &ScheduleRequest) -> Result<ScheduleInput, String> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err("Please enter a schedule title.".to_string());
    }

    let date = parse_date(&request.date)?;
    let start_time = parse_time(&request.start_time)?;
    let end_time = parse_time(&request.end_time)?;
    if end_time <= start_time {
        return Err("End time must be later than start time.".to_string());
    }

    Ok(ScheduleInput {
        title: title.to_string(),
        date,
        start_time,
        end_time,
        location: request.location.trim().to_string(),
        memo: request.memo.trim().to_string(),
        category: normalize_category(&request.category),
    })
}

/// Looks the schedule up and checks it belongs to `user_id`.
fn owned_schedule(state: &AppState, user_id: i64, schedule_id: i64) -> Result<Schedule, String> {
    match state.store.get_schedule_by_id(schedule_id).map_err(user_message)? {
        Some(schedule) if schedule.user_id == user_id => Ok(schedule),
        _ => Err("Schedule not found.".to_string()),
    }
}

pub fn add_schedule(state: &AppState, user_id: i64, request: ScheduleRequest) -> Result<i64, String> {
    let input = validate_schedule(&request)?;
    state.store.add_schedule(user_id, &input).map_err(user_message)
}

pub fn update_schedule(
    state: &AppState,
    user_id: i64,
    schedule_id: i64,
    request: ScheduleRequest,
) -> Result<(), String> {
    let input = validate_schedule(&request)?;
    owned_schedule(state, user_id, schedule_id)?;
    state.store.update_schedule(schedule_id, &input).map_err(user_message)
}

pub fn delete_schedule(state: &AppState, user_id: i64, schedule_id: i64) -> Result<(), String> {
    owned_schedule(state, user_id, schedule_id)?;
    state.store.delete_schedule(schedule_id).map_err(user_message)
}

pub fn delete_schedules_for_date(state: &AppState, user_id: i64, date: &str) -> Result<usize, String> {
    let date = parse_date(date)?;
    state.store.delete_schedules_by_date(user_id, date).map_err(user_message)
}

pub fn get_schedule(state: &AppState, user_id: i64, schedule_id: i64) -> Result<Schedule, String> {
    owned_schedule(state, user_id, schedule_id)
}

pub fn get_schedules_for_date(state: &AppState, user_id: i64, date: &str) -> Result<Vec<Schedule>, String> {
    let date = parse_date(date)?;
    state.store.get_schedules_by_date(user_id, date).map_err(user_message)
}

pub fn get_schedules_for_month(
    state: &AppState,
    user_id: i64,
    year: i32,
    month: u32,
) -> Result<Vec<Schedule>, String> {
    if !(1..=12).contains(&month) {
        return Err(format!("Invalid month {}", month));
    }
    state
        .store
        .get_schedules_by_month(user_id, year, month)
        .map_err(user_message)
}

pub fn get_schedule_counts_for_month(
    state: &AppState,
    user_id: i64,
    year: i32,
    month: u32,
) -> Result<Vec<DayScheduleCount>, String> {
    if !(1..=12).contains(&month) {
        return Err(format!("Invalid month {}", month));
    }
    state
        .store
        .schedule_counts_for_month(user_id, year, month)
        .map_err(user_message)
}

pub fn search_schedules(state: &AppState, user_id: i64, keyword: &str) -> Result<Vec<Schedule>, String> {
    if keyword.trim().is_empty() {
        return Err("Please enter a search keyword.".to_string());
    }
    state.store.search_schedules(user_id, keyword).map_err(user_message)
}

pub fn get_schedules_by_category(
    state: &AppState,
    user_id: i64,
    category: &str,
) -> Result<Vec<Schedule>, String> {
    state
        .store
        .get_schedules_by_category(user_id, &normalize_category(category))
        .map_err(user_message)
}

pub fn get_all_schedules(state: &AppState, user_id: i64) -> Result<Vec<Schedule>, String> {
    state.store.get_all_schedules(user_id).map_err(user_message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use crate::test_support::test_state;

    fn request(title: &str, date: &str, start: &str, end: &str) -> ScheduleRequest {
        ScheduleRequest {
            title: title.to_string(),
            date: date.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            location: String::new(),
            memo: String::new(),
            category: "💼 Work".to_string(),
        }
    }

    fn register(state: &AppState, username: &str) -> i64 {
        state
            .store
            .create_user(&NewUser {
                username: username.to_string(),
                password: "pw".to_string(),
                name: username.to_string(),
                email: format!("{}@example.com", username),
                date_of_birth: None,
                address: String::new(),
            })
            .unwrap()
    }

    #[test]
    fn category_icon_prefix_is_stripped() {
        assert_eq!(normalize_category("💼 Work"), "Work");
        assert_eq!(normalize_category("Team Meeting"), "Team Meeting");
        assert_eq!(normalize_category("  Personal "), "Personal");
        assert_eq!(normalize_category(""), "");
    }

    #[test]
    fn rejects_blank_title_and_inverted_times() {
        let state = test_state();
        let user = register(&state, "alice");

        assert_eq!(
            add_schedule(&state, user, request("  ", "2024-06-01", "09:00", "10:00")).unwrap_err(),
            "Please enter a schedule title."
        );
        assert_eq!(
            add_schedule(&state, user, request("Standup", "2024-06-01", "10:00", "10:00")).unwrap_err(),
            "End time must be later than start time."
        );
        assert!(add_schedule(&state, user, request("Standup", "June 1", "09:00", "10:00")).is_err());
    }

    #[test]
    fn add_stores_normalized_category() {
        let state = test_state();
        let user = register(&state, "alice");
        let id = add_schedule(&state, user, request("Standup", "2024-06-01", "09:00", "09:30")).unwrap();

        let schedule = get_schedule(&state, user, id).unwrap();
        assert_eq!(schedule.category, "Work");
        assert_eq!(get_schedules_by_category(&state, user, "💼 Work").unwrap().len(), 1);
    }

    #[test]
    fn other_users_cannot_touch_a_schedule() {
        let state = test_state();
        let alice = register(&state, "alice");
        let bob = register(&state, "bob");
        let id = add_schedule(&state, alice, request("Standup", "2024-06-01", "09:00", "09:30")).unwrap();

        assert!(get_schedule(&state, bob, id).is_err());
        assert!(delete_schedule(&state, bob, id).is_err());
        assert!(update_schedule(&state, bob, id, request("Mine", "2024-06-01", "09:00", "09:30")).is_err());
        assert_eq!(get_schedule(&state, alice, id).unwrap().title, "Standup");
    }

    #[test]
    fn month_views_validate_month() {
        let state = test_state();
        let user = register(&state, "alice");
        add_schedule(&state, user, request("A", "2024-06-01", "09:00", "09:30")).unwrap();
        add_schedule(&state, user, request("B", "2024-06-01", "10:00", "10:30")).unwrap();

        assert_eq!(get_schedules_for_month(&state, user, 2024, 6).unwrap().len(), 2);
        let counts = get_schedule_counts_for_month(&state, user, 2024, 6).unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].count, 2);
        assert!(get_schedules_for_month(&state, user, 2024, 0).is_err());
    }

    #[test]
    fn search_requires_keyword() {
        let state = test_state();
        let user = register(&state, "alice");
        assert!(search_schedules(&state, user, "  ").is_err());
        assert!(search_schedules(&state, user, "standup").unwrap().is_empty());
    }

    #[test]
    fn delete_for_date_reports_count() {
        let state = test_state();
        let user = register(&state, "alice");
        add_schedule(&state, user, request("A", "2024-06-01", "09:00", "09:30")).unwrap();
        add_schedule(&state, user, request("B", "2024-06-01", "10:00", "10:30")).unwrap();

        assert_eq!(delete_schedules_for_date(&state, user, "2024-06-01").unwrap(), 2);
        assert!(get_schedules_for_date(&state, user, "2024-06-01").unwrap().is_empty());
    }
}
