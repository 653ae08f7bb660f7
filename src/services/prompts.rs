use chrono::NaiveDate;

use crate::models::Schedule;

const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━";

pub const FALLBACK_FORTUNE: &str = "🔮 Today's Fortune\n\n\
Overall: A calm day lies ahead. Work through your plans one step at a time.\n\n\
Money: Things are steady. Just watch out for impulse spending.\n\n\
Love: An honest conversation will bring good results.\n\n\
Health: Pay a little extra attention to how you feel today.";

/// e.g. "June 1, Saturday"
pub fn date_label(date: NaiveDate) -> String {
    date.format("%B %-d, %A").to_string()
}

pub fn format_schedule_list(schedules: &[Schedule]) -> String {
    if schedules.is_empty() {
        return "No schedules registered for today.".to_string();
    }

    let mut text = format!("You have {} schedule(s) today:\n", schedules.len());
    for schedule in schedules {
        text.push_str(&format!(
            "- {}-{} {}",
            schedule.start_time.format("%H:%M"),
            schedule.end_time.format("%H:%M"),
            schedule.title
        ));
        if !schedule.location.trim().is_empty() {
            text.push_str(&format!(" @ {}", schedule.location.trim()));
        }
        text.push('\n');
        if !schedule.memo.trim().is_empty() {
            text.push_str(&format!("  Memo: {}\n", schedule.memo.trim()));
        }
    }
    text
}

pub fn daily_summary_prompt(name: &str, date: NaiveDate, weather: &str, schedules: &str) -> String {
    format!(
        "You are a friendly scheduling assistant for {name}.\n\n\
Date: {date}\n\
Weather: {weather}\n\
Schedules:\n{schedules}\n\n\
Write a summary of the day in this format:\n\n\
📅 [date]\n\n\
🌦️ [weather]\n\n\
{DIVIDER}\n\n\
✨ AI suggestions:\n\
[summary of the schedule and recommendations]\n\n\
📌 Things to bring: [items to prepare]\n\n\
Keep the tone warm and friendly, and include practical advice that takes the weather into account.",
        date = date_label(date),
    )
}

/// Used when the completion call produces nothing.
pub fn fallback_daily_summary(date: NaiveDate, weather: &str, schedules: &str) -> String {
    format!(
        "📅 {}\n\n🌦️ {}\n\n{}\n\n✨ Today's schedule:\n{}",
        date_label(date),
        weather,
        DIVIDER,
        schedules
    )
}

pub fn fortune_prompt(date: NaiveDate, date_of_birth: Option<NaiveDate>, age: Option<u32>) -> String {
    let birth = date_of_birth
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let age = age
        .map(|a| a.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    format!(
        "You are a kind fortune teller.\n\n\
Today's date: {}\n\
Date of birth: {}\n\
Age: {}\n\n\
Write today's fortune in this format:\n\n\
🔮 Today's Fortune\n\n\
Overall: [2-3 sentences]\n\n\
Money: [1-2 sentences]\n\n\
Love: [1-2 sentences]\n\n\
Health: [1-2 sentences]\n\n\
Keep it positive but realistic, with warm practical advice.",
        date.format("%Y-%m-%d"),
        birth,
        age
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn schedule(title: &str, start: &str, end: &str, location: &str, memo: &str) -> Schedule {
        Schedule {
            id: 1,
            user_id: 1,
            title: title.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            start_time: NaiveTime::parse_from_str(start, "%H:%M").unwrap(),
            end_time: NaiveTime::parse_from_str(end, "%H:%M").unwrap(),
            location: location.to_string(),
            memo: memo.to_string(),
            category: String::new(),
        }
    }

    #[test]
    fn date_label_spells_out_month_and_weekday() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(date_label(date), "June 1, Saturday");
    }

    #[test]
    fn empty_schedule_list() {
        assert_eq!(format_schedule_list(&[]), "No schedules registered for today.");
    }

    #[test]
    fn schedule_list_includes_location_and_memo() {
        let text = format_schedule_list(&[
            schedule("Standup", "09:00", "09:30", "Room 4", ""),
            schedule("Lunch", "12:00", "13:00", "", "book a table"),
        ]);
        assert_eq!(
            text,
            "You have 2 schedule(s) today:\n\
             - 09:00-09:30 Standup @ Room 4\n\
             - 12:00-13:00 Lunch\n  Memo: book a table\n"
        );
    }

    #[test]
    fn summary_prompt_embeds_inputs() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let prompt = daily_summary_prompt("Alice", date, "clear sky, 21.0°C, humidity 40%", "- 09:00-09:30 Standup");
        assert!(prompt.contains("Alice"));
        assert!(prompt.contains("June 1, Saturday"));
        assert!(prompt.contains("clear sky"));
        assert!(prompt.contains("Standup"));
    }

    #[test]
    fn fallback_summary_is_deterministic() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let a = fallback_daily_summary(date, "rain", "No schedules registered for today.");
        let b = fallback_daily_summary(date, "rain", "No schedules registered for today.");
        assert_eq!(a, b);
        assert!(a.starts_with("📅 June 1, Saturday"));
        assert!(a.contains("🌦️ rain"));
    }

    #[test]
    fn fortune_prompt_handles_unknown_birth_date() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let prompt = fortune_prompt(date, None, None);
        assert!(prompt.contains("Date of birth: unknown"));
        assert!(prompt.contains("Age: unknown"));

        let birth = NaiveDate::from_ymd_opt(1990, 1, 2);
        let prompt = fortune_prompt(date, birth, Some(34));
        assert!(prompt.contains("Date of birth: 1990-01-02"));
        assert!(prompt.contains("Age: 34"));
    }
}
