pub mod config;
pub mod password;

use chrono::{Datelike, NaiveDate};

/// Full years between `birth` and `today`; negative spans clamp to zero.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn age_counts_completed_years() {
        assert_eq!(age_on(day(1990, 6, 15), day(2024, 6, 14)), 33);
        assert_eq!(age_on(day(1990, 6, 15), day(2024, 6, 15)), 34);
    }

    #[test]
    fn future_birth_dates_clamp_to_zero() {
        assert_eq!(age_on(day(2030, 1, 1), day(2024, 1, 1)), 0);
    }
}
