//! Week arithmetic and the order cutoff.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};

/// Monday of the ISO week containing `today`, shifted by `offset_weeks`.
#[must_use]
pub fn week_start(today: NaiveDate, offset_weeks: i32) -> NaiveDate {
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    monday + Duration::weeks(i64::from(offset_weeks))
}

/// The seven dates of the week starting at `monday`.
#[must_use]
pub fn week_dates(monday: NaiveDate) -> [NaiveDate; 7] {
    [
        monday,
        monday + Duration::days(1),
        monday + Duration::days(2),
        monday + Duration::days(3),
        monday + Duration::days(4),
        monday + Duration::days(5),
        monday + Duration::days(6),
    ]
}

/// The visible strip for a week: Monday-Friday always, weekend days only
/// when the tenant published weekend menus that week.
///
/// Saturday joins the strip when Saturday *or* Sunday has a menu (a strip
/// with a hole reads as a bug); Sunday only when Sunday itself has one. The
/// result is 5, 6, or 7 days.
#[must_use]
pub fn visible_week(week: &[NaiveDate; 7], has_menu: impl Fn(NaiveDate) -> bool) -> Vec<NaiveDate> {
    let mut days: Vec<NaiveDate> = week
        .iter()
        .copied()
        .filter(|d| d.weekday().num_days_from_monday() < 5)
        .collect();

    let saturday = week[5];
    let sunday = week[6];
    let sunday_has_menu = has_menu(sunday);
    if sunday_has_menu || has_menu(saturday) {
        days.push(saturday);
    }
    if sunday_has_menu {
        days.push(sunday);
    }
    days
}

/// Whether ordering for `date` is locked out right now.
///
/// Only "today" is time-gated: once the wall clock passes the tenant's
/// cutoff, same-day ordering closes. Ordering at exactly the cutoff is
/// still allowed. Future and past dates are never cutoff-locked by this
/// rule (past dates are simply days whose menu has gone by).
#[must_use]
pub fn is_cutoff_locked(
    date: NaiveDate,
    today: NaiveDate,
    now: NaiveTime,
    cutoff: NaiveTime,
) -> bool {
    date == today && now > cutoff
}

/// Weekday label for the strip ("Mon", "Tue", ...).
#[must_use]
pub const fn day_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2025-03-12 is a Wednesday
        assert_eq!(week_start(date(2025, 3, 12), 0), date(2025, 3, 10));
        // Monday maps to itself
        assert_eq!(week_start(date(2025, 3, 10), 0), date(2025, 3, 10));
        // Sunday belongs to the week that started the previous Monday
        assert_eq!(week_start(date(2025, 3, 16), 0), date(2025, 3, 10));
    }

    #[test]
    fn test_week_start_offset_and_year_boundary() {
        assert_eq!(week_start(date(2025, 3, 12), 1), date(2025, 3, 17));
        assert_eq!(week_start(date(2025, 3, 12), -1), date(2025, 3, 3));
        // 2024-12-31 is a Tuesday; its week starts 2024-12-30 and the next
        // week crosses into 2025
        assert_eq!(week_start(date(2024, 12, 31), 0), date(2024, 12, 30));
        assert_eq!(week_start(date(2024, 12, 31), 1), date(2025, 1, 6));
    }

    #[test]
    fn test_week_dates_sequence() {
        let week = week_dates(date(2025, 3, 10));
        assert_eq!(week[0], date(2025, 3, 10));
        assert_eq!(week[6], date(2025, 3, 16));
    }

    #[test]
    fn test_visible_week_weekday_only() {
        let week = week_dates(date(2025, 3, 10));
        let days = visible_week(&week, |_| false);
        assert_eq!(days.len(), 5);
        assert_eq!(*days.last().unwrap(), date(2025, 3, 14));
    }

    #[test]
    fn test_visible_week_with_saturday_menu() {
        let week = week_dates(date(2025, 3, 10));
        let days = visible_week(&week, |d| d == date(2025, 3, 15));
        assert_eq!(days.len(), 6);
        assert_eq!(*days.last().unwrap(), date(2025, 3, 15));
    }

    #[test]
    fn test_visible_week_with_sunday_menu_includes_saturday() {
        let week = week_dates(date(2025, 3, 10));
        let days = visible_week(&week, |d| d == date(2025, 3, 16));
        assert_eq!(days.len(), 7);
    }

    #[test]
    fn test_cutoff_blocks_today_after_cutoff() {
        let today = date(2025, 3, 10);
        // 10:31 with a 10:30 cutoff: today is blocked
        assert!(is_cutoff_locked(today, today, time(10, 31), time(10, 30)));
        // exactly at the cutoff is still allowed
        assert!(!is_cutoff_locked(today, today, time(10, 30), time(10, 30)));
        // before the cutoff is allowed
        assert!(!is_cutoff_locked(today, today, time(9, 0), time(10, 30)));
    }

    #[test]
    fn test_cutoff_never_blocks_other_dates() {
        let today = date(2025, 3, 10);
        let tomorrow = date(2025, 3, 11);
        let yesterday = date(2025, 3, 9);
        assert!(!is_cutoff_locked(tomorrow, today, time(23, 59), time(10, 30)));
        assert!(!is_cutoff_locked(yesterday, today, time(23, 59), time(10, 30)));
    }
}
