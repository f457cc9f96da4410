use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime};

/// Milliseconds in one calendar day
pub const MS_PER_DAY: i64 = 86_400_000;

/// Today's local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Shift a date by a whole number of days (negative goes backwards)
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

/// `count` consecutive dates starting at `start`
pub fn date_run(start: NaiveDate, count: usize) -> impl Iterator<Item = NaiveDate> {
    (0..count as i64).map(move |offset| add_days(start, offset))
}

/// Number of days from `from` to `to`, rounding any partial day up
///
/// A negative or zero span yields a value <= 0.
pub fn days_until_ceil(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    let ms = (to - from).num_milliseconds();
    ms.div_euclid(MS_PER_DAY) + i64::from(ms.rem_euclid(MS_PER_DAY) != 0)
}

/// Format a date as YYYY-MM-DD
pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a YYYY-MM-DD date
pub fn parse_iso(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}'. Use YYYY-MM-DD", input))
}

/// Short human format, e.g. "Mon, Oct 19"
pub fn format_display(date: NaiveDate) -> String {
    date.format("%a, %b %-d").to_string()
}

/// "Today", "Tomorrow", "Yesterday", or the short display format
pub fn relative_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => format_display(date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn date(s: &str) -> NaiveDate {
        parse_iso(s).unwrap()
    }

    #[test]
    fn test_add_days_crosses_month() {
        assert_eq!(add_days(date("2024-01-30"), 3), date("2024-02-02"));
        assert_eq!(add_days(date("2024-03-01"), -1), date("2024-02-29"));
    }

    #[test]
    fn test_date_run_is_contiguous() {
        let run: Vec<_> = date_run(date("2024-12-30"), 4).collect();
        assert_eq!(
            run,
            vec![
                date("2024-12-30"),
                date("2024-12-31"),
                date("2025-01-01"),
                date("2025-01-02")
            ]
        );
        assert_eq!(date_run(date("2024-12-30"), 0).count(), 0);
    }

    #[test]
    fn test_days_until_ceil_whole_days() {
        let from = date("2024-05-01").and_time(NaiveTime::MIN);
        let to = date("2024-05-08").and_time(NaiveTime::MIN);
        assert_eq!(days_until_ceil(from, to), 7);
        assert_eq!(days_until_ceil(from, from), 0);
        assert_eq!(days_until_ceil(to, from), -7);
    }

    #[test]
    fn test_days_until_ceil_partial_day_rounds_up() {
        let from = date("2024-05-01").and_time(NaiveTime::MIN);
        let to = date("2024-05-03").and_hms_opt(1, 0, 0).unwrap();
        assert_eq!(days_until_ceil(from, to), 3);

        // Less than a day in the past rounds toward zero
        let earlier = date("2024-04-30").and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(days_until_ceil(from, earlier), 0);
    }

    #[test]
    fn test_iso_format_and_parse() {
        let d = date("2024-07-04");
        assert_eq!(format_iso(d), "2024-07-04");
        assert!(parse_iso("07/04/2024").is_err());
        assert!(parse_iso("2024-02-30").is_err());
    }

    #[test]
    fn test_relative_label() {
        let today = date("2024-10-19");
        assert_eq!(relative_label(today, today), "Today");
        assert_eq!(relative_label(date("2024-10-20"), today), "Tomorrow");
        assert_eq!(relative_label(date("2024-10-18"), today), "Yesterday");
        assert_eq!(relative_label(date("2024-10-22"), today), "Tue, Oct 22");
    }
}
