//! Property-based tests for event date parsing

use chrono::{Datelike, NaiveDate, Timelike};
use proptest::prelude::*;
use ridehub::shared::content::{parse_date, parse_day};

fn any_day() -> impl Strategy<Value = NaiveDate> {
    (1970i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(year, month, day)| NaiveDate::from_ymd_opt(year, month, day).unwrap())
}

proptest! {
    #[test]
    fn test_plain_day_is_midnight_utc(day in any_day()) {
        let parsed = parse_date("date", &day.format("%Y-%m-%d").to_string()).unwrap();
        prop_assert_eq!(parsed.date_naive(), day);
        prop_assert_eq!(parsed.hour(), 0);
    }

    #[test]
    fn test_timestamp_and_day_agree(day in any_day(), hour in 0u32..24, minute in 0u32..60) {
        let timestamp = format!("{}T{:02}:{:02}:00Z", day.format("%Y-%m-%d"), hour, minute);
        let parsed = parse_date("date", &timestamp).unwrap();
        prop_assert_eq!(parse_day("date", &timestamp).unwrap(), day);
        prop_assert_eq!(parsed.year(), day.year());
        prop_assert_eq!(parsed.minute(), minute);
    }

    #[test]
    fn test_garbage_is_rejected(text in "[a-z]{1,12}") {
        prop_assert!(parse_date("date", &text).is_err());
    }
}
