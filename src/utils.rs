/// Shared date utilities for the dataset loaders
///
/// The source spreadsheets carry dates in several shapes: real date cells, Excel serial
/// numbers, fixed-format text, English month names and `YYYY?WW` week codes. Everything
/// here turns one of those into a `NaiveDate` or a month number.
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::table::Value;

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Text formats tried, in order, when a date column has no fixed format
const GENERIC_DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];
const GENERIC_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Larger day counts cannot be a date chrono represents
const MAX_EXCEL_SERIAL_DAYS: f64 = 1.0e9;

/// Map a full English month name to 1-12 (case-insensitive)
///
/// # Examples
///
/// ```
/// use salmon_data_loader::utils::month_from_name;
///
/// assert_eq!(month_from_name("January"), Some(1));
/// assert_eq!(month_from_name(" december "), Some(12));
/// assert_eq!(month_from_name("Jan"), None);
/// ```
pub fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.trim().to_lowercase();
    MONTH_NAMES
        .iter()
        .position(|m| *m == lower)
        .map(|i| i as u32 + 1)
}

/// Convert Excel date serial to NaiveDate
///
/// Excel stores dates as day counts; the epoch is 1899-12-30 to absorb Excel's
/// 1900 leap-year bug. Returns `None` for non-finite serials and for any serial that
/// lands outside chrono's date range.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial.abs() > MAX_EXCEL_SERIAL_DAYS {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::try_days(serial as i64)?)
}

/// Parse a cell that must hold a date in one fixed text format
///
/// Date cells pass through unchanged. Returns `Ok(None)` for empty cells and `Err` with
/// the offending text for anything else.
pub fn parse_date_with_format(value: &Value, format: &str) -> Result<Option<NaiveDate>, String> {
    match value {
        Value::Date(d) => Ok(Some(*d)),
        Value::Empty => Ok(None),
        Value::Text(s) => NaiveDate::parse_from_str(s.trim(), format)
            .map(Some)
            .map_err(|_| s.clone()),
        other => Err(other.to_string()),
    }
}

/// Parse a cell holding a date in any of the shapes the source files use
pub fn parse_date_generic(value: &Value) -> Result<Option<NaiveDate>, String> {
    match value {
        Value::Date(d) => Ok(Some(*d)),
        Value::Empty => Ok(None),
        Value::Int(i) => excel_serial_to_date(*i as f64)
            .map(Some)
            .ok_or_else(|| i.to_string()),
        Value::Float(f) => excel_serial_to_date(*f)
            .map(Some)
            .ok_or_else(|| f.to_string()),
        Value::Text(s) => parse_date_text(s).map(Some).ok_or_else(|| s.clone()),
        Value::Bool(b) => Err(b.to_string()),
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    GENERIC_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            GENERIC_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Monday of week `week` in `year`, numbered the way `strptime("%Y-W%W-1")` does
///
/// Week 1 starts on the first Monday of the year. Week 0 is the Monday on or before
/// 1 January, which can fall in the previous year. Returns `None` for weeks above 53.
pub fn monday_of_week(year: i32, week: u32) -> Option<NaiveDate> {
    if week > 53 {
        return None;
    }
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let first_weekday = i64::from(jan1.weekday().num_days_from_monday());

    if week == 0 {
        return jan1.checked_sub_signed(Duration::days(first_weekday));
    }

    let week0_length = (7 - first_weekday) % 7;
    let offset = week0_length + 7 * (i64::from(week) - 1);
    jan1.checked_add_signed(Duration::days(offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_month_from_name_all_months() {
        for (i, name) in MONTH_NAMES.iter().enumerate() {
            assert_eq!(month_from_name(name), Some(i as u32 + 1));
        }
    }

    #[test]
    fn test_month_from_name_case_insensitive() {
        assert_eq!(month_from_name("MARCH"), Some(3));
        assert_eq!(month_from_name("September"), Some(9));
    }

    #[test]
    fn test_month_from_name_rejects_abbreviations() {
        assert_eq!(month_from_name("Sept"), None);
        assert_eq!(month_from_name(""), None);
    }

    #[test]
    fn test_excel_serial_to_date() {
        // 35835 = February 9, 1998
        let date = excel_serial_to_date(35835.0).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(1998, 2, 9).unwrap());
    }

    #[test]
    fn test_excel_serial_out_of_range_is_none() {
        assert_eq!(excel_serial_to_date(1e20), None);
        assert_eq!(excel_serial_to_date(-1e20), None);
        assert_eq!(excel_serial_to_date(5e8), None);
        assert_eq!(excel_serial_to_date(f64::NAN), None);
        assert_eq!(excel_serial_to_date(f64::INFINITY), None);
        assert_eq!(parse_date_generic(&Value::Int(i64::MAX)), Err(i64::MAX.to_string()));
    }

    #[test]
    fn test_parse_date_with_format_us_style() {
        let value = Value::text("03/15/2019");
        let parsed = parse_date_with_format(&value, "%m/%d/%Y").unwrap();
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2019, 3, 15));
    }

    #[test]
    fn test_parse_date_with_format_rejects_other_layout() {
        let value = Value::text("2019-03-15");
        let err = parse_date_with_format(&value, "%m/%d/%Y").unwrap_err();
        assert_eq!(err, "2019-03-15");
    }

    #[test]
    fn test_parse_date_with_format_passes_dates_and_empty() {
        let d = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert_eq!(parse_date_with_format(&Value::Date(d), "%m/%d/%Y"), Ok(Some(d)));
        assert_eq!(parse_date_with_format(&Value::Empty, "%m/%d/%Y"), Ok(None));
        assert!(parse_date_with_format(&Value::Float(3.0), "%m/%d/%Y").is_err());
    }

    #[test]
    fn test_parse_date_generic_shapes() {
        let expected = NaiveDate::from_ymd_opt(2014, 1, 6).unwrap();
        for text in ["2014-01-06", "2014/01/06", "01/06/2014", "06.01.2014", "2014-01-06 00:00:00"] {
            assert_eq!(
                parse_date_generic(&Value::text(text)),
                Ok(Some(expected)),
                "failed for {text}"
            );
        }
        // 41645 = January 6, 2014
        assert_eq!(parse_date_generic(&Value::Int(41645)), Ok(Some(expected)));
        assert!(parse_date_generic(&Value::text("week 2")).is_err());
    }

    #[test]
    fn test_monday_of_week_year_starting_on_monday() {
        // 2018-01-01 is a Monday: week 1 starts that day, week 0 is the same Monday
        assert_eq!(monday_of_week(2018, 1), NaiveDate::from_ymd_opt(2018, 1, 1));
        assert_eq!(monday_of_week(2018, 0), NaiveDate::from_ymd_opt(2018, 1, 1));
    }

    #[test]
    fn test_monday_of_week_year_starting_midweek() {
        // 2020-01-01 is a Wednesday: first Monday is Jan 6
        assert_eq!(monday_of_week(2020, 1), NaiveDate::from_ymd_opt(2020, 1, 6));
        assert_eq!(monday_of_week(2020, 0), NaiveDate::from_ymd_opt(2019, 12, 30));
        assert_eq!(monday_of_week(2020, 53), NaiveDate::from_ymd_opt(2021, 1, 4));
    }

    #[test]
    fn test_monday_of_week_always_monday() {
        for year in [2000, 2006, 2013, 2024, 2026] {
            for week in 0..=53 {
                let date = monday_of_week(year, week).unwrap();
                assert_eq!(date.weekday(), Weekday::Mon, "{year}-W{week}");
            }
        }
    }

    #[test]
    fn test_monday_of_week_rejects_out_of_range() {
        assert_eq!(monday_of_week(2020, 54), None);
    }
}
