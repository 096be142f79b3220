//! Display formatting for case timestamps

use chrono::{DateTime, TimeZone, Utc};

/// `2024-03-10 02:05:09 PM`
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %I:%M:%S %p";
/// `03/10/2024`
pub const DATE_FORMAT: &str = "%m/%d/%Y";
/// `02:05:09 PM`
pub const TIME_FORMAT: &str = "%I:%M:%S %p";

fn from_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

/// Full timestamp for tables and detail panes. Out-of-range input renders
/// as an empty string.
pub fn format_date_time(millis: i64) -> String {
    from_millis(millis)
        .map(|t| t.format(DATE_TIME_FORMAT).to_string())
        .unwrap_or_default()
}

pub fn format_date(millis: i64) -> String {
    from_millis(millis)
        .map(|t| t.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

pub fn format_time(millis: i64) -> String {
    from_millis(millis)
        .map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats() {
        let millis = Utc.with_ymd_and_hms(2024, 3, 10, 14, 5, 9).unwrap().timestamp_millis();
        assert_eq!(format_date_time(millis), "2024-03-10 02:05:09 PM");
        assert_eq!(format_date(millis), "03/10/2024");
        assert_eq!(format_time(millis), "02:05:09 PM");
        assert_eq!(format_time(0), "12:00:00 AM");
    }

    #[test]
    fn test_out_of_range_is_empty() {
        assert_eq!(format_date_time(i64::MAX), "");
    }
}
