//! Calendar helpers: resolving the local date and the `YYYY-MM-DD` wire format.

use time::{Date, OffsetDateTime, UtcOffset, macros::format_description};
use time_tz::{Offset, TimeZone};

time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

/// Get the current UTC offset for a canonical timezone name, e.g. "Pacific/Auckland".
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Today's date in `canonical_timezone`, or `None` if the timezone is unknown.
pub fn today_in(canonical_timezone: &str) -> Option<Date> {
    get_local_offset(canonical_timezone)
        .map(|offset| OffsetDateTime::now_utc().to_offset(offset).date())
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_iso_date(text: &str) -> Result<Date, time::error::Parse> {
    Date::parse(text, format_description!("[year]-[month]-[day]"))
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use time::{Date, OffsetDateTime, macros::date};

    use super::{get_local_offset, iso_date, parse_iso_date, today_in};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Dated {
        #[serde(with = "iso_date")]
        date: Date,
    }

    #[test]
    fn dates_use_year_month_day() {
        let dated = Dated {
            date: date!(2026 - 02 - 26),
        };

        let json = serde_json::to_string(&dated).unwrap();

        assert_eq!(json, r#"{"date":"2026-02-26"}"#);
        assert_eq!(serde_json::from_str::<Dated>(&json).unwrap(), dated);
    }

    #[test]
    fn utc_today_matches_system_clock() {
        assert_eq!(today_in("Etc/UTC"), Some(OffsetDateTime::now_utc().date()));
    }

    #[test]
    fn unknown_timezone_has_no_offset() {
        assert!(get_local_offset("Mars/Olympus_Mons").is_none());
        assert!(today_in("Mars/Olympus_Mons").is_none());
    }

    #[test]
    fn parses_iso_dates_only() {
        assert_eq!(parse_iso_date("2026-03-09").unwrap(), date!(2026 - 03 - 09));
        assert!(parse_iso_date("09/03/2026").is_err());
    }
}
