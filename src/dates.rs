use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Error, Result};

/// Format used in menu request urls, ex. `17-mar-2014`.
const MENU_DATE_FORMAT: &str = "%d-%b-%Y";
/// Format used for the per-date document directories, ex. `20140317`.
const DIR_DATE_FORMAT: &str = "%Y%m%d";
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

pub const WEEK: Duration = Duration::days(7);

#[must_use]
pub fn next_week(date: NaiveDate) -> NaiveDate {
    date + WEEK
}

#[must_use]
pub fn format_menu_date(date: NaiveDate) -> String {
    date.format(MENU_DATE_FORMAT).to_string().to_lowercase()
}

#[must_use]
pub fn format_dir_date(date: NaiveDate) -> String {
    date.format(DIR_DATE_FORMAT).to_string()
}

/// Accepts both the menu url format (month names in any case) and ISO dates.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, MENU_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(s, ISO_DATE_FORMAT))
        .map_err(|e| Error::date_error(format!("`{s}` is not a valid date: {e}")))
}

/// Weekly dates from `start` whose midnight falls before `deadline`.
pub fn crawl_dates(start: NaiveDate, deadline: NaiveDateTime) -> impl Iterator<Item = NaiveDate> {
    std::iter::successors(Some(start), |date| Some(next_week(*date)))
        .take_while(move |date| date.and_time(NaiveTime::MIN) < deadline)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_next_week_seven_times() {
        for start in [date(2014, 3, 17), date(2016, 2, 27), date(2019, 12, 30)] {
            let mut d = start;
            for _ in 0..7 {
                d = next_week(d);
            }
            assert_eq!(d, start + Duration::days(49));
        }
    }

    #[test]
    fn test_formats() {
        let d = date(2014, 3, 17);
        assert_eq!(format_menu_date(d), "17-mar-2014");
        assert_eq!(format_dir_date(d), "20140317");
    }

    #[test]
    fn test_parse_date() {
        let d = date(2014, 3, 17);
        assert_eq!(parse_date("17-mar-2014").unwrap(), d);
        assert_eq!(parse_date("17-Mar-2014").unwrap(), d);
        assert_eq!(parse_date("2014-03-17").unwrap(), d);
        assert!(matches!(parse_date("not a date"), Err(Error::Date(_))));
        assert!(parse_date("31-feb-2014").is_err());
    }

    #[test]
    fn test_menu_format_round_trips_through_parse() {
        let d = date(2016, 10, 3);
        assert_eq!(parse_date(&format_menu_date(d)).unwrap(), d);
    }

    #[test]
    fn test_crawl_dates_count_is_ceiling_of_weeks() {
        let start = date(2014, 3, 17);
        // 10 whole weeks plus one hour
        let deadline = (start + Duration::days(70)).and_hms_opt(1, 0, 0).unwrap();
        let dates: Vec<_> = crawl_dates(start, deadline).collect();
        assert_eq!(dates.len(), 11);
        assert_eq!(dates[0], start);
        assert_eq!(*dates.last().unwrap(), start + Duration::days(70));

        // exactly on a week boundary the boundary itself is excluded
        let deadline = (start + Duration::days(70)).and_time(NaiveTime::MIN);
        assert_eq!(crawl_dates(start, deadline).count(), 10);
    }

    #[test]
    fn test_crawl_dates_empty_when_start_is_past_deadline() {
        let start = date(2020, 1, 1);
        let deadline = date(2019, 1, 1).and_time(NaiveTime::MIN);
        assert_eq!(crawl_dates(start, deadline).count(), 0);
    }
}
