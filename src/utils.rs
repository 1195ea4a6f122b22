use std::time::Duration;

use chrono::{DateTime, Datelike, Duration as ChronoDuration, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

use crate::{
    types::{DateWindow, Guid, WindowKind},
    warning,
};

const TMDB_GUID_PREFIX: &str = "tmdb://";

fn monday_on_or_before(date: NaiveDate) -> NaiveDate {
    let days_to_subtract = date.weekday().num_days_from_monday(); // Monday=0, Sunday=6
    date - ChronoDuration::days(days_to_subtract as i64)
}

pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    if month == 12 {
        return NaiveDate::from_ymd_opt(year, 12, 31);
    }
    NaiveDate::from_ymd_opt(year, month + 1, 1).map(|first| first - ChronoDuration::days(1))
}

fn month_window(year: i32, month: u32) -> Option<DateWindow> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = last_day_of_month(year, month)?;
    Some(DateWindow { start, end })
}

pub fn current_window(kind: WindowKind, today: NaiveDate) -> DateWindow {
    match kind {
        WindowKind::Day => DateWindow {
            start: today,
            end: today,
        },
        WindowKind::Week => {
            let start = monday_on_or_before(today);
            DateWindow {
                start,
                end: start + ChronoDuration::days(6),
            }
        }
        WindowKind::Month => month_window(today.year(), today.month()).unwrap_or(DateWindow {
            start: today,
            end: today,
        }),
    }
}

fn with_year(date: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
}

/// Rebuilds `current` in every year from `starting_year` through `current_year`
/// (the year of "today"), oldest first. The window for `current_year` is
/// `current` itself; every other one is `current` moved by whole years.
///
/// Month windows are recomputed from the calendar month of each year, so a
/// February window always ends on that year's last February day. Day and week
/// windows keep their month/day; a year in which either date does not exist
/// (Feb 29 outside leap years) is skipped. A week that spans New Year keeps
/// its shape: both ends move by the same number of years.
pub fn historical_windows(
    current: &DateWindow,
    kind: WindowKind,
    starting_year: i32,
    current_year: i32,
) -> Vec<DateWindow> {
    (starting_year..=current_year)
        .filter_map(|year| {
            let shift = year - current_year;
            match kind {
                WindowKind::Month => {
                    month_window(current.start.year() + shift, current.start.month())
                }
                WindowKind::Day | WindowKind::Week => Some(DateWindow {
                    start: with_year(current.start, current.start.year() + shift)?,
                    end: with_year(current.end, current.end.year() + shift)?,
                }),
            }
        })
        .filter(|window| window.start <= window.end)
        .collect()
}

/// Every `tmdb://` guid of an item, without the prefix.
pub fn tmdb_ids(guids: &[Guid]) -> Vec<String> {
    guids
        .iter()
        .filter_map(|guid| guid.id.strip_prefix(TMDB_GUID_PREFIX))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_plex_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!(
        "{} hours, {} minutes, {} seconds",
        hours, minutes, seconds
    )
}

pub fn format_clock<T: TimeZone>(time: &DateTime<T>) -> String
where
    T::Offset: std::fmt::Display,
{
    time.format("%I:%M %p").to_string()
}

pub fn parse_run_at(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

/// Resolves an IANA timezone name. Unset or empty means UTC; anything
/// unparseable also means UTC, with a warning.
pub fn timezone_or_utc(value: Option<&str>) -> Tz {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Tz::UTC,
        Some(name) => match name.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                warning!("Invalid TZ '{}', falling back to UTC", name);
                Tz::UTC
            }
        },
    }
}
