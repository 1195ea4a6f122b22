use std::time::Duration as StdDuration;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use chrono_tz::Tz;
use throwback::types::{DateWindow, Guid, WindowKind};
use throwback::utils::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// Every day of 2023 and 2024, covering a leap year and both year ends
fn sample_days() -> Vec<NaiveDate> {
    let mut day = date(2023, 1, 1);
    let mut days = Vec::new();
    while day <= date(2024, 12, 31) {
        days.push(day);
        day += Duration::days(1);
    }
    days
}

#[test]
fn test_day_window_is_today() {
    for today in sample_days() {
        let window = current_window(WindowKind::Day, today);
        assert_eq!(window.start, today);
        assert_eq!(window.end, today);
    }
}

#[test]
fn test_week_window_runs_monday_to_sunday() {
    for today in sample_days() {
        let window = current_window(WindowKind::Week, today);
        assert_eq!(window.start.weekday(), Weekday::Mon);
        assert_eq!(window.end.weekday(), Weekday::Sun);
        assert_eq!(window.end - window.start, Duration::days(6));
        assert!(window.contains(today));
    }
}

#[test]
fn test_month_window_covers_calendar_month() {
    for today in sample_days() {
        let window = current_window(WindowKind::Month, today);
        assert_eq!(window.start, date(today.year(), today.month(), 1));
        assert_eq!(window.end.month(), today.month());
        assert_eq!((window.end + Duration::days(1)).day(), 1);
        assert!(window.start <= window.end);
    }

    assert_eq!(current_window(WindowKind::Month, date(2024, 2, 10)).end, date(2024, 2, 29));
    assert_eq!(current_window(WindowKind::Month, date(2023, 2, 10)).end, date(2023, 2, 28));
    assert_eq!(current_window(WindowKind::Month, date(2023, 12, 5)).end, date(2023, 12, 31));
    assert_eq!(current_window(WindowKind::Month, date(2023, 4, 30)).end, date(2023, 4, 30));
}

#[test]
fn test_last_day_of_month() {
    assert_eq!(last_day_of_month(2024, 2), Some(date(2024, 2, 29)));
    assert_eq!(last_day_of_month(1900, 2), Some(date(1900, 2, 28)));
    assert_eq!(last_day_of_month(2000, 2), Some(date(2000, 2, 29)));
    assert_eq!(last_day_of_month(2023, 12), Some(date(2023, 12, 31)));
    assert_eq!(last_day_of_month(2023, 13), None);
}

#[test]
fn test_historical_windows_one_per_year_ascending() {
    let today = date(2024, 10, 16);
    let current = current_window(WindowKind::Day, today);
    let windows = historical_windows(&current, WindowKind::Day, 2020, 2024);

    let starts: Vec<NaiveDate> = windows.iter().map(|w| w.start).collect();
    assert_eq!(
        starts,
        vec![
            date(2020, 10, 16),
            date(2021, 10, 16),
            date(2022, 10, 16),
            date(2023, 10, 16),
            date(2024, 10, 16),
        ]
    );
    assert!(windows.iter().all(|w| w.start == w.end));
}

#[test]
fn test_historical_windows_skip_feb_29_outside_leap_years() {
    let today = date(2024, 2, 29);
    let current = current_window(WindowKind::Day, today);
    let windows = historical_windows(&current, WindowKind::Day, 2019, 2024);

    assert_eq!(
        windows,
        vec![
            DateWindow {
                start: date(2020, 2, 29),
                end: date(2020, 2, 29)
            },
            DateWindow {
                start: date(2024, 2, 29),
                end: date(2024, 2, 29)
            },
        ]
    );
}

#[test]
fn test_historical_month_windows_end_on_each_years_last_day() {
    let today = date(2024, 2, 3);
    let current = current_window(WindowKind::Month, today);
    let windows = historical_windows(&current, WindowKind::Month, 2022, 2024);

    let ends: Vec<NaiveDate> = windows.iter().map(|w| w.end).collect();
    assert_eq!(ends, vec![date(2022, 2, 28), date(2023, 2, 28), date(2024, 2, 29)]);
    assert!(windows.iter().all(|w| w.start.day() == 1));
}

#[test]
fn test_historical_week_windows_keep_weekday_span() {
    let today = date(2024, 10, 16); // Wednesday
    let current = current_window(WindowKind::Week, today);
    let windows = historical_windows(&current, WindowKind::Week, 2010, 2024);

    assert_eq!(windows.len(), 15);
    for window in &windows {
        assert_eq!(window.start.month(), 10);
        assert_eq!(window.start.day(), 14);
        assert_eq!(window.end.day(), 20);
        assert!(window.start <= window.end);
    }
}

#[test]
fn test_historical_week_window_across_new_year() {
    let today = date(2025, 1, 2); // week of Mon 2024-12-30 .. Sun 2025-01-05
    let current = current_window(WindowKind::Week, today);
    assert_eq!(current.start, date(2024, 12, 30));
    assert_eq!(current.end, date(2025, 1, 5));

    let windows = historical_windows(&current, WindowKind::Week, 2023, 2025);

    assert_eq!(
        windows,
        vec![
            DateWindow {
                start: date(2022, 12, 30),
                end: date(2023, 1, 5)
            },
            DateWindow {
                start: date(2023, 12, 30),
                end: date(2024, 1, 5)
            },
            DateWindow {
                start: date(2024, 12, 30),
                end: date(2025, 1, 5)
            },
        ]
    );
}

#[test]
fn test_week_across_new_year_searches_current_week_in_first_year() {
    let today = date(2026, 1, 2); // week of Mon 2025-12-29 .. Sun 2026-01-04
    let current = current_window(WindowKind::Week, today);

    let windows = historical_windows(&current, WindowKind::Week, 2026, 2026);

    assert_eq!(windows, vec![current]);
    assert!(windows[0].contains(today));
}

#[test]
fn test_week_across_new_year_seen_from_december() {
    let today = date(2024, 12, 31); // week of Mon 2024-12-30 .. Sun 2025-01-05
    let current = current_window(WindowKind::Week, today);

    let windows = historical_windows(&current, WindowKind::Week, 2023, 2024);

    assert_eq!(
        windows,
        vec![
            DateWindow {
                start: date(2023, 12, 30),
                end: date(2024, 1, 5)
            },
            current,
        ]
    );
}

#[test]
fn test_historical_windows_never_end_after_current_window() {
    for today in sample_days() {
        for kind in [WindowKind::Day, WindowKind::Week, WindowKind::Month] {
            let current = current_window(kind, today);
            let windows = historical_windows(&current, kind, 2015, today.year());

            assert!(windows.iter().all(|w| w.end <= current.end));
            assert_eq!(windows.last(), Some(&current));
        }
    }
}

#[test]
fn test_historical_windows_empty_when_starting_year_in_future() {
    let current = current_window(WindowKind::Day, date(2024, 5, 1));
    assert!(historical_windows(&current, WindowKind::Day, 2030, 2024).is_empty());
}

#[test]
fn test_tmdb_ids_only_takes_tmdb_guids() {
    let guids = vec![
        Guid {
            id: "imdb://tt0133093".to_string(),
        },
        Guid {
            id: "tmdb://603".to_string(),
        },
        Guid {
            id: "tvdb://169".to_string(),
        },
        Guid {
            id: "tmdb://".to_string(),
        },
    ];

    assert_eq!(tmdb_ids(&guids), vec!["603".to_string()]);
    assert!(tmdb_ids(&[]).is_empty());
}

#[test]
fn test_parse_plex_date() {
    assert_eq!(parse_plex_date("1999-03-31"), Some(date(1999, 3, 31)));
    assert_eq!(parse_plex_date("1999-02-30"), None);
    assert_eq!(parse_plex_date(""), None);
}

#[test]
fn test_format_elapsed() {
    assert_eq!(
        format_elapsed(StdDuration::from_secs(3 * 3600 + 25 * 60 + 7)),
        "3 hours, 25 minutes, 7 seconds"
    );
    assert_eq!(
        format_elapsed(StdDuration::from_millis(999)),
        "0 hours, 0 minutes, 0 seconds"
    );
}

#[test]
fn test_parse_run_at() {
    assert_eq!(
        parse_run_at("02:00"),
        chrono::NaiveTime::from_hms_opt(2, 0, 0)
    );
    assert_eq!(
        parse_run_at("23:45"),
        chrono::NaiveTime::from_hms_opt(23, 45, 0)
    );
    assert_eq!(parse_run_at("25:00"), None);
    assert_eq!(parse_run_at("2am"), None);
}

#[test]
fn test_timezone_or_utc() {
    assert_eq!(timezone_or_utc(None), Tz::UTC);
    assert_eq!(timezone_or_utc(Some("")), Tz::UTC);
    assert_eq!(timezone_or_utc(Some("Europe/Berlin")), Tz::Europe__Berlin);
    assert_eq!(timezone_or_utc(Some("Mars/Olympus_Mons")), Tz::UTC);
}
