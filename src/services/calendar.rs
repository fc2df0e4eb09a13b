use chrono::{Datelike, NaiveDate};

/// Sunday-based week of the year; the week holding Jan 1 is week 1.
pub fn week_of_year(date: NaiveDate) -> u32 {
    let jan1_offset = NaiveDate::from_ymd_opt(date.year(), 1, 1)
        .map(|d| d.weekday().num_days_from_sunday())
        .unwrap_or(0);

    (date.ordinal0() + jan1_offset + 1).div_ceil(7)
}

/// `2025-W3`
pub fn week_label(date: NaiveDate) -> String {
    format!("{}-W{}", date.year(), week_of_year(date))
}

pub fn parse_week_label(label: &str) -> Option<(i32, u32)> {
    let (year, week) = label.trim().split_once("-W")?;
    let year: i32 = year.parse().ok()?;
    let week: u32 = week.parse().ok()?;

    (1..=54).contains(&week).then_some((year, week))
}

/// `2025-W3` -> `Week 3, 2025`
pub fn format_week(label: &str) -> Option<String> {
    parse_week_label(label).map(|(year, week)| format!("Week {week}, {year}"))
}
