use chrono::{Datelike, NaiveDate, Weekday};

/// Label for a day row: "01", or "01 Mo" when the month is known.
///
/// Rows past the end of the month are labelled with a dash.
pub fn day_label(row: usize, month: Option<(i32, u32)>) -> String {
    let day = row + 1;
    let Some((year, month)) = month else {
        return format!("{:02}", day);
    };
    if day > days_in_month(year, month).unwrap_or(0) {
        return format!("{:02} -", day);
    }
    match NaiveDate::from_ymd_opt(year, month, day as u32) {
        Some(date) => format!("{:02} {}", day, weekday_short(date.weekday())),
        None => format!("{:02} -", day),
    }
}

fn weekday_short(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mo",
        Weekday::Tue => "Tu",
        Weekday::Wed => "We",
        Weekday::Thu => "Th",
        Weekday::Fri => "Fr",
        Weekday::Sat => "Sa",
        Weekday::Sun => "Su",
    }
}

/// Number of days in a month, if the month is valid.
pub fn days_in_month(year: i32, month: u32) -> Option<usize> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next.signed_duration_since(first).num_days() as usize)
}

/// Parse "YYYY-MM".
pub fn parse_month(input: &str) -> Option<(i32, u32)> {
    let (year, month) = input.trim().split_once('-')?;
    let year = year.parse::<i32>().ok()?;
    let month = month.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)?;
    Some((year, month))
}
