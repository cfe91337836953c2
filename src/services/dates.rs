use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Local, NaiveDate, NaiveTime, Offset, TimeZone, Utc,
};

use crate::errors::BookingError;
use crate::models::DateOption;

/// The shop operates at a fixed UTC-3 offset.
pub const SHOP_UTC_OFFSET_SECS: i32 = -3 * 3600;

const MONTHS_PT: [&str; 12] = [
    "jan.", "fev.", "mar.", "abr.", "mai.", "jun.", "jul.", "ago.", "set.", "out.", "nov.", "dez.",
];

const WEEKDAYS_PT: [&str; 7] = ["seg.", "ter.", "qua.", "qui.", "sex.", "sáb.", "dom."];

pub fn shop_offset() -> FixedOffset {
    FixedOffset::east_opt(SHOP_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

pub fn format_date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date_key(key: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d")
        .map_err(|_| BookingError::InvalidDateTime(format!("invalid date: {key}")))
}

pub fn date_label(date: NaiveDate) -> String {
    format!("{:02} de {}", date.day(), MONTHS_PT[date.month0() as usize])
}

pub fn weekday_label(date: NaiveDate) -> String {
    WEEKDAYS_PT[date.weekday().num_days_from_monday() as usize].to_string()
}

/// `days` consecutive calendar days starting today (local clock).
pub fn build_date_options(days: usize) -> Vec<DateOption> {
    build_date_options_from(Local::now().date_naive(), days)
}

pub fn build_date_options_from(today: NaiveDate, days: usize) -> Vec<DateOption> {
    (0..days)
        .map(|offset| today + Duration::days(offset as i64))
        .map(|date| DateOption {
            key: format_date_key(date),
            label: date_label(date),
            weekday: weekday_label(date),
        })
        .collect()
}

/// Combines a draft's `YYYY-MM-DD` and `HH:MM` into one timestamp at the shop offset,
/// e.g. `2024-06-01T09:00:00-03:00`.
pub fn combine_date_time(date: &str, time: &str) -> Result<String, BookingError> {
    let date = parse_date_key(date)?;
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| BookingError::InvalidDateTime(format!("invalid time: {time}")))?;

    let local = shop_offset()
        .from_local_datetime(&date.and_time(time))
        .single()
        .ok_or_else(|| BookingError::InvalidDateTime(format!("ambiguous timestamp: {date} {time}")))?;

    Ok(local.format("%Y-%m-%dT%H:%M:%S%:z").to_string())
}

/// Splits a server timestamp into the shop-local date key and `HH:MM`.
pub fn split_date_time(date_time: &str) -> Result<(String, String), BookingError> {
    let parsed = parse_timestamp(date_time)?;
    Ok((
        parsed.format("%Y-%m-%d").to_string(),
        parsed.format("%H:%M").to_string(),
    ))
}

pub fn parse_timestamp(date_time: &str) -> Result<DateTime<FixedOffset>, BookingError> {
    DateTime::parse_from_rfc3339(date_time)
        .map(|dt| dt.with_timezone(&shop_offset()))
        .map_err(|_| BookingError::InvalidDateTime(format!("invalid timestamp: {date_time}")))
}
