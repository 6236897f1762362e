//! Presentation formatting for amounts and timestamps.
//!
//! Amounts render in ruble style: space-grouped digits, comma decimal
//! separator, trailing currency sign. Timestamps render in Moscow time,
//! which has a fixed UTC+3 offset.

use chrono::{DateTime, FixedOffset};

const CURRENCY_SIGN: &str = "₽";
const MOSCOW_OFFSET_SECS: i32 = 3 * 3600;

/// Formats an amount with two decimals, e.g. `1 234,56 ₽`.
pub fn format_currency(value: f64) -> String {
    format!("{} {}", grouped_number(value, 2), CURRENCY_SIGN)
}

/// Whole-unit variant used by compact labels, e.g. `1 235 ₽`.
pub fn format_currency_short(value: f64) -> String {
    format!("{} {}", grouped_number(value, 0), CURRENCY_SIGN)
}

/// Formats a unix-millisecond timestamp as `DD.MM.YYYY`.
pub fn format_date(millis: i64) -> String {
    match moscow_time(millis) {
        Some(moment) => moment.format("%d.%m.%Y").to_string(),
        None => "--".into(),
    }
}

/// Formats a unix-millisecond timestamp as `DD.MM.YYYY, HH:MM`.
pub fn format_date_time(millis: i64) -> String {
    match moscow_time(millis) {
        Some(moment) => moment.format("%d.%m.%Y, %H:%M").to_string(),
        None => "--".into(),
    }
}

fn moscow_time(millis: i64) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(MOSCOW_OFFSET_SECS)?;
    DateTime::from_timestamp_millis(millis).map(|utc| utc.with_timezone(&offset))
}

fn grouped_number(value: f64, precision: usize) -> String {
    let body = format!("{:.*}", precision, value.abs());
    let (int_part, fraction) = match body.split_once('.') {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (body.as_str(), None),
    };
    let mut out = String::new();
    if value < 0.0 {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if let Some(fraction) = fraction {
        out.push(',');
        out.push_str(fraction);
    }
    out
}

fn group_digits(digits: &str) -> String {
    let mut grouped = String::new();
    let mut count = 0;
    for ch in digits.chars().rev() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, ' ');
        }
        grouped.insert(0, ch);
        count += 1;
    }
    grouped
}
