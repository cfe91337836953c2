use crate::services::dates::{date_label, parse_timestamp};

/// `"1234.5"` → `"R$ 1.234,50"` (non-breaking space). Non-numeric input is returned as is.
pub fn format_currency(value: &str) -> String {
    let number = match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => return value.to_string(),
    };

    let cents = (number.abs() * 100.0).round() as u64;
    let sign = if number < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{sign}R$\u{a0}{},{:02}",
        group_thousands(cents / 100),
        cents % 100
    )
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// `"01:30:00"` → `"1h 30m"`. Input without parseable hours and minutes is returned as is.
pub fn format_duration(duration: &str) -> String {
    let mut parts = duration.split(':');
    let hours = parts.next().and_then(|h| h.trim().parse::<u32>().ok());
    let minutes = parts.next().and_then(|m| m.trim().parse::<u32>().ok());

    let (Some(hours), Some(minutes)) = (hours, minutes) else {
        return duration.to_string();
    };

    let mut out = Vec::new();
    if hours > 0 {
        out.push(format!("{hours}h"));
    }
    if minutes > 0 {
        out.push(format!("{minutes}m"));
    }

    if out.is_empty() {
        "0m".to_string()
    } else {
        out.join(" ")
    }
}

/// Day/month label and `HH:MM` in the shop's zone; `(input, "")` when unparseable.
pub fn format_appointment_date(date_time: &str) -> (String, String) {
    match parse_timestamp(date_time) {
        Ok(parsed) => (
            date_label(parsed.date_naive()),
            parsed.format("%H:%M").to_string(),
        ),
        Err(_) => (date_time.to_string(), String::new()),
    }
}
