//! Display formatters shared by the three apps.
//!
//! Output follows British English conventions: day-month-year dates,
//! 12-hour clock, comma thousands separators.

use chrono::{DateTime, NaiveDate, Utc};

/// "14:30" -> "2:30 PM". Input that is not `HH:MM` is returned unchanged.
pub fn format_time(time: &str) -> String {
    let Some((h, m)) = time.split_once(':') else {
        return time.to_string();
    };
    let (Ok(hours), Ok(minutes)) = (h.trim().parse::<u32>(), m.trim().parse::<u32>()) else {
        return time.to_string();
    };
    let period = if hours >= 12 { "PM" } else { "AM" };
    let hour12 = match hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{hour12}:{minutes:02} {period}")
}

/// "19 Oct 2026".
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// "19 Oct 2026 at 2:30 PM". Unparseable dates are shown as given.
pub fn format_date_time(date: &str, time: Option<&str>) -> String {
    let formatted = parse_date(date).map_or_else(|| date.to_string(), format_date);
    match time {
        Some(time) => format!("{formatted} at {}", format_time(time)),
        None => formatted,
    }
}

/// Rounds half away from negative infinity, like the platform's
/// `Math.round`.
fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Human distance between `target` and `now`, e.g. "In 20 min" or
/// "3 hours ago". Beyond a day in the past, or a week in the future, the
/// plain date is shown.
pub fn relative_time(target: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff_ms = (target - now).num_milliseconds() as f64;
    let mins = round_half_up(diff_ms / 60_000.0);
    let hours = round_half_up(diff_ms / 3_600_000.0);
    let days = round_half_up(diff_ms / 86_400_000.0);

    if mins < 0 {
        if mins > -60 {
            return format!("{} min ago", mins.abs());
        }
        if hours > -24 {
            return format!("{} hours ago", hours.abs());
        }
        return format_date(target.date_naive());
    }
    if mins < 60 {
        return format!("In {mins} min");
    }
    if hours < 24 {
        return format!("In {hours} hours");
    }
    if days == 1 {
        return "Tomorrow".to_string();
    }
    if days < 7 {
        return format!("In {days} days");
    }
    format_date(target.date_naive())
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "USD" => Some("US$"),
        _ => None,
    }
}

/// "€1,234.50". Currencies without a known symbol are prefixed with their
/// ISO code.
pub fn format_currency(amount: f64, currency: &str) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let number = format!("{}.{frac}", group_thousands(int_part));
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    match currency_symbol(currency) {
        Some(symbol) => format!("{sign}{symbol}{number}"),
        None => format!("{sign}{currency} {number}"),
    }
}

/// Thousands-separated number with at most three decimals.
pub fn format_number(num: f64) -> String {
    let fixed = format!("{:.3}", num.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac.trim_end_matches('0');
    let sign = if num < 0.0 { "-" } else { "" };
    if frac.is_empty() {
        format!("{sign}{}", group_thousands(int_part))
    } else {
        format!("{sign}{}.{frac}", group_thousands(int_part))
    }
}

pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        return format!("{} m", (km * 1000.0).round() as i64);
    }
    format!("{km:.1} km")
}

pub fn format_duration(minutes: u32) -> String {
    if minutes < 60 {
        return format!("{minutes} min");
    }
    let hours = minutes / 60;
    match minutes % 60 {
        0 => format!("{hours} hr"),
        mins => format!("{hours} hr {mins} min"),
    }
}

/// Cut to `max_len` characters, ending in "..." when shortened.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{kept}...")
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.as_str().to_lowercase();
            first.to_uppercase().chain(rest.chars()).collect()
        }
        None => String::new(),
    }
}

/// "Maria da Silva" -> "MD".
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn time_uses_twelve_hour_clock() {
        assert_eq!(format_time("14:30"), "2:30 PM");
        assert_eq!(format_time("00:05"), "12:05 AM");
        assert_eq!(format_time("12:00"), "12:00 PM");
        assert_eq!(format_time("soon"), "soon");
    }

    #[test]
    fn dates_are_day_month_year() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 9).unwrap();
        assert_eq!(format_date(date), "9 Oct 2026");
        assert_eq!(format_date_time("2026-10-09", Some("09:15")), "9 Oct 2026 at 9:15 AM");
        assert_eq!(format_date_time("2026-10-09T08:00:00Z", None), "9 Oct 2026");
        assert_eq!(format_date_time("tomorrow", None), "tomorrow");
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        assert_eq!(relative_time(now + Duration::minutes(20), now), "In 20 min");
        assert_eq!(relative_time(now + Duration::hours(5), now), "In 5 hours");
        assert_eq!(relative_time(now + Duration::hours(26), now), "Tomorrow");
        assert_eq!(relative_time(now + Duration::days(3), now), "In 3 days");
        assert_eq!(relative_time(now + Duration::days(10), now), "29 Oct 2026");
        assert_eq!(relative_time(now - Duration::minutes(15), now), "15 min ago");
        assert_eq!(relative_time(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(relative_time(now - Duration::days(2), now), "17 Oct 2026");
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(1234.5, "EUR"), "€1,234.50");
        assert_eq!(format_currency(45.0, "GBP"), "£45.00");
        assert_eq!(format_currency(-3.456, "EUR"), "-€3.46");
        assert_eq!(format_currency(1_000_000.0, "TRY"), "TRY 1,000,000.00");
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(1234567.0), "1,234,567");
        assert_eq!(format_number(12.5), "12.5");
    }

    #[test]
    fn distance_and_duration() {
        assert_eq!(format_distance(0.42), "420 m");
        assert_eq!(format_distance(18.26), "18.3 km");
        assert_eq!(format_duration(45), "45 min");
        assert_eq!(format_duration(120), "2 hr");
        assert_eq!(format_duration(95), "1 hr 35 min");
    }

    #[test]
    fn string_helpers() {
        assert_eq!(truncate("Lisbon Airport", 20), "Lisbon Airport");
        assert_eq!(truncate("Lisbon Humberto Delgado Airport", 10), "Lisbon ...");
        assert_eq!(capitalize("pENDING"), "Pending");
        assert_eq!(capitalize(""), "");
        assert_eq!(initials("maria da silva"), "MD");
        assert_eq!(initials("  "), "");
    }
}
