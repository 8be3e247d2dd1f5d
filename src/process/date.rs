use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use super::DATE_UNKNOWN;

static FULL_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})/(\d{1,2})/(\d{1,2})").expect("full date pattern"));
static SHORT_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})/(\d{1,2})").expect("short date pattern"));

/// Pull a `YYYY/MM/DD` date out of a free-text page title.
///
/// A full `YYYY/M/D` match wins. Otherwise a bare `M/D` is accepted: if the
/// first number exceeds 12 the pair is treated as `D/M` and swapped, and the
/// year is resolved against `today` — titles from October onward seen in
/// January–March belong to the previous year (the hall's results straddle
/// the fiscal year boundary). When nothing matches, returns [`DATE_UNKNOWN`].
pub fn infer_date(title: &str, today: NaiveDate) -> String {
    if let Some(caps) = FULL_DATE.captures(title) {
        if let (Ok(y), Ok(m), Ok(d)) = (
            caps[1].parse::<i32>(),
            caps[2].parse::<u32>(),
            caps[3].parse::<u32>(),
        ) {
            return format!("{}/{:02}/{:02}", y, m, d);
        }
    }

    if let Some(caps) = SHORT_DATE.captures(title) {
        if let (Ok(first), Ok(second)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) {
            let (month, day) = if first > 12 { (second, first) } else { (first, second) };
            let year = if today.month() <= 3 && month >= 10 {
                today.year() - 1
            } else {
                today.year()
            };
            return format!("{}/{:02}/{:02}", year, month, day);
        }
    }

    DATE_UNKNOWN.to_string()
}
