//! Queue-time durations.
//!
//! Queue estimates travel as strings in two shapes: a compound form such as
//! `"2d 3hrs 15min"` (what the inventory API stores for `avg_time` queues and
//! what users type into filter bounds) and a plain millisecond count. This
//! module converts both to milliseconds and renders milliseconds back into the
//! compound form.
//!
//! Formatting is lossy: seconds are dropped and the strict `>` thresholds
//! collapse everything up to and including one minute into `"< 1min"`, so
//! [`format_duration`] is not an inverse of [`parse_duration`].

const MS_PER_MINUTE: u64 = 60 * 1000;

/// Unit suffixes recognised by [`parse_duration`], with their size in minutes.
const UNITS: [(&str, u64); 3] = [("d", 24 * 60), ("hrs", 60), ("min", 1)];

/// Placeholder shown when no duration is known.
pub const NOT_AVAILABLE: &str = "N/A";

/// Parse a compound duration like `"5d 10hrs 15min"` into milliseconds.
///
/// Each of `{N}d`, `{N}hrs` and `{N}min` contributes its first occurrence;
/// missing components count as zero. Order and repetition are not checked,
/// and anything unrecognised (including the empty string) yields `0`.
pub fn parse_duration(text: &str) -> u64 {
    let minutes = UNITS.iter().fold(0u64, |acc, (suffix, scale)| {
        let count = first_count_before(text, suffix).unwrap_or(0);
        acc.saturating_add(count.saturating_mul(*scale))
    });
    minutes.saturating_mul(MS_PER_MINUTE)
}

/// Interpret a queue value as milliseconds.
///
/// A value made only of digits is already a millisecond count; anything else
/// goes through [`parse_duration`].
pub fn parse_queue_millis(value: &str) -> u64 {
    let trimmed = value.trim();
    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return parse_digits(trimmed);
    }
    parse_duration(trimmed)
}

/// Render a millisecond count as a compound duration.
///
/// | Condition (seconds discarded) | Output |
/// |-------------------------------|--------|
/// | `None` | `"N/A"` |
/// | days > 30 | `"> 1month"` |
/// | days > 1 | `"{d}d {h}hrs {m}min"` |
/// | remaining hours > 1 | `"{h}hrs {m}min"` |
/// | minutes > 1 | `"{m}min"` |
/// | otherwise | `"< 1min"` |
pub fn format_duration(millis: Option<u64>) -> String {
    let Some(millis) = millis else {
        return NOT_AVAILABLE.to_string();
    };

    let total_minutes = millis / 1000 / 60;
    let total_hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    let days = total_hours / 24;
    let hours = total_hours % 24;

    if days > 30 {
        "> 1month".to_string()
    } else if days > 1 {
        format!("{days}d {hours}hrs {minutes}min")
    } else if hours > 1 {
        format!("{hours}hrs {minutes}min")
    } else if minutes > 1 {
        format!("{minutes}min")
    } else {
        "< 1min".to_string()
    }
}

/// Render a millisecond count carried as text.
///
/// Leading integer digits are used the way a lenient integer parse would;
/// text with no leading number, or a negative one, renders as `"< 1min"`.
pub fn format_duration_str(millis: Option<&str>) -> String {
    match millis {
        None => NOT_AVAILABLE.to_string(),
        Some(text) => {
            let value = parse_int_prefix(text).unwrap_or(0).max(0);
            format_duration(Some(value.unsigned_abs()))
        }
    }
}

/// Check that `text` is a single-unit duration bound: `{N}d`, `{N}hrs` or `{N}min`.
pub fn is_duration_bound(text: &str) -> bool {
    UNITS.iter().any(|(suffix, _)| {
        text.strip_suffix(suffix)
            .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
    })
}

/// Lenient integer parse: optional leading whitespace and sign, then digits.
///
/// Trailing garbage is ignored; returns `None` if no digit follows the sign.
pub fn parse_int_prefix(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let end = rest
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let magnitude = i64::try_from(parse_digits(&rest[..end])).unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Find the first maximal run of digits immediately followed by `suffix`.
fn first_count_before(text: &str, suffix: &str) -> Option<u64> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if text[i..].starts_with(suffix) {
                return Some(parse_digits(&text[start..i]));
            }
        } else {
            i += 1;
        }
    }
    None
}

/// Parse an all-digit string, saturating instead of overflowing.
fn parse_digits(digits: &str) -> u64 {
    digits.bytes().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: u64 = 60_000;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;

    #[test]
    fn test_parse_compound() {
        assert_eq!(parse_duration("5d 10hrs 15min"), 5 * DAY + 10 * HOUR + 15 * MINUTE);
        assert_eq!(parse_duration("2hrs"), 2 * HOUR);
        assert_eq!(parse_duration("45min"), 45 * MINUTE);
    }

    #[test]
    fn test_parse_order_is_not_checked() {
        assert_eq!(parse_duration("15min 1d"), DAY + 15 * MINUTE);
    }

    #[test]
    fn test_parse_uses_first_occurrence() {
        assert_eq!(parse_duration("1min 7min"), MINUTE);
    }

    #[test]
    fn test_parse_malformed_is_zero() {
        assert_eq!(parse_duration(""), 0);
        assert_eq!(parse_duration("soon"), 0);
        assert_eq!(parse_duration("< 1min"), MINUTE);
        assert_eq!(parse_duration("> 1month"), 0);
    }

    #[test]
    fn test_parse_saturates() {
        assert_eq!(parse_duration("99999999999999999999999d"), u64::MAX);
    }

    #[test]
    fn test_parse_queue_millis() {
        assert_eq!(parse_queue_millis("60000"), 60_000);
        assert_eq!(parse_queue_millis(" 120000 "), 120_000);
        assert_eq!(parse_queue_millis("2hrs 5min"), 2 * HOUR + 5 * MINUTE);
        assert_eq!(parse_queue_millis(""), 0);
    }

    #[test]
    fn test_format_none() {
        assert_eq!(format_duration(None), "N/A");
        assert_eq!(format_duration_str(None), "N/A");
    }

    #[test]
    fn test_format_strict_boundaries() {
        assert_eq!(format_duration(Some(0)), "< 1min");
        assert_eq!(format_duration(Some(MINUTE)), "< 1min");
        assert_eq!(format_duration(Some(90_000)), "< 1min");
        assert_eq!(format_duration(Some(2 * MINUTE)), "2min");
        assert_eq!(format_duration(Some(2 * MINUTE - 1)), "< 1min");
    }

    #[test]
    fn test_format_hours_and_days() {
        // Exactly one hour: hours == 1 and minutes == 0, so nothing is > 1.
        assert_eq!(format_duration(Some(HOUR)), "< 1min");
        assert_eq!(format_duration(Some(HOUR + 30 * MINUTE)), "30min");
        assert_eq!(format_duration(Some(2 * HOUR + 5 * MINUTE)), "2hrs 5min");
        assert_eq!(format_duration(Some(DAY + 3 * HOUR)), "3hrs 0min");
        assert_eq!(format_duration(Some(2 * DAY + 3 * HOUR + 15 * MINUTE)), "2d 3hrs 15min");
        assert_eq!(format_duration(Some(30 * DAY)), "30d 0hrs 0min");
        assert_eq!(format_duration(Some(31 * DAY)), "> 1month");
    }

    #[test]
    fn test_format_str_is_lenient() {
        assert_eq!(format_duration_str(Some("180000")), "3min");
        assert_eq!(format_duration_str(Some("180000ms")), "3min");
        assert_eq!(format_duration_str(Some("abc")), "< 1min");
        assert_eq!(format_duration_str(Some("-5")), "< 1min");
    }

    #[test]
    fn test_duration_bound_pattern() {
        assert!(is_duration_bound("3d"));
        assert!(is_duration_bound("12hrs"));
        assert!(is_duration_bound("30min"));
        assert!(!is_duration_bound("min"));
        assert!(!is_duration_bound("1d 2hrs"));
        assert!(!is_duration_bound("2h"));
        assert!(!is_duration_bound(""));
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("42"), Some(42));
        assert_eq!(parse_int_prefix("  7 jobs"), Some(7));
        assert_eq!(parse_int_prefix("-3"), Some(-3));
        assert_eq!(parse_int_prefix("+9"), Some(9));
        assert_eq!(parse_int_prefix("x1"), None);
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix(""), None);
    }
}
