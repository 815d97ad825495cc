//! Human-readable durations
//!
//! Accepts strings like `1h5m30s`, `90s`, `1.5h` or `250ms`: one or more
//! decimal numbers, each followed by a unit (`ns`, `us`, `µs`, `ms`, `s`,
//! `m`, `h`). A bare `0` is also allowed.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use thiserror::Error;

const NANOS_PER_SEC: u128 = 1_000_000_000;
/// Longest accepted duration, about 292 years
const MAX_NANOS: u128 = i64::MAX as u128;

static COMPONENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]*)(?:\.([0-9]*))?(ns|us|µs|μs|ms|s|m|h)").expect("duration pattern is valid")
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("invalid duration {0:?}")]
    Invalid(String),

    #[error("duration {0:?} is negative")]
    Negative(String),

    #[error("duration {0:?} is too large")]
    Overflow(String),
}

/// Parse a duration string such as `1h5m30s`
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let invalid = || DurationError::Invalid(input.to_string());

    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let caps = COMPONENT.captures(rest).ok_or_else(invalid)?;
        let whole = caps.get(1).map_or("", |m| m.as_str());
        let frac = caps.get(2).map_or("", |m| m.as_str());
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }

        let unit = unit_nanos(&caps[3]);
        let component = component_nanos(whole, frac, unit)
            .ok_or_else(|| DurationError::Overflow(input.to_string()))?;
        total = total
            .checked_add(component)
            .filter(|total| *total <= MAX_NANOS)
            .ok_or_else(|| DurationError::Overflow(input.to_string()))?;

        rest = &rest[caps[0].len()..];
    }

    if negative && total > 0 {
        return Err(DurationError::Negative(input.to_string()));
    }

    Ok(Duration::new(
        (total / NANOS_PER_SEC) as u64,
        (total % NANOS_PER_SEC) as u32,
    ))
}

fn unit_nanos(unit: &str) -> u128 {
    match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => NANOS_PER_SEC,
        "m" => 60 * NANOS_PER_SEC,
        _ => 3_600 * NANOS_PER_SEC,
    }
}

fn component_nanos(whole: &str, frac: &str, unit: u128) -> Option<u128> {
    let mut nanos = if whole.is_empty() {
        0
    } else {
        whole.parse::<u128>().ok()?.checked_mul(unit)?
    };

    // Digits past nanosecond precision cannot matter for any unit we accept
    let frac = &frac[..frac.len().min(20)];
    if !frac.is_empty() {
        let digits: u128 = frac.parse().ok()?;
        let scale = 10u128.pow(frac.len() as u32);
        nanos = nanos.checked_add(digits.checked_mul(unit)? / scale)?;
    }
    Some(nanos)
}

/// Format a duration compactly, e.g. `1h5m30s`, `2s`, `250ms`
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    if total == 0 {
        return if duration.is_zero() {
            "0s".to_string()
        } else {
            format!("{}ms", duration.subsec_millis())
        };
    }

    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    out.push_str(&format!("{}s", seconds));
    out
}
