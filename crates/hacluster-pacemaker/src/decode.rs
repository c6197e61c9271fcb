//! Pacemaker value decoding: sentinel scores, node types and timestamps.
//!
//! Pacemaker represents "infinity" in-band. Fail counts saturate at
//! 1,000,000 and constraint scores use the `INFINITY` / `-INFINITY`
//! tokens; both are exported as IEEE infinities, never clamped.

use chrono::{NaiveDateTime, Weekday};

use crate::error::{PacemakerError, PacemakerResult};

/// Pacemaker's INFINITY score.
pub const PCMK_INFINITY: i64 = 1_000_000;

/// `asctime` layout used by `crm_mon` for `last_change` once the leading
/// weekday is stripped, read as UTC.
pub const LAST_CHANGE_FORMAT: &str = "%b %e %H:%M:%S %Y";

/// | fail count      | value    |
/// |-----------------|----------|
/// | `< 1_000_000`   | as is    |
/// | `>= 1_000_000`  | `+inf`   |
pub fn fail_count_value(raw: i64) -> f64 {
    if raw >= PCMK_INFINITY {
        f64::INFINITY
    } else {
        raw as f64
    }
}

/// | score               | value    |
/// |---------------------|----------|
/// | `INFINITY`          | `+inf`   |
/// | `-INFINITY`         | `-inf`   |
/// | signed integer text | as is    |
/// | anything else       | `0.0`    |
pub fn constraint_score(raw: &str) -> f64 {
    match raw {
        "INFINITY" => f64::INFINITY,
        "-INFINITY" => f64::NEG_INFINITY,
        other => other.parse::<i64>().map(|s| s as f64).unwrap_or(0.0),
    }
}

/// `member`, `ping` and `remote` pass through, anything else is `unknown`.
pub fn node_type_label(raw: &str) -> &'static str {
    match raw {
        "member" => "member",
        "ping" => "ping",
        "remote" => "remote",
        _ => "unknown",
    }
}

/// Parse a `last_change` time into Unix epoch seconds.
///
/// The weekday must be a valid day name but is not checked against the
/// date.
pub fn parse_last_change(raw: &str) -> PacemakerResult<i64> {
    let invalid = |reason: String| PacemakerError::LastChange {
        value: raw.to_string(),
        reason,
    };

    let (weekday, rest) = raw
        .trim()
        .split_once(' ')
        .ok_or_else(|| invalid("missing weekday".to_string()))?;
    if weekday.len() != 3 || weekday.parse::<Weekday>().is_err() {
        return Err(invalid(format!("invalid weekday '{weekday}'")));
    }

    NaiveDateTime::parse_from_str(rest, LAST_CHANGE_FORMAT)
        .map(|t| t.and_utc().timestamp())
        .map_err(|e| invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fail_count_sentinel() {
        assert_eq!(fail_count_value(0), 0.0);
        assert_eq!(fail_count_value(999_999), 999_999.0);
        assert_eq!(fail_count_value(1_000_000), f64::INFINITY);
        assert_eq!(fail_count_value(5_000_000), f64::INFINITY);
    }

    #[test]
    fn constraint_score_tokens() {
        assert_eq!(constraint_score("INFINITY"), f64::INFINITY);
        assert_eq!(constraint_score("-INFINITY"), f64::NEG_INFINITY);
        assert_eq!(constraint_score("150"), 150.0);
        assert_eq!(constraint_score("-20"), -20.0);
        assert_eq!(constraint_score("+5"), 5.0);
    }

    #[test]
    fn constraint_score_malformed_is_zero() {
        assert_eq!(constraint_score(""), 0.0);
        assert_eq!(constraint_score("infinity"), 0.0);
        assert_eq!(constraint_score("1.5"), 0.0);
        assert_eq!(constraint_score("+INFINITY"), 0.0);
    }

    #[test]
    fn node_types() {
        assert_eq!(node_type_label("member"), "member");
        assert_eq!(node_type_label("ping"), "ping");
        assert_eq!(node_type_label("remote"), "remote");
        assert_eq!(node_type_label("Member"), "unknown");
        assert_eq!(node_type_label(""), "unknown");
    }

    #[test]
    fn last_change_epoch() {
        assert_eq!(parse_last_change("Fri Nov 29 10:57:15 2019").unwrap(), 1_575_025_035);
        // single-digit days are space padded
        assert_eq!(parse_last_change("Mon Mar  2 10:00:00 2020").unwrap(), 1_583_143_200);
    }

    #[test]
    fn last_change_ignores_weekday_mismatch() {
        // 2019-11-29 was a Friday
        assert_eq!(parse_last_change("Mon Nov 29 10:57:15 2019").unwrap(), 1_575_025_035);
    }

    #[test]
    fn last_change_invalid() {
        assert!(matches!(
            parse_last_change("2019-11-29T10:57:15Z"),
            Err(PacemakerError::LastChange { .. })
        ));
        assert!(parse_last_change("").is_err());
        assert!(parse_last_change("Xyz Nov 29 10:57:15 2019").is_err());
        assert!(parse_last_change("Friday Nov 29 10:57:15 2019").is_err());
    }
}
