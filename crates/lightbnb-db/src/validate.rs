//! Input checks applied before a statement is sent.

use crate::error::{DbError, DbResult};
use std::sync::OnceLock;

/// Best-effort email validation.
///
/// This is intentionally not fully RFC-compliant.
pub fn is_email(s: &str) -> bool {
    static EMAIL_RE: OnceLock<regex::Regex> = OnceLock::new();
    EMAIL_RE
        .get_or_init(|| {
            regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid built-in email regex")
        })
        .is_match(s)
}

pub fn require_non_blank(field: &str, value: &str) -> DbResult<()> {
    if value.trim().is_empty() {
        return Err(DbError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

pub fn require_non_negative(field: &str, value: i32) -> DbResult<()> {
    if value < 0 {
        return Err(DbError::validation(format!(
            "{field} must not be negative (got {value})"
        )));
    }
    Ok(())
}

/// `LIMIT` must be zero or positive; Postgres rejects a negative one at execution time.
pub fn check_limit(limit: i64) -> DbResult<i64> {
    if limit < 0 {
        return Err(DbError::validation(format!(
            "limit must not be negative (got {limit})"
        )));
    }
    Ok(limit)
}

/// Convert a dollar amount to the cents stored in `cost_per_night`, rounding to the nearest cent.
pub fn dollars_to_cents(field: &str, dollars: f64) -> DbResult<i32> {
    if !dollars.is_finite() || dollars < 0.0 {
        return Err(DbError::validation(format!(
            "{field} must be a non-negative amount (got {dollars})"
        )));
    }
    let cents = (dollars * 100.0).round();
    if cents > f64::from(i32::MAX) {
        return Err(DbError::validation(format!(
            "{field} {dollars} is out of range"
        )));
    }
    Ok(cents as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_email("sebastianguerra@ymail.com"));
        assert!(!is_email("sebastianguerra"));
        assert!(!is_email("a b@c.d"));
        assert!(!is_email("a@b"));
    }

    #[test]
    fn cents_conversion() {
        assert_eq!(dollars_to_cents("price", 0.0).unwrap(), 0);
        assert_eq!(dollars_to_cents("price", 125.0).unwrap(), 12_500);
        assert_eq!(dollars_to_cents("price", 149.99).unwrap(), 14_999);
        assert!(dollars_to_cents("price", f64::from(i32::MAX / 10)).is_err());
    }

    #[test]
    fn cents_conversion_rejects_nonsense() {
        assert!(matches!(
            dollars_to_cents("price", f64::NAN),
            Err(DbError::Validation(_))
        ));
        assert!(dollars_to_cents("price", f64::INFINITY).is_err());
        assert!(dollars_to_cents("price", -0.01).is_err());
    }

    #[test]
    fn limits() {
        assert_eq!(check_limit(0).unwrap(), 0);
        assert_eq!(check_limit(10).unwrap(), 10);
        assert!(matches!(check_limit(-1), Err(DbError::Validation(_))));
    }

    #[test]
    fn blanks_and_negatives() {
        assert!(require_non_blank("title", "  ").is_err());
        assert!(require_non_blank("title", "Cosy loft").is_ok());
        assert!(require_non_negative("parking_spaces", -2).is_err());
        assert!(require_non_negative("parking_spaces", 0).is_ok());
    }
}
