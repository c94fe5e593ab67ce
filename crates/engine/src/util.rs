//! Internal helpers for input validation and derived values.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every operation enforces the same invariants.

use chrono::{Datelike, Months, NaiveDate};

use crate::{EngineError, ResultEngine, budgets::FULL_ALLOCATION_BP};

pub(crate) const MAX_NAME_LEN: usize = 64;

/// Trim a display name and reject empty or oversized values.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(EngineError::InvalidName(format!(
            "{label} name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// `current / target` in basis points, capped at 100%.
pub(crate) fn progress_bp(current_minor: i64, target_minor: i64) -> i64 {
    if target_minor <= 0 || current_minor <= 0 {
        return 0;
    }
    let ratio = i128::from(current_minor) * i128::from(FULL_ALLOCATION_BP) / i128::from(target_minor);
    ratio.min(i128::from(FULL_ALLOCATION_BP)) as i64
}

/// First and last day of the month containing `date`.
pub fn month_bounds(date: NaiveDate) -> ResultEngine<(NaiveDate, NaiveDate)> {
    let invalid = || EngineError::InvalidDate(format!("invalid month for {date}"));
    let start = date.with_day(1).ok_or_else(invalid)?;
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(invalid)?;
    Ok((start, end))
}

/// Parse a `YYYY-MM` month into its first day.
pub fn parse_month(value: &str) -> ResultEngine<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d")
        .map_err(|_| EngineError::InvalidDate(format!("invalid month '{value}', expected YYYY-MM")))
}

pub(crate) fn ensure_date_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (from, to)
        && from > to
    {
        return Err(EngineError::InvalidDate(
            "from must not be after to".to_string(),
        ));
    }
    Ok(())
}

/// Field errors for a registration attempt. Empty when the input is valid.
pub(crate) fn registration_errors(username: &str, email: &str, password: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if let Err(err) = validate_username(username) {
        errors.push(err);
    }
    if let Err(err) = validate_email(email) {
        errors.push(err);
    }
    if let Err(err) = validate_password(password) {
        errors.push(err);
    }
    errors
}

fn validate_username(username: &str) -> Result<(), String> {
    let len = username.chars().count();
    if !(3..=32).contains(&len) {
        return Err("username must be between 3 and 32 characters".to_string());
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err("username may only contain letters, digits, '_', '.' and '-'".to_string());
    }
    Ok(())
}

pub(crate) fn validate_email(email: &str) -> Result<(), String> {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err("email must contain exactly one '@'".to_string());
    };
    if local.is_empty() || domain.is_empty() || email.chars().any(char::is_whitespace) {
        return Err("email is not valid".to_string());
    }
    Ok(())
}

pub(crate) fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < 8 {
        return Err("password must be at least 8 characters".to_string());
    }
    Ok(())
}
