//! Per-field validation rules for query and path parameters.

use crate::error::FilterError;
use regex::Regex;
use std::sync::OnceLock;

/// Maximum length of a slug id.
pub const MAX_ID_LEN: usize = 50;

fn slug_pattern() -> &'static Regex {
    static SLUG: OnceLock<Regex> = OnceLock::new();
    SLUG.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("slug pattern compiles"))
}

/// Validate a path id: required, at most 50 characters, letters, digits, `-` and `_` only.
pub fn validate_id(param: &str, value: &str) -> Result<(), FilterError> {
    if value.is_empty() {
        return Err(FilterError(format!("{} is required", param)));
    }
    if value.chars().count() > MAX_ID_LEN {
        return Err(FilterError(format!(
            "{} cannot exceed {} characters",
            param, MAX_ID_LEN
        )));
    }
    if !slug_pattern().is_match(value) {
        return Err(FilterError(format!(
            "{} contains invalid characters (allowed: a-z, A-Z, 0-9, -, _)",
            param
        )));
    }
    Ok(())
}

pub fn max_chars(param: &str, value: &str, max: usize) -> Result<(), FilterError> {
    if value.chars().count() > max {
        return Err(FilterError(format!(
            "{}: value exceeds max length of {}",
            param, max
        )));
    }
    Ok(())
}

pub fn max_values(param: &str, values: &[String], max: usize) -> Result<(), FilterError> {
    if values.len() > max {
        return Err(FilterError(format!("{}: too many values (max {})", param, max)));
    }
    Ok(())
}

pub fn one_of(param: &str, value: &str, allowed: &[&str]) -> Result<(), FilterError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(FilterError(format!(
        "{} must be one of: {}",
        param,
        allowed.join(", ")
    )))
}

pub fn parse_int(param: &str, value: &str) -> Result<i64, FilterError> {
    value
        .parse::<i64>()
        .map_err(|_| FilterError(format!("{} must be a valid integer", param)))
}

/// Integer parsed and checked against an inclusive range.
pub fn int_in(param: &str, value: &str, min: i64, max: i64) -> Result<i64, FilterError> {
    let n = parse_int(param, value)?;
    if n < min || n > max {
        return Err(FilterError(format!(
            "{} must be between {} and {}",
            param, min, max
        )));
    }
    Ok(n)
}

/// Accepts the usual spellings: 1, t, T, TRUE, true, True and their false counterparts.
pub fn parse_bool(param: &str, value: &str) -> Result<bool, FilterError> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(FilterError(format!("{} must be a valid boolean", param))),
    }
}
