use crate::utils::error::{RatingError, Result};
use std::str::FromStr;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(RatingError::invalid_input(field_name, "path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(RatingError::invalid_input(
            field_name,
            "path contains null bytes",
        ));
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RatingError::invalid_input(
            field_name,
            "value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(RatingError::invalid_input(
            field_name,
            format!("value {} must be between {} and {}", value, min, max),
        ));
    }
    Ok(())
}

/// Parses a required raw field, e.g. a query parameter or a CLI argument.
pub fn parse_required<T>(field_name: &str, raw: Option<&str>) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| RatingError::invalid_input(field_name, "field is required"))?;

    raw.parse::<T>().map_err(|e| {
        RatingError::invalid_input(field_name, format!("'{}' is not valid: {}", raw, e))
    })
}
