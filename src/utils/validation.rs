use crate::utils::error::{MatcherError, Result};
use std::fmt::Display;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl Display, reason: impl Into<String>) -> MatcherError {
    MatcherError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Semantic search endpoints must be absolute http(s) URLs.
pub fn check_endpoint(field: &str, endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint.trim())
        .map_err(|e| invalid(field, endpoint, format!("Not a valid URL: {}", e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(
            field,
            endpoint,
            format!("Semantic search must be reached over http or https, not {}", scheme),
        )),
    }
}

/// Inclusive bounds check for numeric settings.
pub fn check_range<T: PartialOrd + Display + Copy>(field: &str, value: T, min: T, max: T) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(field, value, format!("Value must be between {} and {}", min, max)));
    }
    Ok(())
}

/// Output paths and filenames: no blank values, no NUL bytes.
pub fn check_non_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "Value cannot be empty or whitespace-only"));
    }
    if value.contains('\0') {
        return Err(invalid(field, value.escape_default(), "Value contains null bytes"));
    }
    Ok(())
}

pub fn require<'a, T>(field: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| MatcherError::MissingConfigError {
        field: field.to_string(),
    })
}
