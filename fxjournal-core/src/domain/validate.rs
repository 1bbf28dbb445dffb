//! Numeric and text checks applied to drafts and patches before they reach
//! the store. Invalid input is rejected, never coerced to NaN or zero.

use crate::error::ValidationError;

/// Parse a price typed by a user.
///
/// Surrounding whitespace is ignored. Empty, non-numeric and non-finite
/// input (`"NaN"`, `"inf"`) is rejected.
pub fn parse_price(field: &'static str, input: &str) -> Result<f64, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    let value: f64 = trimmed.parse().map_err(|_| ValidationError::NotANumber {
        field,
        input: input.to_string(),
    })?;
    finite(field, value)
}

/// Like [`parse_price`] but treats empty input as "not provided".
pub fn parse_optional_price(
    field: &'static str,
    input: &str,
) -> Result<Option<f64>, ValidationError> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_price(field, input).map(Some)
}

pub fn finite(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NonFinite { field })
    }
}

pub fn non_negative(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    let value = finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(value)
}

pub fn optional_finite(field: &'static str, value: Option<f64>) -> Result<(), ValidationError> {
    if let Some(v) = value {
        finite(field, v)?;
    }
    Ok(())
}

pub fn non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}
