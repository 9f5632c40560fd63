//! Console input conversion. Blank input always means "not supplied".

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// Scale of every hours value
const HOURS_SCALE: u32 = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("{0} is not a valid number.")]
    InvalidNumber(String),

    #[error("{0} is not a valid decimal number.")]
    InvalidDecimal(String),

    #[error("{value} is out of range ({min}-{max}).")]
    OutOfRange { value: i32, min: i32, max: i32 },

    #[error("A {0} is required.")]
    Missing(&'static str),
}

/// Trimmed text, or `None` for a blank line
pub fn parse_text(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn parse_int(line: &str) -> Result<Option<i32>, InputError> {
    match parse_text(line) {
        None => Ok(None),
        Some(text) => text
            .parse()
            .map(Some)
            .map_err(|_| InputError::InvalidNumber(text)),
    }
}

/// Integer constrained to `min..=max`
pub fn parse_int_in_range(line: &str, min: i32, max: i32) -> Result<Option<i32>, InputError> {
    match parse_int(line)? {
        Some(value) if !(min..=max).contains(&value) => {
            Err(InputError::OutOfRange { value, min, max })
        }
        other => Ok(other),
    }
}

/// Decimal exact at two fractional digits (trailing zeros allowed), rescaled to exactly two
pub fn parse_hours(line: &str) -> Result<Option<Decimal>, InputError> {
    let Some(text) = parse_text(line) else {
        return Ok(None);
    };

    let mut value =
        Decimal::from_str(&text).map_err(|_| InputError::InvalidDecimal(text.clone()))?;
    if value.normalize().scale() > HOURS_SCALE {
        return Err(InputError::InvalidDecimal(text));
    }
    value.rescale(HOURS_SCALE);
    Ok(Some(value))
}
