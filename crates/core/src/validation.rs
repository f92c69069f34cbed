//! Input validation helpers shared by the catalog entity modules.
//!
//! Field-level rules (lengths, required strings) are declared on the DTOs
//! with `validator` derives and checked through [`validate_input`]; the
//! cross-field rules below are checked on the mapped entity.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use validator::Validate;

use crate::error::CoreError;

/// Run `validator` rules on a DTO, converting failures to [`CoreError::Validation`].
///
/// The message lists the offending fields in sorted order so it is stable.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input.validate().map_err(|errors| {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        CoreError::Validation(format!("Invalid fields: {}", fields.join(", ")))
    })
}

/// Check that an ISO-4217 style currency code is three uppercase ASCII letters.
pub fn validate_currency_code(field: &str, code: &str) -> Result<(), CoreError> {
    if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{field} must be a 3-letter uppercase currency code, got '{code}'"
        )))
    }
}

/// Same as [`validate_currency_code`] for optional fields.
pub fn validate_optional_currency_code(field: &str, code: Option<&str>) -> Result<(), CoreError> {
    match code {
        Some(code) => validate_currency_code(field, code),
        None => Ok(()),
    }
}

/// Check that an optional end date is not before the start date.
pub fn validate_date_range(
    start_field: &str,
    start: Option<NaiveDate>,
    end_field: &str,
    end: Option<NaiveDate>,
) -> Result<(), CoreError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(CoreError::Validation(format!(
                "{end_field} ({end}) must not be before {start_field} ({start})"
            )));
        }
    }
    Ok(())
}

/// Check that an optional lower bound does not exceed an optional upper bound.
pub fn validate_bounds<T: PartialOrd + std::fmt::Display>(
    min_field: &str,
    min: Option<T>,
    max_field: &str,
    max: Option<T>,
) -> Result<(), CoreError> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(CoreError::Validation(format!(
                "{min_field} ({min}) must not exceed {max_field} ({max})"
            )));
        }
    }
    Ok(())
}

/// Check that an optional numeric value is not negative.
pub fn validate_non_negative<T: PartialOrd + Default + std::fmt::Display>(
    field: &str,
    value: Option<T>,
) -> Result<(), CoreError> {
    match value {
        Some(v) if v < T::default() => Err(CoreError::Validation(format!(
            "{field} must not be negative, got {v}"
        ))),
        _ => Ok(()),
    }
}

/// Precision and scale of the `NUMERIC(19,4)` amount and limit columns.
pub const AMOUNT_PRECISION: u32 = 19;
pub const AMOUNT_SCALE: u32 = 4;

/// Precision and scale of the `NUMERIC(9,6)` rate columns.
pub const RATE_PRECISION: u32 = 9;
pub const RATE_SCALE: u32 = 6;

/// Check that an optional decimal fits a `NUMERIC(precision, scale)` column.
///
/// Trailing zeros do not count towards the scale, so `"5.000000"` fits a
/// scale of 4. The integer part may have at most `precision - scale` digits.
pub fn validate_decimal(
    field: &str,
    value: Option<Decimal>,
    precision: u32,
    scale: u32,
) -> Result<(), CoreError> {
    let Some(v) = value else {
        return Ok(());
    };
    if v.normalize().scale() > scale {
        return Err(CoreError::Validation(format!(
            "{field} allows at most {scale} decimal places, got {v}"
        )));
    }
    let integer_digits = precision.saturating_sub(scale);
    let limit = Decimal::from(10_i64.pow(integer_digits));
    if v.abs() >= limit {
        return Err(CoreError::Validation(format!(
            "{field} must be less than {limit} in absolute value, got {v}"
        )));
    }
    Ok(())
}

/// [`validate_decimal`] for `NUMERIC(19,4)` amount and limit values.
pub fn validate_amount(field: &str, value: Option<Decimal>) -> Result<(), CoreError> {
    validate_decimal(field, value, AMOUNT_PRECISION, AMOUNT_SCALE)
}

/// [`validate_decimal`] for `NUMERIC(9,6)` rates.
pub fn validate_rate(field: &str, value: Option<Decimal>) -> Result<(), CoreError> {
    validate_decimal(field, value, RATE_PRECISION, RATE_SCALE)
}
