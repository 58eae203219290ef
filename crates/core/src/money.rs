//! Money validation and gateway minor-unit conversion.
//!
//! Amounts travel through the system as [`Decimal`] major units (rupees).
//! The payment gateway expects integer minor units (paise), so conversion is
//! exact and refuses anything finer than two decimal places.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Currency used when a caller does not name one.
pub const DEFAULT_CURRENCY: &str = "INR";

/// Minor units per major unit (paise per rupee).
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Maximum number of fractional digits an amount may carry.
pub const MAX_FRACTION_DIGITS: u32 = 2;

/// Validate that an amount is chargeable: strictly positive with at most
/// [`MAX_FRACTION_DIGITS`] decimal places.
pub fn validate_amount(amount: Decimal) -> Result<(), String> {
    if amount <= Decimal::ZERO {
        return Err(format!("Amount must be greater than zero, got {amount}"));
    }
    if amount.normalize().scale() > MAX_FRACTION_DIGITS {
        return Err(format!(
            "Amount must have at most {MAX_FRACTION_DIGITS} decimal places, got {amount}"
        ));
    }
    Ok(())
}

/// Convert a major-unit amount into gateway minor units.
///
/// Validates the amount first, so a successful result is always positive.
pub fn to_minor_units(amount: Decimal) -> Result<i64, String> {
    validate_amount(amount)?;
    amount
        .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))
        .and_then(|minor| minor.to_i64())
        .ok_or_else(|| format!("Amount {amount} is too large"))
}

/// Validate an ISO 4217 style currency code (three uppercase ASCII letters).
pub fn validate_currency(code: &str) -> Result<(), String> {
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(format!(
            "Invalid currency '{code}'. Expected a three-letter uppercase code"
        ))
    }
}
