//! Listing vocabulary and validation helpers.
//!
//! Values must match the check constraints in
//! `20261001000001_create_listings_table.sql`.

use rust_decimal::Decimal;

pub const CATEGORY_PROPERTY: &str = "property";
pub const CATEGORY_VEHICLE: &str = "vehicle";
pub const CATEGORY_EQUIPMENT: &str = "equipment";
pub const CATEGORY_ELECTRONICS: &str = "electronics";

pub const VALID_CATEGORIES: &[&str] = &[
    CATEGORY_PROPERTY,
    CATEGORY_VEHICLE,
    CATEGORY_EQUIPMENT,
    CATEGORY_ELECTRONICS,
];

pub const DURATION_HOURLY: &str = "hourly";
pub const DURATION_DAILY: &str = "daily";
pub const DURATION_WEEKLY: &str = "weekly";
pub const DURATION_MONTHLY: &str = "monthly";

pub const VALID_DURATIONS: &[&str] = &[
    DURATION_HOURLY,
    DURATION_DAILY,
    DURATION_WEEKLY,
    DURATION_MONTHLY,
];

pub const VALID_CONDITIONS: &[&str] = &["new", "excellent", "good", "fair"];

/// Listing awaits moderation. New listings start here.
pub const APPROVAL_PENDING: &str = "pending";
/// Listing is visible to renters.
pub const APPROVAL_APPROVED: &str = "approved";
/// Listing was declined by an admin.
pub const APPROVAL_REJECTED: &str = "rejected";

fn validate_one_of(kind: &str, value: &str, allowed: &[&str]) -> Result<(), String> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "Invalid {kind} '{value}'. Must be one of: {}",
            allowed.join(", ")
        ))
    }
}

pub fn validate_category(category: &str) -> Result<(), String> {
    validate_one_of("category", category, VALID_CATEGORIES)
}

pub fn validate_duration(duration: &str) -> Result<(), String> {
    validate_one_of("duration", duration, VALID_DURATIONS)
}

pub fn validate_condition(condition: &str) -> Result<(), String> {
    validate_one_of("condition", condition, VALID_CONDITIONS)
}

/// Rental price must be positive; the optional outright purchase price, when
/// given, must be positive too.
pub fn validate_prices(price: Decimal, purchase_price: Option<Decimal>) -> Result<(), String> {
    if price <= Decimal::ZERO {
        return Err("Price must be greater than zero".to_string());
    }
    if let Some(purchase) = purchase_price {
        if purchase <= Decimal::ZERO {
            return Err("Purchase price must be greater than zero".to_string());
        }
    }
    Ok(())
}

/// Only pending listings can be approved or rejected.
pub fn validate_moderation(current_status: &str) -> Result<(), String> {
    if current_status == APPROVAL_PENDING {
        Ok(())
    } else {
        Err(format!(
            "Listing has already been moderated (status '{current_status}')"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn known_categories_accepted() {
        for category in VALID_CATEGORIES {
            assert!(validate_category(category).is_ok());
        }
    }

    #[test]
    fn unknown_category_lists_allowed_values() {
        let err = validate_category("boats").unwrap_err();
        assert!(err.contains("Invalid category 'boats'"));
        assert!(err.contains("electronics"));
    }

    #[test]
    fn durations_and_conditions() {
        assert!(validate_duration(DURATION_WEEKLY).is_ok());
        assert!(validate_duration("yearly").is_err());
        assert!(validate_condition("good").is_ok());
        assert!(validate_condition("broken").is_err());
    }

    #[test]
    fn prices_must_be_positive() {
        assert!(validate_prices(dec!(1500), None).is_ok());
        assert!(validate_prices(dec!(1500), Some(dec!(90000))).is_ok());
        assert!(validate_prices(Decimal::ZERO, None).is_err());
        assert!(validate_prices(dec!(10), Some(dec!(-1))).is_err());
    }

    #[test]
    fn moderation_only_from_pending() {
        assert!(validate_moderation(APPROVAL_PENDING).is_ok());
        assert!(validate_moderation(APPROVAL_APPROVED).is_err());
        assert!(validate_moderation(APPROVAL_REJECTED).is_err());
    }
}
