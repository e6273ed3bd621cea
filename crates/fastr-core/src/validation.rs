//! # Validation Module
//!
//! Checks applied to data entering the core from outside: catalog records
//! and configured tax rates.
//!
//! ```text
//! catalog JSON ──► serde (shape, price format)
//!              ──► validate_product (blank fields, title length, sign)
//!              ──► Cart::add (quantity and line limits)
//! ```

use crate::error::ValidationError;
use crate::types::Product;
use crate::{MAX_CART_ITEMS, MAX_RATE_MINOR};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product title accepted from a catalog.
const MAX_TITLE_LEN: usize = 200;

/// Validates a tax rate in basis points (0% to 100%).
///
/// ```rust
/// use fastr_core::validation::validate_tax_rate_bps;
///
/// assert!(validate_tax_rate_bps(1000).is_ok());
/// assert!(validate_tax_rate_bps(10_001).is_err());
/// ```
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::TaxRateTooHigh { bps });
    }
    Ok(())
}

/// Checks there is room for one more line.
pub fn validate_cart_size(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_CART_ITEMS {
        return Err(ValidationError::TooManyLines {
            max: MAX_CART_ITEMS,
        });
    }
    Ok(())
}

/// Validates a product record loaded from a catalog source.
///
/// ## Rules
/// - `id` must not be blank
/// - `title` must not be blank and at most 200 characters
/// - `rate` must be between 0 and `MAX_RATE_MINOR`
///
/// The tag id is not checked here; an HTTP catalog fills it in from the
/// lookup key.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    if product.id.as_str().trim().is_empty() {
        return Err(ValidationError::Blank { field: "id" });
    }

    let title = product.title.trim();
    if title.is_empty() {
        return Err(ValidationError::Blank { field: "title" });
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong { max: MAX_TITLE_LEN });
    }

    if product.rate.is_negative() {
        return Err(ValidationError::NegativeRate {
            minor: product.rate.minor(),
        });
    }
    if product.rate.minor() > MAX_RATE_MINOR {
        return Err(ValidationError::RateTooLarge {
            minor: product.rate.minor(),
            max: MAX_RATE_MINOR,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Money;

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(10_000).is_ok());
        assert_eq!(
            validate_tax_rate_bps(10_001),
            Err(ValidationError::TaxRateTooHigh { bps: 10_001 })
        );
    }

    #[test]
    fn test_validate_cart_size() {
        assert!(validate_cart_size(0).is_ok());
        assert!(validate_cart_size(MAX_CART_ITEMS - 1).is_ok());
        assert!(validate_cart_size(MAX_CART_ITEMS).is_err());
    }

    #[test]
    fn test_validate_product() {
        let good = Product::new("1", "T-Shirt", Money::from_major(500));
        assert!(validate_product(&good).is_ok());

        let blank_title = Product::new("1", "  ", Money::from_major(500));
        assert_eq!(
            validate_product(&blank_title),
            Err(ValidationError::Blank { field: "title" })
        );

        let blank_id = Product::new("", "Cap", Money::from_major(250));
        assert_eq!(
            validate_product(&blank_id),
            Err(ValidationError::Blank { field: "id" })
        );

        let negative = Product::new("4", "Cap", Money::from_minor(-1));
        assert_eq!(
            validate_product(&negative),
            Err(ValidationError::NegativeRate { minor: -1 })
        );

        let huge = Product::new("6", "Yacht", Money::from_minor(MAX_RATE_MINOR + 1));
        assert!(matches!(
            validate_product(&huge),
            Err(ValidationError::RateTooLarge { .. })
        ));
        let at_limit = Product::new("6", "Yacht", Money::from_minor(MAX_RATE_MINOR));
        assert!(validate_product(&at_limit).is_ok());

        let long = Product::new("5", "x".repeat(201), Money::zero());
        assert!(matches!(
            validate_product(&long),
            Err(ValidationError::TitleTooLong { .. })
        ));
    }
}
