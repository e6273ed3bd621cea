//! # Error Types
//!
//! ```text
//! fastr-core            CoreError        cart rule violations
//!                       ValidationError  bad catalog record or tax rate
//! fastr-catalog         CatalogError     lookup failures (wraps ValidationError)
//! fastr-export          ExportError      receipt I/O failures
//! apps/kiosk            KioskError       what the operator sees
//! ```

use thiserror::Error;

use crate::money::Money;

/// Cart rule violations.
///
/// A failed mutation never leaves the cart half-updated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Quantity must be at least 1 (got {requested})")]
    InvalidQuantity { requested: i64 },

    /// The line would hold more units than one line allows.
    #[error("A line holds at most {max} units (would be {requested})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Unit rate above `MAX_RATE_MINOR`.
    #[error("Rate {rate} is above the {max} limit")]
    RateTooLarge { rate: Money, max: Money },

    /// No room for another distinct product.
    #[error("Cart is full: {max} different products at most")]
    CartTooLarge { max: usize },
}

/// Rejected product records and settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// `id`, `title` or `tag_id` is empty after trimming.
    #[error("Product {field} is blank")]
    Blank { field: &'static str },

    #[error("Product title is longer than {max} characters")]
    TitleTooLong { max: usize },

    #[error("Product rate {minor} is negative")]
    NegativeRate { minor: i64 },

    #[error("Product rate {minor} is above {max} minor units")]
    RateTooLarge { minor: i64, max: i64 },

    #[error("Tax rate of {bps} bps is above 100%")]
    TaxRateTooHigh { bps: u32 },

    #[error("Cart already has {max} lines")]
    TooManyLines { max: usize },
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_messages() {
        assert_eq!(
            CoreError::InvalidQuantity { requested: 0 }.to_string(),
            "Quantity must be at least 1 (got 0)"
        );
        assert_eq!(
            CoreError::QuantityTooLarge {
                requested: 1000,
                max: 999,
            }
            .to_string(),
            "A line holds at most 999 units (would be 1000)"
        );
        assert_eq!(
            CoreError::RateTooLarge {
                rate: Money::from_major(20_000_000_000),
                max: Money::from_major(10_000_000_000),
            }
            .to_string(),
            "Rate 20000000000.00 is above the 10000000000.00 limit"
        );
    }

    #[test]
    fn test_validation_messages_name_the_field() {
        assert_eq!(
            ValidationError::Blank { field: "tag_id" }.to_string(),
            "Product tag_id is blank"
        );
        assert_eq!(
            ValidationError::TaxRateTooHigh { bps: 12000 }.to_string(),
            "Tax rate of 12000 bps is above 100%"
        );
    }
}
