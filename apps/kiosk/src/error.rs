//! # Kiosk Error Type
//!
//! Aggregates the crate errors the session can hit.
//!
//! ```text
//! CoreError ─────┐
//! CatalogError ──┼──► KioskError ──► warn! + one line to the operator
//! ExportError ───┘                   (the event loop keeps running)
//!
//! Config / Io ──────► KioskError ──► startup aborts
//! ```

use fastr_catalog::CatalogError;
use fastr_core::{CoreError, ValidationError};
use fastr_export::ExportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KioskError {
    /// Configuration file unreadable or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Cart rejected the operation.
    #[error(transparent)]
    Cart(#[from] CoreError),

    /// Product lookup failed (not a plain miss).
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Receipt export failed; the cart was kept.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Operator typed something we do not understand.
    #[error("Unknown command: {0}")]
    InvalidCommand(String),

    /// Terminal or device I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl KioskError {
    /// Machine-readable category, shown next to the message.
    pub fn code(&self) -> &'static str {
        match self {
            KioskError::Config(_) => "CONFIG",
            KioskError::Cart(CoreError::RateTooLarge { .. }) => "INVALID_PRODUCT",
            KioskError::Cart(CoreError::CartTooLarge { .. }) => "CART_FULL",
            KioskError::Cart(_) => "INVALID_QUANTITY",
            KioskError::Catalog(e) if e.is_not_found() => "NOT_FOUND",
            KioskError::Catalog(_) => "CATALOG_UNAVAILABLE",
            KioskError::Export(_) => "EXPORT_FAILED",
            KioskError::InvalidCommand(_) => "BAD_COMMAND",
            KioskError::Io(_) => "IO",
        }
    }
}

impl From<toml::de::Error> for KioskError {
    fn from(err: toml::de::Error) -> Self {
        KioskError::Config(err.to_string())
    }
}

impl From<ValidationError> for KioskError {
    fn from(err: ValidationError) -> Self {
        KioskError::Config(err.to_string())
    }
}

pub type KioskResult<T> = Result<T, KioskError>;
