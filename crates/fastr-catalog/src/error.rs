//! # Catalog Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  reqwest / serde_json / std::io                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CatalogError (this module) ← Adds context and categorization          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  KioskError (apps/kiosk) ← Logged, scan dropped, loop keeps running    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A lookup miss is not an error at the trait level (`Ok(None)`).
//! `NotFound` only appears when a caller asks for a required product.

use fastr_core::ValidationError;
use thiserror::Error;

/// Catalog operation errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product carries this tag.
    #[error("No product for tag: {tag_id}")]
    NotFound { tag_id: String },

    /// Request could not be sent or the connection failed.
    #[error("Catalog request failed: {0}")]
    Http(String),

    /// Catalog service answered with a non-success status.
    #[error("Catalog service returned HTTP {status}")]
    Status { status: u16 },

    /// Response body or catalog file was not a valid product record.
    #[error("Malformed product data: {0}")]
    Decode(String),

    /// A record decoded but broke a product rule.
    #[error("Invalid product record: {0}")]
    InvalidRecord(#[from] ValidationError),

    /// Two products in a local table share one tag.
    #[error("Duplicate tag '{tag_id}' in catalog")]
    DuplicateTag { tag_id: String },

    /// Catalog endpoint URL is unusable.
    #[error("Invalid catalog endpoint: {0}")]
    InvalidEndpoint(String),

    /// Reading a catalog file failed.
    #[error("Failed to read catalog: {0}")]
    Io(String),
}

impl CatalogError {
    pub fn not_found(tag_id: impl Into<String>) -> Self {
        CatalogError::NotFound {
            tag_id: tag_id.into(),
        }
    }

    /// True for a plain lookup miss, which callers ignore silently.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }

    /// True when retrying the same lookup later might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            CatalogError::Http(_) => true,
            CatalogError::Status { status } => *status >= 500,
            _ => false,
        }
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            CatalogError::Status {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            CatalogError::Decode(err.to_string())
        } else {
            CatalogError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for CatalogError {
    fn from(err: url::ParseError) -> Self {
        CatalogError::InvalidEndpoint(err.to_string())
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io(err.to_string())
    }
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
