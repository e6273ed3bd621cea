//! # fastr-catalog: Product Lookup for the Kiosk
//!
//! Resolves RFID tag ids to product records.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Lookup Data Flow                                 │
//! │                                                                         │
//! │  Tag scanned ("99231131167")                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 fastr-catalog (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │            Arc<dyn Catalog>  ── lookup(tag) ──►                 │   │
//! │  │               │                      │                          │   │
//! │  │       ┌───────┴───────┐      ┌───────┴────────┐                 │   │
//! │  │       │ LocalCatalog  │      │  HttpCatalog   │                 │   │
//! │  │       │ HashMap by tag│      │ GET ?tag_id=…  │                 │   │
//! │  │       └───────────────┘      └────────────────┘                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Some(Product) → cart add      None → scan ignored                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fastr_catalog::{Catalog, LocalCatalog};
//!
//! let catalog = LocalCatalog::demo();
//! let product = catalog.lookup("17072247175").await?; // Some(Cap)
//! ```

pub mod error;
pub mod http;
pub mod local;

pub use error::{CatalogError, CatalogResult};
pub use http::HttpCatalog;
pub use local::LocalCatalog;

use async_trait::async_trait;
use fastr_core::Product;

/// Lookup capability shared by every catalog backend.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Resolves a tag id to a product. A miss is `Ok(None)`.
    async fn lookup(&self, tag_id: &str) -> CatalogResult<Option<Product>>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Looks up a tag and turns a miss into `CatalogError::NotFound`.
pub async fn lookup_required(catalog: &dyn Catalog, tag_id: &str) -> CatalogResult<Product> {
    catalog
        .lookup(tag_id)
        .await?
        .ok_or_else(|| CatalogError::not_found(tag_id.trim()))
}

/// Trims reader noise off a tag id; blank tags never match.
pub fn normalize_tag(tag_id: &str) -> Option<&str> {
    let tag = tag_id.trim();
    if tag.is_empty() {
        None
    } else {
        Some(tag)
    }
}
