//! # fastr-export: Checkout Receipt Export
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "Pay Now"                                                              │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  Cart::snapshot() ──► ReceiptSink::export(snapshot, now)               │
//! │                              │                                          │
//! │               ┌──────────────┴──────────────┐                           │
//! │               ▼                             ▼                           │
//! │          Ok(Receipt)                  Err(ExportError)                  │
//! │          cart.clear()                 cart kept, operator told          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod csv_writer;
pub mod error;

pub use csv_writer::{CsvReceiptWriter, CSV_HEADER};
pub use error::{ExportError, ExportResult};

use std::path::PathBuf;

use chrono::{DateTime, Local};
use fastr_core::{CartSnapshot, CartTotals};
use uuid::Uuid;

/// Proof of a completed export.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    /// Unique id for log correlation.
    pub id: Uuid,
    /// File the rows went to.
    pub path: PathBuf,
    /// Line items written.
    pub rows: usize,
    /// True when the rows were added to an existing file.
    pub appended: bool,
    /// Totals of the exported snapshot.
    pub totals: CartTotals,
    pub exported_at: DateTime<Local>,
}

/// Destination for checkout snapshots.
pub trait ReceiptSink: Send + Sync {
    /// Persists `snapshot`, stamped with `at`.
    fn export(&self, snapshot: &CartSnapshot, at: DateTime<Local>) -> ExportResult<Receipt>;
}
