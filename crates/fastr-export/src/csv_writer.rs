//! # CSV Receipt Writer
//!
//! One file per checkout second:
//!
//! ```text
//! <directory>/kart_products_20240501103000.csv
//!
//! Product ID,Title,Rate,Quantity
//! 1,T-Shirt,500.00,2
//! 4,Cap,250.00,1
//! ```
//!
//! Two checkouts inside the same second share a file; the second one appends
//! its rows without repeating the header.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use fastr_core::CartSnapshot;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ExportResult;
use crate::{Receipt, ReceiptSink};

/// Header row of every new receipt file.
pub const CSV_HEADER: [&str; 4] = ["Product ID", "Title", "Rate", "Quantity"];

const FILE_PREFIX: &str = "kart_products_";
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Writes checkout snapshots as CSV files under a directory.
#[derive(Debug, Clone)]
pub struct CsvReceiptWriter {
    directory: PathBuf,
}

impl CsvReceiptWriter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        CsvReceiptWriter {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the receipt file for a checkout at `at`.
    pub fn file_path(&self, at: DateTime<Local>) -> PathBuf {
        self.directory
            .join(format!("{}{}.csv", FILE_PREFIX, at.format(TIMESTAMP_FORMAT)))
    }
}

impl ReceiptSink for CsvReceiptWriter {
    fn export(&self, snapshot: &CartSnapshot, at: DateTime<Local>) -> ExportResult<Receipt> {
        fs::create_dir_all(&self.directory)?;

        let path = self.file_path(at);
        let appended = path.exists();

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if !appended {
            writer.write_record(CSV_HEADER)?;
        }

        for item in &snapshot.items {
            let quantity = item.quantity.to_string();
            let rate = item.product.rate.to_decimal_string();
            writer.write_record([
                item.product.id.as_str(),
                item.product.title.as_str(),
                rate.as_str(),
                quantity.as_str(),
            ])?;
            debug!(product_id = %item.product.id, quantity = item.quantity, "Wrote receipt row");
        }
        writer.flush()?;

        let receipt = Receipt {
            id: Uuid::new_v4(),
            path,
            rows: snapshot.items.len(),
            appended,
            totals: snapshot.totals,
            exported_at: at,
        };

        info!(
            receipt_id = %receipt.id,
            path = ?receipt.path,
            rows = receipt.rows,
            appended = receipt.appended,
            total = %receipt.totals.total,
            "Exported receipt"
        );

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_file_name_uses_second_resolution_timestamp() {
        let writer = CsvReceiptWriter::new("/tmp/exports");
        let at = Local.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap();

        assert_eq!(
            writer.file_path(at),
            PathBuf::from("/tmp/exports/kart_products_20240501103000.csv")
        );
    }
}
