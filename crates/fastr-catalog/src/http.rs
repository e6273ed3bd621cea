//! # HTTP Catalog
//!
//! Queries a product service for each scanned tag.
//!
//! ## Protocol
//! ```text
//! GET {endpoint}?tag_id=99231131167
//!
//! 200 {"id":1,"tag_id":"99231131167","title":"T-Shirt","rate":500,...}  → Some(product)
//! 200 null | 200 {} | 200 <empty body> | 404                              → None
//! other status                                                             → Status error
//! ```

use std::time::Duration;

use async_trait::async_trait;
use fastr_core::validation::validate_product;
use fastr_core::Product;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::{CatalogError, CatalogResult};
use crate::{normalize_tag, Catalog};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Catalog backed by a remote product-query endpoint.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    endpoint: Url,
}

impl HttpCatalog {
    /// Creates a client for `endpoint` with a per-request timeout.
    ///
    /// ## Errors
    /// `InvalidEndpoint` when the URL does not parse or is not http(s).
    pub fn new(endpoint: &str, timeout: Duration) -> CatalogResult<Self> {
        let endpoint = Url::parse(endpoint)?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(CatalogError::InvalidEndpoint(format!(
                "unsupported scheme '{}'",
                endpoint.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Http(e.to_string()))?;

        Ok(HttpCatalog { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn decode(tag: &str, body: &[u8]) -> CatalogResult<Option<Product>> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let value: Value = serde_json::from_slice(body)?;
        let is_empty = match &value {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        };
        if is_empty {
            return Ok(None);
        }

        let mut product: Product = serde_json::from_value(value)?;
        validate_product(&product)?;
        if product.tag_id.trim().is_empty() {
            product.tag_id = tag.to_string();
        }
        Ok(Some(product))
    }
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn lookup(&self, tag_id: &str) -> CatalogResult<Option<Product>> {
        let Some(tag) = normalize_tag(tag_id) else {
            return Ok(None);
        };

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("tag_id", tag)])
            .send()
            .await
            .map_err(|e| {
                warn!(tag_id = %tag, error = %e, "Catalog request failed");
                CatalogError::from(e)
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(tag_id = %tag, "Catalog has no product for tag");
            return Ok(None);
        }
        if !status.is_success() {
            warn!(tag_id = %tag, status = status.as_u16(), "Catalog returned error status");
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let product = Self::decode(tag, &body)?;
        debug!(tag_id = %tag, hit = product.is_some(), "HTTP catalog lookup");
        Ok(product)
    }

    fn backend(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fastr_core::Money;

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = HttpCatalog::new("ftp://catalog.local/products", DEFAULT_TIMEOUT).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidEndpoint(_)));

        let err = HttpCatalog::new("not a url", DEFAULT_TIMEOUT).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidEndpoint(_)));
    }

    #[test]
    fn test_decode_empty_shapes_are_misses() {
        assert!(HttpCatalog::decode("T", b"").unwrap().is_none());
        assert!(HttpCatalog::decode("T", b"  \n").unwrap().is_none());
        assert!(HttpCatalog::decode("T", b"null").unwrap().is_none());
        assert!(HttpCatalog::decode("T", b"{}").unwrap().is_none());
    }

    #[test]
    fn test_decode_fills_missing_tag() {
        let body = br#"{"id": 4, "title": "Cap", "rate": 250}"#;
        let product = HttpCatalog::decode("17072247175", body).unwrap().unwrap();

        assert_eq!(product.tag_id, "17072247175");
        assert_eq!(product.rate, Money::from_major(250));
    }

    #[test]
    fn test_decode_rejects_invalid_record() {
        let body = br#"{"id": 4, "title": "", "rate": 250}"#;
        let err = HttpCatalog::decode("T", body).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRecord(_)));

        let err = HttpCatalog::decode("T", b"[1,2]").unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }
}
