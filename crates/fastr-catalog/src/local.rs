//! # Local Catalog
//!
//! In-memory product table keyed by tag id.
//!
//! The table is built once and handed to the kiosk session, instead of
//! living in a process-wide static. Sources:
//! - an explicit product list ([`LocalCatalog::from_products`])
//! - a JSON file holding an array of products ([`LocalCatalog::load`])
//! - the built-in demo table ([`LocalCatalog::demo`])

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use fastr_core::validation::validate_product;
use fastr_core::{Money, Product, ValidationError};
use tracing::{debug, info};

use crate::error::{CatalogError, CatalogResult};
use crate::{normalize_tag, Catalog};

/// Product table keyed by RFID tag id.
#[derive(Debug, Clone, Default)]
pub struct LocalCatalog {
    by_tag: HashMap<String, Product>,
}

impl LocalCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from products, validating each record.
    ///
    /// ## Errors
    /// - `InvalidRecord` for a product with a blank id/title or negative rate
    /// - `InvalidRecord` for a product with no tag id
    /// - `DuplicateTag` when two products share a tag
    pub fn from_products<I>(products: I) -> CatalogResult<Self>
    where
        I: IntoIterator<Item = Product>,
    {
        let mut catalog = Self::new();
        for product in products {
            catalog.insert(product)?;
        }
        Ok(catalog)
    }

    /// Parses a JSON array of products.
    pub fn from_json_str(json: &str) -> CatalogResult<Self> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::from_products(products)
    }

    /// Loads a JSON array of products from disk.
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&contents)?;
        info!(?path, products = catalog.len(), "Loaded local catalog");
        Ok(catalog)
    }

    /// The five demo products the kiosk ships with.
    ///
    /// | Tag           | Product    | Rate |
    /// |---------------|------------|------|
    /// | 99231131167   | T-Shirt    | 500  |
    /// | 9958177152    | Coffee Mug | 350  |
    /// | 194744170     | Sweatshirt | 900  |
    /// | 17072247175   | Cap        | 250  |
    /// | 2202238151    | Sipper     | 700  |
    pub fn demo() -> Self {
        let rows = [
            (1u64, "99231131167", "T-Shirt", 500, "1.png"),
            (2, "9958177152", "Coffee Mug", 350, "2.png"),
            (3, "194744170", "Sweatshirt", 900, "3.png"),
            (4, "17072247175", "Cap", 250, "4.png"),
            (5, "2202238151", "Sipper", 700, "5.png"),
        ];

        let by_tag = rows
            .into_iter()
            .map(|(id, tag, title, rate, image)| {
                let product = Product::new(id, title, Money::from_major(rate))
                    .with_tag(tag)
                    .with_image(image);
                (tag.to_string(), product)
            })
            .collect();

        LocalCatalog { by_tag }
    }

    /// Adds one product under its tag id.
    pub fn insert(&mut self, mut product: Product) -> CatalogResult<()> {
        validate_product(&product)?;

        let tag = normalize_tag(&product.tag_id)
            .ok_or(ValidationError::Blank { field: "tag_id" })?
            .to_string();

        if self.by_tag.contains_key(&tag) {
            return Err(CatalogError::DuplicateTag { tag_id: tag });
        }

        product.tag_id = tag.clone();
        self.by_tag.insert(tag, product);
        Ok(())
    }

    /// Synchronous lookup, for callers outside an async context.
    pub fn get(&self, tag_id: &str) -> Option<&Product> {
        normalize_tag(tag_id).and_then(|tag| self.by_tag.get(tag))
    }

    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }

    /// All products, in no particular order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.by_tag.values()
    }
}

#[async_trait]
impl Catalog for LocalCatalog {
    async fn lookup(&self, tag_id: &str) -> CatalogResult<Option<Product>> {
        let found = self.get(tag_id).cloned();
        debug!(tag_id = %tag_id.trim(), hit = found.is_some(), "Local catalog lookup");
        Ok(found)
    }

    fn backend(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(id: &str, tag: &str, rate: i64) -> Product {
        Product::new(id, format!("Item {}", id), Money::from_major(rate)).with_tag(tag)
    }

    #[test]
    fn test_demo_table() {
        let catalog = LocalCatalog::demo();
        assert_eq!(catalog.len(), 5);

        let mug = catalog.get("9958177152").unwrap();
        assert_eq!(mug.title, "Coffee Mug");
        assert_eq!(mug.rate, Money::from_major(350));
        assert_eq!(mug.id.as_str(), "2");
    }

    #[test]
    fn test_get_trims_reader_noise() {
        let catalog = LocalCatalog::demo();
        assert!(catalog.get("  2202238151\r\n").is_some());
        assert!(catalog.get("").is_none());
    }

    #[test]
    fn test_duplicate_tag_rejected() {
        let err = LocalCatalog::from_products([tagged("1", "AA", 10), tagged("2", "AA", 20)])
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateTag { ref tag_id } if tag_id == "AA"));
    }

    #[test]
    fn test_untagged_product_rejected() {
        let err = LocalCatalog::from_products([tagged("1", "  ", 10)]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRecord(_)));
    }

    #[test]
    fn test_from_json_str_keeps_attributes() {
        let json = r#"[
            {"id": 10, "tag_id": "A7 E4 H5 3Q", "title": "Sweatshirt", "rate": 250,
             "size": "XL", "category": "apparel"}
        ]"#;
        let catalog = LocalCatalog::from_json_str(json).unwrap();

        let product = catalog.get("A7 E4 H5 3Q").unwrap();
        assert_eq!(product.attribute_str("size"), Some("XL"));
        assert_eq!(product.attribute_str("category"), Some("apparel"));
    }

    #[test]
    fn test_from_json_str_rejects_garbage() {
        let err = LocalCatalog::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }

    #[tokio::test]
    async fn test_lookup_miss_is_none() {
        let catalog = LocalCatalog::demo();
        assert!(catalog.lookup("000").await.unwrap().is_none());
        assert_eq!(catalog.backend(), "local");
    }
}
