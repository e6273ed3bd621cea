//! # Domain Types
//!
//! Core domain types used throughout the kiosk.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐   ┌─────────────────┐   ┌─────────────────┐   │
//! │  │      Product        │   │    ProductId    │   │    TaxRate      │   │
//! │  │  ─────────────────  │   │  ─────────────  │   │  ─────────────  │   │
//! │  │  id                 │   │  "1", "42"      │   │  bps (u32)      │   │
//! │  │  tag_id (RFID)      │   │  JSON number or │   │  1000 = 10%     │   │
//! │  │  title              │   │  string         │   └─────────────────┘   │
//! │  │  rate (Money)       │   └─────────────────┘                         │
//! │  │  image              │                                               │
//! │  │  attributes { .. }  │  ◄── size, gender, colour, brand, ...         │
//! │  └─────────────────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! A product's identity is its `id`. The `tag_id` is only the lookup key the
//! RFID reader produces; two tags may point at the same product.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::money::{self, Money};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so 1000 bps = 10% and 1800 bps = 18%.
/// The rate is exact; only the resulting tax amount is rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_bps(crate::DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Product Id
// =============================================================================

/// Stable product identifier.
///
/// Catalog feeds send ids as JSON numbers (`"id": 1`) or strings; both
/// normalize to the same textual id so `1` and `"1"` are the same product.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        ProductId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        ProductId::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        ProductId(id)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        ProductId(id.to_string())
    }
}

impl std::borrow::Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Text(String),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Int(id) => Ok(ProductId(id.to_string())),
            RawId::Text(id) => Ok(ProductId(id.trim().to_string())),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product that can be scanned into the cart.
///
/// ## Wire Shape
/// ```json
/// {
///   "id": 1,
///   "tag_id": "99231131167",
///   "title": "T-Shirt",
///   "rate": 500,
///   "image": "1.png",
///   "size": "M",
///   "colour": "black"
/// }
/// ```
/// Any field beyond the core set lands in `attributes` and is written back
/// out unchanged; the cart never looks at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique, stable identifier.
    pub id: ProductId,

    /// RFID tag identifier this product was resolved from.
    #[serde(default)]
    pub tag_id: String,

    /// Display title.
    pub title: String,

    /// Unit price. Carried on the wire in major units.
    #[serde(with = "money::major_units")]
    pub rate: Money,

    /// Image file name for the display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Domain-specific extras (size, gender, type, category, material,
    /// colour, brand, ...).
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl Product {
    /// Creates a product with no tag, image or attributes.
    pub fn new(id: impl Into<ProductId>, title: impl Into<String>, rate: Money) -> Self {
        Product {
            id: id.into(),
            tag_id: String::new(),
            title: title.into(),
            rate,
            image: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Sets the RFID tag id.
    pub fn with_tag(mut self, tag_id: impl Into<String>) -> Self {
        self.tag_id = tag_id.into();
        self
    }

    /// Sets the image file name.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Adds an opaque attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Looks up an opaque attribute as a string, if it is one.
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(|v| v.as_str())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
