//! # fastr-core: Pure Business Logic for the Fastrkart Kiosk
//!
//! The cart pricing model and its supporting types, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fastrkart Architecture                           │
//! │                                                                         │
//! │  ┌──────────────┐   ┌──────────────┐                                    │
//! │  │ RFID reader  │   │ Operator     │   KioskCommand                     │
//! │  │ (tag lines)  │   │ (stdin)      │ ───────────────┐                   │
//! │  └──────────────┘   └──────────────┘                │                   │
//! │                                                     ▼                   │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/kiosk (session)                         │   │
//! │  │     fastr-catalog::lookup ──► CartCommand ──► fastr-export     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ fastr-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │   rules   │  │   │
//! │  │   │  TaxRate  │  │  tax calc │  │ LineItem  │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO FILES • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, ProductId, TaxRate)
//! - [`money`] - Money type with integer arithmetic
//! - [`cart`] - The cart: line items and derived totals
//! - [`command`] - Cart mutations as explicit commands
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use fastr_core::{Cart, Money, Product, TaxRate};
//!
//! let mut cart = Cart::new(TaxRate::from_bps(1000)); // 10%
//! let cap = Product::new("4", "Cap", Money::from_major(250));
//!
//! cart.add(&cap, 3).unwrap();
//! assert_eq!(cart.subtotal(), Money::from_major(750));
//! assert_eq!(cart.tax(), Money::from_major(75));
//! assert_eq!(cart.total(), Money::from_major(825));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod command;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{subtotal, Cart, CartSnapshot, CartTotals, LineItem, RemoveOutcome};
pub use command::{CartCommand, CartEvent};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default checkout tax rate: 10%.
pub const DEFAULT_TAX_RATE_BPS: u32 = 1000;

/// Maximum distinct products allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single product in the cart.
///
/// ## Business Reason
/// Guards against a stuck reader flooding the cart with one tag.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest unit rate, in minor units, a product may carry (₹10,000,000,000).
///
/// `MAX_RATE_MINOR × MAX_ITEM_QUANTITY × MAX_CART_ITEMS`, plus tax of up to
/// 100%, stays well inside `i64`, so cart totals cannot overflow.
pub const MAX_RATE_MINOR: i64 = 1_000_000_000_000;
