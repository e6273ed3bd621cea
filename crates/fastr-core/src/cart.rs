//! # Cart
//!
//! The kiosk's shopping cart: a mapping from product id to line item, plus
//! subtotal, tax and total derived from it.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Trigger                  Operation               Cart Change           │
//! │  ───────                  ─────────               ───────────           │
//! │                                                                         │
//! │  Tag scanned ────────────► add(p, 1) ───────────► qty += 1 / new line   │
//! │                                                                         │
//! │  "+" pressed ────────────► increment(id) ───────► qty += 1              │
//! │                                                                         │
//! │  "-" pressed ────────────► decrement(id) ───────► qty -= 1 (0 ⇒ drop)  │
//! │                                                                         │
//! │  "x" pressed ────────────► remove_line(id) ─────► line dropped          │
//! │                                                                         │
//! │  Pay Now (after export) ─► clear() ─────────────► empty                 │
//! │                                                                         │
//! │  Every mutation ends in recalculate(): subtotal, tax, total.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - `subtotal == Σ rate × quantity`
//! - `tax == subtotal.calculate_tax(tax_rate)`
//! - `total == subtotal + tax`
//! - every line item has `quantity >= 1`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, ProductId, TaxRate};
use crate::validation::validate_cart_size;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY, MAX_RATE_MINOR};

// =============================================================================
// Line Item
// =============================================================================

/// A product plus its quantity in the cart.
///
/// The product record is a frozen copy taken when the line was created, so
/// the rate shown at checkout is the rate that was scanned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product: Product,
    pub quantity: i64,
}

impl LineItem {
    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.product.rate.multiply_quantity(self.quantity)
    }
}

/// Σ rate × quantity over `items`; zero for an empty collection.
///
/// ```rust
/// use fastr_core::{subtotal, Money};
///
/// assert_eq!(subtotal(std::iter::empty()), Money::zero());
/// ```
pub fn subtotal<'a, I>(items: I) -> Money
where
    I: IntoIterator<Item = &'a LineItem>,
{
    items.into_iter().map(LineItem::line_total).sum()
}

// =============================================================================
// Remove Outcome
// =============================================================================

/// What a decrementing operation did to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The line is still present with this many units left.
    Decremented { remaining: i64 },
    /// The line was deleted.
    Removed,
    /// The product was not in the cart; nothing changed.
    NotInCart,
}

// =============================================================================
// Totals & Snapshot
// =============================================================================

/// Cart totals summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

/// Read-only copy of the cart taken at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub items: Vec<LineItem>,
    pub tax_rate: TaxRate,
    pub totals: CartTotals,
}

impl CartSnapshot {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// Derived fields are cached and refreshed at the end of every mutation, so
/// readers never observe stale totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cart {
    items: BTreeMap<ProductId, LineItem>,
    tax_rate: TaxRate,
    subtotal: Money,
    tax: Money,
    total: Money,
}

impl Cart {
    /// Creates an empty cart taxed at `tax_rate`.
    pub fn new(tax_rate: TaxRate) -> Self {
        Cart {
            items: BTreeMap::new(),
            tax_rate,
            subtotal: Money::zero(),
            tax: Money::zero(),
            total: Money::zero(),
        }
    }

    /// Adds `quantity` units of `product`, creating the line if needed.
    ///
    /// ## Errors
    /// - `InvalidQuantity` if `quantity <= 0`
    /// - `RateTooLarge` if the unit rate is above `MAX_RATE_MINOR`
    /// - `QuantityTooLarge` if the line would exceed `MAX_ITEM_QUANTITY`
    /// - `CartTooLarge` if a new line would exceed `MAX_CART_ITEMS`
    ///
    /// The cart is unchanged when an error is returned.
    pub fn add(&mut self, product: &Product, quantity: i64) -> CoreResult<i64> {
        if quantity <= 0 {
            return Err(CoreError::InvalidQuantity {
                requested: quantity,
            });
        }

        if product.rate.minor() > MAX_RATE_MINOR {
            return Err(CoreError::RateTooLarge {
                rate: product.rate,
                max: Money::from_minor(MAX_RATE_MINOR),
            });
        }

        let existing = self.quantity_of(product.id.as_str());
        let new_qty = existing
            .checked_add(quantity)
            .filter(|q| *q <= MAX_ITEM_QUANTITY)
            .ok_or(CoreError::QuantityTooLarge {
                requested: existing.saturating_add(quantity),
                max: MAX_ITEM_QUANTITY,
            })?;

        match self.items.get_mut(&product.id) {
            Some(item) => item.quantity = new_qty,
            None => {
                validate_cart_size(self.items.len())
                    .map_err(|_| CoreError::CartTooLarge { max: MAX_CART_ITEMS })?;
                self.items.insert(
                    product.id.clone(),
                    LineItem {
                        product: product.clone(),
                        quantity: new_qty,
                    },
                );
            }
        }

        self.recalculate();
        Ok(new_qty)
    }

    /// Removes `quantity` units of a product.
    ///
    /// If the line holds `quantity` or fewer units it is deleted outright.
    /// A product that is not in the cart is a no-op, not an error.
    pub fn remove(&mut self, product_id: &str, quantity: i64) -> CoreResult<RemoveOutcome> {
        if quantity <= 0 {
            return Err(CoreError::InvalidQuantity {
                requested: quantity,
            });
        }

        let current = match self.items.get(product_id) {
            Some(item) => item.quantity,
            None => return Ok(RemoveOutcome::NotInCart),
        };

        let outcome = if current <= quantity {
            self.items.remove(product_id);
            RemoveOutcome::Removed
        } else {
            let remaining = current - quantity;
            if let Some(item) = self.items.get_mut(product_id) {
                item.quantity = remaining;
            }
            RemoveOutcome::Decremented { remaining }
        };

        self.recalculate();
        Ok(outcome)
    }

    /// Adds one unit to a line already in the cart.
    ///
    /// Returns the new quantity, or `None` if the product is not in the cart.
    pub fn increment(&mut self, product_id: &str) -> CoreResult<Option<i64>> {
        let product = match self.items.get(product_id) {
            Some(item) => item.product.clone(),
            None => return Ok(None),
        };
        self.add(&product, 1).map(Some)
    }

    /// Takes one unit off a line, deleting it when it reaches zero.
    pub fn decrement(&mut self, product_id: &str) -> RemoveOutcome {
        // quantity 1 is always valid
        self.remove(product_id, 1)
            .unwrap_or(RemoveOutcome::NotInCart)
    }

    /// Deletes a whole line regardless of quantity.
    pub fn remove_line(&mut self, product_id: &str) -> Option<LineItem> {
        let removed = self.items.remove(product_id);
        if removed.is_some() {
            self.recalculate();
        }
        removed
    }

    /// Resets the cart to empty. Calling it twice is the same as once.
    pub fn clear(&mut self) {
        self.items.clear();
        self.recalculate();
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// Line items, ordered by product id.
    pub fn items(&self) -> impl Iterator<Item = &LineItem> {
        self.items.values()
    }

    /// The line for `product_id`, if present.
    pub fn get(&self, product_id: &str) -> Option<&LineItem> {
        self.items.get(product_id)
    }

    /// Quantity of `product_id` in the cart (0 when absent).
    pub fn quantity_of(&self, product_id: &str) -> i64 {
        self.get(product_id).map_or(0, |item| item.quantity)
    }

    /// Number of distinct products.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities over all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.values().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn tax(&self) -> Money {
        self.tax
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals {
            item_count: self.item_count(),
            total_quantity: self.total_quantity(),
            subtotal: self.subtotal,
            tax: self.tax,
            total: self.total,
        }
    }

    /// Owned copy of the line items and totals, for export.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.values().cloned().collect(),
            tax_rate: self.tax_rate,
            totals: self.totals(),
        }
    }

    fn recalculate(&mut self) {
        self.subtotal = subtotal(self.items.values());
        self.tax = self.subtotal.calculate_tax(self.tax_rate);
        self.total = self.subtotal + self.tax;
    }
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new(TaxRate::default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, rate: i64) -> Product {
        Product::new(id, format!("Product {}", id), Money::from_major(rate))
    }

    fn ten_percent_cart() -> Cart {
        Cart::new(TaxRate::from_bps(1000))
    }

    fn assert_totals_consistent(cart: &Cart) {
        assert_eq!(cart.subtotal(), subtotal(cart.items()));
        assert_eq!(cart.tax(), cart.subtotal().calculate_tax(cart.tax_rate()));
        assert_eq!(cart.total(), cart.subtotal() + cart.tax());
        assert!(cart.items().all(|i| i.quantity >= 1));
    }

    #[test]
    fn test_subtotal_of_empty_is_zero() {
        let items: Vec<LineItem> = Vec::new();
        assert_eq!(subtotal(&items), Money::zero());
    }

    #[test]
    fn test_subtotal_sums_rate_times_quantity() {
        let items = vec![
            LineItem {
                product: product("1", 500),
                quantity: 2,
            },
            LineItem {
                product: product("2", 350),
                quantity: 3,
            },
        ];
        assert_eq!(subtotal(&items), Money::from_major(2050));
    }

    #[test]
    fn test_add_then_add_again_accumulates() {
        let mut cart = ten_percent_cart();
        let sweatshirt = product("1", 250);

        cart.add(&sweatshirt, 3).unwrap();
        assert_eq!(cart.subtotal(), Money::from_major(750));

        cart.add(&sweatshirt, 2).unwrap();
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.quantity_of("1"), 5);
        assert_eq!(cart.subtotal(), Money::from_major(1250));
        assert_eq!(cart.tax(), Money::from_major(125));
        assert_eq!(cart.total(), Money::from_major(1375));
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = ten_percent_cart();
        let cap = product("4", 250);

        assert_eq!(
            cart.add(&cap, 0),
            Err(CoreError::InvalidQuantity { requested: 0 })
        );
        assert_eq!(
            cart.add(&cap, -2),
            Err(CoreError::InvalidQuantity { requested: -2 })
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_rejects_quantity_over_max_without_mutating() {
        let mut cart = ten_percent_cart();
        let cap = product("4", 250);

        cart.add(&cap, MAX_ITEM_QUANTITY).unwrap();
        let before = cart.clone();

        let err = cart.add(&cap, 1).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { .. }));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_add_rejects_line_beyond_max_items() {
        let mut cart = ten_percent_cart();
        for i in 0..MAX_CART_ITEMS {
            cart.add(&product(&i.to_string(), 1), 1).unwrap();
        }

        let err = cart.add(&product("overflow", 1), 1).unwrap_err();
        assert_eq!(err, CoreError::CartTooLarge { max: MAX_CART_ITEMS });

        // existing lines still accept more units
        assert!(cart.add(&product("0", 1), 1).is_ok());
    }

    #[test]
    fn test_add_rejects_rate_that_could_overflow_totals() {
        let mut cart = ten_percent_cart();
        let big: Product =
            serde_json::from_str(r#"{"id": 1, "title": "Big", "rate": 92233720368547758}"#)
                .unwrap();

        let err = cart.add(&big, 2).unwrap_err();
        assert!(matches!(err, CoreError::RateTooLarge { .. }));
        assert!(cart.is_empty());

        // the most expensive accepted product still totals without overflow
        let top = product("top", MAX_RATE_MINOR / 100);
        for i in 0..MAX_CART_ITEMS {
            let mut line = top.clone();
            line.id = ProductId::from(format!("top-{}", i));
            cart.add(&line, MAX_ITEM_QUANTITY).unwrap();
        }
        assert_eq!(
            cart.subtotal().minor(),
            MAX_RATE_MINOR * MAX_ITEM_QUANTITY * MAX_CART_ITEMS as i64
        );
        assert_eq!(cart.total(), cart.subtotal() + cart.tax());
    }

    #[test]
    fn test_remove_less_than_quantity_decrements() {
        let mut cart = ten_percent_cart();
        cart.add(&product("1", 500), 5).unwrap();

        let outcome = cart.remove("1", 2).unwrap();
        assert_eq!(outcome, RemoveOutcome::Decremented { remaining: 3 });
        assert_eq!(cart.subtotal(), Money::from_major(1500));
    }

    #[test]
    fn test_remove_at_least_quantity_deletes_line() {
        let mut cart = ten_percent_cart();
        cart.add(&product("1", 500), 2).unwrap();

        assert_eq!(cart.remove("1", 5).unwrap(), RemoveOutcome::Removed);
        assert!(cart.get("1").is_none());
    }

    #[test]
    fn test_remove_last_unit_empties_cart() {
        let mut cart = ten_percent_cart();
        cart.add(&product("1", 500), 1).unwrap();

        assert_eq!(cart.remove("1", 1).unwrap(), RemoveOutcome::Removed);
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Money::zero());
        assert_eq!(cart.tax(), Money::zero());
        assert_eq!(cart.total(), Money::zero());
    }

    #[test]
    fn test_remove_unknown_product_is_noop() {
        let mut cart = ten_percent_cart();
        cart.add(&product("1", 500), 1).unwrap();
        let before = cart.clone();

        assert_eq!(cart.remove("missing", 1).unwrap(), RemoveOutcome::NotInCart);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_rejects_non_positive_quantity() {
        let mut cart = ten_percent_cart();
        cart.add(&product("1", 500), 1).unwrap();

        assert!(cart.remove("1", 0).is_err());
        assert_eq!(cart.quantity_of("1"), 1);
    }

    #[test]
    fn test_increment_and_decrement() {
        let mut cart = ten_percent_cart();
        cart.add(&product("3", 900), 1).unwrap();

        assert_eq!(cart.increment("3").unwrap(), Some(2));
        assert_eq!(cart.increment("nope").unwrap(), None);
        assert_eq!(cart.subtotal(), Money::from_major(1800));

        assert_eq!(cart.decrement("3"), RemoveOutcome::Decremented { remaining: 1 });
        assert_eq!(cart.decrement("3"), RemoveOutcome::Removed);
        assert_eq!(cart.decrement("3"), RemoveOutcome::NotInCart);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_line_drops_whole_quantity() {
        let mut cart = ten_percent_cart();
        cart.add(&product("5", 700), 4).unwrap();
        cart.add(&product("2", 350), 1).unwrap();

        let removed = cart.remove_line("5").unwrap();
        assert_eq!(removed.quantity, 4);
        assert_eq!(cart.subtotal(), Money::from_major(350));
        assert!(cart.remove_line("5").is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut cart = ten_percent_cart();
        cart.add(&product("1", 500), 2).unwrap();

        cart.clear();
        let once = cart.clone();
        cart.clear();

        assert_eq!(cart, once);
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::zero());
    }

    #[test]
    fn test_tax_rounds_on_subtotal() {
        let mut cart = Cart::new(TaxRate::from_bps(1800));
        let odd = Product::new("9", "Odd", Money::from_minor(333));

        cart.add(&odd, 1).unwrap();
        // 3.33 × 18% = 0.5994 → 0.60
        assert_eq!(cart.tax().minor(), 60);
        assert_eq!(cart.total().minor(), 393);
    }

    #[test]
    fn test_totals_hold_across_mixed_sequence() {
        let mut cart = ten_percent_cart();
        let catalog: Vec<Product> = [500, 350, 900, 250, 700]
            .iter()
            .enumerate()
            .map(|(i, rate)| product(&(i + 1).to_string(), *rate))
            .collect();

        // Deterministic pseudo-random walk over add/remove/decrement.
        let mut seed: u64 = 0x5eed;
        for _ in 0..500 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let p = &catalog[(seed >> 33) as usize % catalog.len()];
            let qty = ((seed >> 17) % 4) as i64 + 1;
            match (seed >> 5) % 4 {
                0 | 1 => {
                    cart.add(p, qty).unwrap();
                }
                2 => {
                    cart.remove(p.id.as_str(), qty).unwrap();
                }
                _ => {
                    cart.decrement(p.id.as_str());
                }
            }
            assert_totals_consistent(&cart);
        }
    }

    #[test]
    fn test_snapshot_is_detached_copy() {
        let mut cart = ten_percent_cart();
        cart.add(&product("1", 500), 2).unwrap();

        let snapshot = cart.snapshot();
        cart.clear();

        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.totals.subtotal, Money::from_major(1000));
        assert_eq!(snapshot.totals.total, Money::from_major(1100));
        assert!(cart.is_empty());
    }
}
