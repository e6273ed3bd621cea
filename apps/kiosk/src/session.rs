//! # Kiosk Session
//!
//! Owns the cart for the life of the process and dispatches each
//! [`KioskCommand`] against it.
//!
//! ## Command Dispatch
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Scan(tag) ───► catalog.lookup ──┬─ Some(p) ─► CartCommand::Add{p, 1}   │
//! │                                  └─ None ────► Outcome::Ignored         │
//! │  Increase(id) ────────────────────────────────► CartCommand::Increment  │
//! │  Decrease(id) ────────────────────────────────► CartCommand::Decrement  │
//! │  Remove(id) ──────────────────────────────────► CartCommand::RemoveLine │
//! │  Clear ───────────────────────────────────────► CartCommand::Clear      │
//! │  PayNow ───► sink.export(snapshot) ──┬─ Ok ──► cart cleared             │
//! │                                      └─ Err ─► cart kept                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session is driven by a single task, so the cart needs no lock.

use std::sync::Arc;

use chrono::Local;
use fastr_catalog::Catalog;
use fastr_core::{Cart, CartCommand, CartEvent, ProductId, TaxRate};
use fastr_export::{Receipt, ReceiptSink};
use tracing::{debug, info, warn};

use crate::error::KioskResult;
use crate::input::KioskCommand;

/// What a handled command did, for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A cart command ran.
    Cart(CartEvent),
    /// Scanned tag matched no product.
    Ignored { tag_id: String },
    /// A line button named a product with no line; the cart is unchanged.
    NotInCart { product_id: ProductId },
    /// Receipt written and cart reset.
    CheckedOut(Receipt),
    /// Pay Now on an empty cart.
    NothingToCheckout,
    Show,
    Quit,
}

impl Outcome {
    /// True when the cart view should be redrawn.
    pub fn needs_redraw(&self) -> bool {
        match self {
            Outcome::Cart(event) => event.is_change(),
            Outcome::CheckedOut(_) | Outcome::Show => true,
            Outcome::Ignored { .. }
            | Outcome::NotInCart { .. }
            | Outcome::NothingToCheckout
            | Outcome::Quit => false,
        }
    }
}

pub struct KioskSession {
    cart: Cart,
    catalog: Arc<dyn Catalog>,
    sink: Box<dyn ReceiptSink>,
}

impl KioskSession {
    pub fn new(tax_rate: TaxRate, catalog: Arc<dyn Catalog>, sink: Box<dyn ReceiptSink>) -> Self {
        KioskSession {
            cart: Cart::new(tax_rate),
            catalog,
            sink,
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Handles one command.
    ///
    /// ## Errors
    /// - `Cart` when the cart rejects the change (limits)
    /// - `Catalog` when a lookup fails for a reason other than a miss
    /// - `Export` when the receipt could not be written; the cart is kept
    pub async fn handle(&mut self, command: KioskCommand) -> KioskResult<Outcome> {
        let outcome = match command {
            KioskCommand::Scan(tag_id) => self.scan(tag_id).await?,
            KioskCommand::Increase(id) => {
                self.apply_to_line(id, |product_id| CartCommand::Increment { product_id })?
            }
            KioskCommand::Decrease(id) => {
                self.apply_to_line(id, |product_id| CartCommand::Decrement { product_id })?
            }
            KioskCommand::Remove(id) => {
                self.apply_to_line(id, |product_id| CartCommand::RemoveLine { product_id })?
            }
            KioskCommand::Clear => self.apply(CartCommand::Clear)?,
            KioskCommand::PayNow => self.pay_now()?,
            KioskCommand::Show => Outcome::Show,
            KioskCommand::Quit => Outcome::Quit,
        };
        Ok(outcome)
    }

    async fn scan(&mut self, tag_id: String) -> KioskResult<Outcome> {
        let found = self.catalog.lookup(&tag_id).await?;
        match found {
            Some(product) => {
                debug!(tag_id = %tag_id, product_id = %product.id, "Tag resolved");
                self.apply(CartCommand::Add {
                    product,
                    quantity: 1,
                })
            }
            None => {
                debug!(tag_id = %tag_id, backend = self.catalog.backend(), "Unknown tag ignored");
                Ok(Outcome::Ignored { tag_id })
            }
        }
    }

    fn apply(&mut self, command: CartCommand) -> KioskResult<Outcome> {
        let event = self.cart.apply(command)?;
        debug!(
            ?event,
            items = self.cart.item_count(),
            total = %self.cart.total(),
            "Cart updated"
        );
        Ok(Outcome::Cart(event))
    }

    /// Line buttons only make sense for products already in the cart.
    fn apply_to_line(
        &mut self,
        product_id: ProductId,
        command: fn(ProductId) -> CartCommand,
    ) -> KioskResult<Outcome> {
        match self.apply(command(product_id.clone()))? {
            Outcome::Cart(CartEvent::Unchanged) => {
                debug!(product_id = %product_id, "Line button on product not in cart");
                Ok(Outcome::NotInCart { product_id })
            }
            outcome => Ok(outcome),
        }
    }

    fn pay_now(&mut self) -> KioskResult<Outcome> {
        if self.cart.is_empty() {
            debug!("Pay Now on empty cart");
            return Ok(Outcome::NothingToCheckout);
        }

        let snapshot = self.cart.snapshot();
        let receipt = self.sink.export(&snapshot, Local::now()).map_err(|e| {
            warn!(error = %e, items = snapshot.items.len(), "Checkout export failed, cart kept");
            e
        })?;

        self.cart.clear();
        info!(
            receipt_id = %receipt.id,
            total = %receipt.totals.total,
            "Checkout complete"
        );
        Ok(Outcome::CheckedOut(receipt))
    }
}
