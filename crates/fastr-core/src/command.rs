//! # Cart Commands
//!
//! Every cart mutation expressed as data, so the kiosk loop (or a test) can
//! dispatch it without knowing which method to call.
//!
//! ```text
//! CartCommand::Add { product, quantity } ──► Cart::apply ──► CartEvent::QuantityChanged
//! CartCommand::Decrement { product_id }  ──► Cart::apply ──► CartEvent::LineRemoved
//! ```

use crate::cart::{Cart, RemoveOutcome};
use crate::error::CoreResult;
use crate::types::{Product, ProductId};

/// A single cart mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum CartCommand {
    /// Add units of a product (tag scan, or an explicit quantity).
    Add { product: Product, quantity: i64 },
    /// Take units off a line; deletes the line when it would reach zero.
    Remove { product_id: ProductId, quantity: i64 },
    /// "+" on a line.
    Increment { product_id: ProductId },
    /// "-" on a line.
    Decrement { product_id: ProductId },
    /// Drop the whole line.
    RemoveLine { product_id: ProductId },
    /// Empty the cart.
    Clear,
}

/// What a command did.
#[derive(Debug, Clone, PartialEq)]
pub enum CartEvent {
    /// A line now holds `quantity` units.
    QuantityChanged {
        product_id: ProductId,
        quantity: i64,
    },
    /// A line was deleted.
    LineRemoved { product_id: ProductId },
    /// The command targeted a product that is not in the cart.
    Unchanged,
    /// The cart was emptied.
    Cleared,
}

impl CartEvent {
    /// True when the cart contents changed.
    pub fn is_change(&self) -> bool {
        !matches!(self, CartEvent::Unchanged)
    }
}

impl Cart {
    /// Applies a command and reports what changed.
    ///
    /// ## Errors
    /// Propagates the errors of the underlying operation
    /// (`InvalidQuantity`, `QuantityTooLarge`, `CartTooLarge`).
    pub fn apply(&mut self, command: CartCommand) -> CoreResult<CartEvent> {
        let event = match command {
            CartCommand::Add { product, quantity } => {
                let quantity = self.add(&product, quantity)?;
                CartEvent::QuantityChanged {
                    product_id: product.id,
                    quantity,
                }
            }
            CartCommand::Remove {
                product_id,
                quantity,
            } => {
                let outcome = self.remove(product_id.as_str(), quantity)?;
                removal_event(product_id, outcome)
            }
            CartCommand::Increment { product_id } => {
                match self.increment(product_id.as_str())? {
                    Some(quantity) => CartEvent::QuantityChanged {
                        product_id,
                        quantity,
                    },
                    None => CartEvent::Unchanged,
                }
            }
            CartCommand::Decrement { product_id } => {
                let outcome = self.decrement(product_id.as_str());
                removal_event(product_id, outcome)
            }
            CartCommand::RemoveLine { product_id } => {
                match self.remove_line(product_id.as_str()) {
                    Some(_) => CartEvent::LineRemoved { product_id },
                    None => CartEvent::Unchanged,
                }
            }
            CartCommand::Clear => {
                self.clear();
                CartEvent::Cleared
            }
        };
        Ok(event)
    }
}

fn removal_event(product_id: ProductId, outcome: RemoveOutcome) -> CartEvent {
    match outcome {
        RemoveOutcome::Decremented { remaining } => CartEvent::QuantityChanged {
            product_id,
            quantity: remaining,
        },
        RemoveOutcome::Removed => CartEvent::LineRemoved { product_id },
        RemoveOutcome::NotInCart => CartEvent::Unchanged,
    }
}
