//! # Cart View
//!
//! Plain-text rendering of the cart for the kiosk terminal.
//!
//! ```text
//! ==================== Fastrkart ====================
//!  T-Shirt                   ₹500.00  x 2   [99231131167]  (id 1)
//!  Cap                       ₹250.00  x 1   [17072247175]  (id 4)
//! ---------------------------------------------------
//!  Sub Total                              ₹1250.00
//!  Tax (10%)                               ₹125.00
//!  Total                                  ₹1375.00
//! ```

use std::fmt::Write as _;

use fastr_core::{Cart, Money};
use fastr_export::Receipt;

use crate::config::KioskConfig;
use crate::error::KioskError;
use crate::session::Outcome;

const WIDTH: usize = 51;

/// Formats carts, receipts and errors with the store's currency symbol.
#[derive(Debug, Clone)]
pub struct Renderer {
    store_name: String,
    currency_symbol: String,
}

impl Renderer {
    pub fn new(store_name: impl Into<String>, currency_symbol: impl Into<String>) -> Self {
        Renderer {
            store_name: store_name.into(),
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn from_config(config: &KioskConfig) -> Self {
        Self::new(&config.store.name, &config.store.currency_symbol)
    }

    /// Formats an amount with the currency symbol.
    ///
    /// ## Examples
    /// - `Money::from_minor(123456)` → `"₹1234.56"`
    /// - `Money::from_minor(-500)` → `"-₹5.00"`
    pub fn format_currency(&self, amount: Money) -> String {
        format!(
            "{}{}{}.{:02}",
            if amount.is_negative() { "-" } else { "" },
            self.currency_symbol,
            amount.major().abs(),
            amount.minor_part()
        )
    }

    /// The full cart view.
    pub fn render_cart(&self, cart: &Cart) -> String {
        let mut out = String::new();
        let title = format!(" {} ", self.store_name);
        let _ = writeln!(out, "{:=^width$}", title, width = WIDTH);

        if cart.is_empty() {
            let _ = writeln!(out, " Cart is empty. Scan a tag to begin.");
        }

        for item in cart.items() {
            let tag = if item.product.tag_id.is_empty() {
                String::new()
            } else {
                format!("[{}]", item.product.tag_id)
            };
            let _ = writeln!(
                out,
                " {:<22} {:>10}  x {:<3} {}  (id {})",
                truncate(&item.product.title, 22),
                self.format_currency(item.product.rate),
                item.quantity,
                tag,
                item.product.id,
            );
        }

        let _ = writeln!(out, "{}", "-".repeat(WIDTH));
        let tax_label = format!("Tax ({}%)", cart.tax_rate().percentage());
        for (label, amount) in [
            ("Sub Total", cart.subtotal()),
            (tax_label.as_str(), cart.tax()),
            ("Total", cart.total()),
        ] {
            let _ = writeln!(out, " {:<20} {:>28}", label, self.format_currency(amount));
        }

        out.trim_end().to_string()
    }

    /// Confirmation line after a checkout.
    pub fn render_receipt(&self, receipt: &Receipt) -> String {
        format!(
            "Paid {} for {} line(s). Receipt saved to {}",
            self.format_currency(receipt.totals.total),
            receipt.rows,
            receipt.path.display()
        )
    }

    /// One-line error report for the operator.
    pub fn render_error(&self, err: &KioskError) -> String {
        format!("! [{}] {}", err.code(), err)
    }

    /// Text to show after `outcome`, if any.
    pub fn render_outcome(&self, outcome: &Outcome, cart: &Cart) -> Option<String> {
        match outcome {
            Outcome::CheckedOut(receipt) => Some(format!(
                "{}\n{}",
                self.render_receipt(receipt),
                self.render_cart(cart)
            )),
            Outcome::NothingToCheckout => Some("Cart is empty, nothing to pay for.".to_string()),
            Outcome::NotInCart { product_id } => {
                Some(format!("Product {} is not in the cart.", product_id))
            }
            other if other.needs_redraw() => Some(self.render_cart(cart)),
            _ => None,
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
