//! # Cart Model
//!
//! The ordered collection of lines the cashier is building up before
//! checkout.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Screen Action             Operation              Cart Change           │
//! │  ─────────────             ─────────              ───────────           │
//! │                                                                         │
//! │  Tap Product ────────────► add_line() ──────────► merge or append      │
//! │                                                                         │
//! │  Change Quantity ────────► set_quantity() ──────► replace (<=0 removes)│
//! │                                                                         │
//! │  Tap Remove ─────────────► remove_line() ───────► line dropped         │
//! │                                                                         │
//! │  New Sale ───────────────► clear() ─────────────► lines.clear()        │
//! │                                                                         │
//! │  Totals Strip ───────────► summary() ───────────► (read only)          │
//! │                                                                         │
//! │  Line order is insertion order and is preserved across quantity         │
//! │  updates; updates mutate in place, never reorder.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart is owned by the active billing session and discarded once a
//! bill is produced from it. It is not a process-wide singleton.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::billing::{compute_totals, BillTotals, ChargeLine};
use crate::error::{CoreError, CoreResult};
use crate::money::{Money, RoundingUnit};
use crate::types::{Product, TaxMode};
use crate::validation::validate_quantity;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// A (product, quantity) pair in the cart.
///
/// The product is held by value. Until checkout the line tracks the live
/// catalog through [`Cart::sync_product`]; at checkout `Bill::from_cart`
/// freezes everything into immutable bill lines.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub product: Product,
    pub quantity: i64,
}

impl CartLine {
    /// Line gross: unit price × quantity, before any tax math.
    pub fn gross(&self) -> Money {
        self.product.unit_price() * self.quantity
    }

    /// Lowers this line into the calculator's input row.
    pub fn charge_line(&self) -> ChargeLine {
        ChargeLine {
            unit_price: self.product.unit_price(),
            quantity: self.quantity,
            tax_rate_bps: self.product.tax_rate_bps,
            tax_inclusive: self.product.tax_inclusive,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by product id (adding the same product merges)
/// - Quantity is always > 0 (setting <= 0 removes the line)
/// - Maximum lines: 100, maximum quantity per line: 999
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds a product to the cart, merging into an existing line.
    ///
    /// ## Behavior
    /// - Product already in cart: quantities are summed
    /// - Otherwise: a new line is appended at the end
    pub fn add_line(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        product.validate()?;
        validate_quantity(quantity)?;

        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product.id) {
            let merged = line.quantity + quantity;
            if merged > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: merged,
                    max: MAX_LINE_QUANTITY,
                });
            }
            line.quantity = merged;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        self.lines.push(CartLine {
            product: product.clone(),
            quantity,
        });
        Ok(())
    }

    /// Sets the quantity of a line in place.
    ///
    /// ## Behavior
    /// - quantity <= 0: removes the line (no error if already gone, so the
    ///   operation is idempotent)
    /// - quantity > 0: replaces the line's quantity, preserving position
    /// - product not in cart with a positive quantity: error
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            self.lines.retain(|l| l.product.id != product_id);
            return Ok(());
        }

        validate_quantity(quantity)?;

        match self.lines.iter_mut().find(|l| l.product.id == product_id) {
            Some(line) => {
                line.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::LineNotFound(product_id.to_string())),
        }
    }

    /// Removes a line from the cart by product id.
    pub fn remove_line(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.product.id != product_id);

        if self.lines.len() == initial_len {
            Err(CoreError::LineNotFound(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Propagates a catalog edit into any matching cart line.
    ///
    /// Price or tax edits made on the products screen are reflected in the
    /// open cart until checkout freezes the bill.
    pub fn sync_product(&mut self, product: &Product) {
        for line in self.lines.iter_mut().filter(|l| l.product.id == product.id) {
            line.product = product.clone();
        }
    }

    /// The cart lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Returns the number of unique lines in the cart.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Recomputes the displayed totals for the current cart contents.
    pub fn summary(&self, mode: TaxMode, rounding: RoundingUnit) -> BillTotals {
        let charge_lines: Vec<ChargeLine> = self.lines.iter().map(|l| l.charge_line()).collect();
        compute_totals(&charge_lines, mode, rounding)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
