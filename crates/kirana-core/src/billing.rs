//! # Billing Calculator & Bill Snapshot
//!
//! Turns priced lines into a tax-correct bill. This is the single source of
//! truth for all rounding in the system; no call site does its own.
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    BillingCalculator                                    │
//! │                                                                         │
//! │  per line:   gross = unit_price × quantity                              │
//! │              inclusive:  base = gross / (1 + rate)   tax = gross - base │
//! │              exclusive:  base = gross                tax = gross × rate │
//! │                   │  (micro-paise, nothing rounded yet)                 │
//! │                   ▼                                                     │
//! │  accumulate: Σ base, Σ tax across ALL lines                             │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │  round ONCE: subtotal = round(Σ base)   tax = round(Σ tax)              │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │  grand:      raw = subtotal + tax                                       │
//! │              grand = raw rounded to the configured unit                 │
//! │              round_off = grand - raw                                    │
//! │                                                                         │
//! │  INVARIANT:  subtotal + tax + round_off == grand, always                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rounding after summation matters: per-line rounding yields different
//! totals on carts with many small-tax lines, and historical bills must be
//! reproducible to the paise.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::money::{Money, RoundingUnit};
use crate::types::{Customer, PrintStatus, TaxMode};

// =============================================================================
// Calculator Input / Output
// =============================================================================

/// One priced row of calculator input. Cart lines and bill lines both lower
/// into this shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargeLine {
    pub unit_price: Money,
    pub quantity: i64,
    pub tax_rate_bps: u32,
    pub tax_inclusive: bool,
}

impl ChargeLine {
    /// Line gross before any tax math.
    #[inline]
    pub fn gross(&self) -> Money {
        self.unit_price * self.quantity
    }
}

/// The priced result of a cart or bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillTotals {
    /// Pre-tax base, rounded after summation.
    pub subtotal: Money,
    /// Combined tax, rounded after summation.
    pub tax_amount: Money,
    /// Signed adjustment reconciling the raw total with the grand total.
    pub round_off: Money,
    /// The payable amount.
    pub grand_total: Money,
}

impl BillTotals {
    /// All-zero totals (the empty cart result).
    pub fn zero() -> Self {
        BillTotals {
            subtotal: Money::zero(),
            tax_amount: Money::zero(),
            round_off: Money::zero(),
            grand_total: Money::zero(),
        }
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Integer division rounding to nearest. Operands are non-negative here:
/// prices and quantities are validated positive before a line reaches the
/// calculator.
#[inline]
const fn div_round_nearest(numerator: i128, denominator: i128) -> i128 {
    (numerator + denominator / 2) / denominator
}

/// Computes the totals for a set of priced lines.
///
/// ## Modes
/// - `TaxMode::Exclusive` (normal billing): each line follows its own
///   `tax_inclusive` flag; tax is added on top of exclusive lines, and the
///   grand total is rounded to the configured unit with the difference
///   recorded as `round_off`.
/// - `TaxMode::Inclusive` (cart-level GST-inclusive toggle): every line is
///   treated as inclusive and the grand total is defined as the exact sum
///   of line grosses: the customer pays exactly what the shelf says.
///   Subtotal and tax are back-computed for display and reporting, and
///   `round_off` absorbs their rounding so the sum invariant still holds.
///
/// An empty slice yields [`BillTotals::zero`], not an error.
pub fn compute_totals(lines: &[ChargeLine], mode: TaxMode, rounding: RoundingUnit) -> BillTotals {
    if lines.is_empty() {
        return BillTotals::zero();
    }

    let mut base_micro: i128 = 0;
    let mut tax_micro: i128 = 0;
    let mut gross_total = Money::zero();

    for line in lines {
        let gross = line.gross();
        gross_total += gross;

        let gross_micro = gross.to_micro();
        let bps = line.tax_rate_bps as i128;
        let inclusive = match mode {
            TaxMode::Inclusive => true,
            TaxMode::Exclusive => line.tax_inclusive,
        };

        if inclusive {
            // base = gross / (1 + rate/10000), kept in micro-paise
            let base = div_round_nearest(gross_micro * 10_000, 10_000 + bps);
            base_micro += base;
            tax_micro += gross_micro - base;
        } else {
            base_micro += gross_micro;
            tax_micro += div_round_nearest(gross_micro * bps, 10_000);
        }
    }

    // The only rounding to paise, applied after summation
    let subtotal = Money::from_micro_half_up(base_micro);
    let tax_amount = Money::from_micro_half_up(tax_micro);

    match mode {
        TaxMode::Exclusive => {
            let raw_total = subtotal + tax_amount;
            let grand_total = raw_total.round_to(rounding);
            BillTotals {
                subtotal,
                tax_amount,
                round_off: grand_total - raw_total,
                grand_total,
            }
        }
        TaxMode::Inclusive => BillTotals {
            subtotal,
            tax_amount,
            round_off: gross_total - subtotal - tax_amount,
            grand_total: gross_total,
        },
    }
}

// =============================================================================
// Bill Line
// =============================================================================

/// An immutable line of a bill, captured at checkout time.
///
/// Later product edits never retroactively change historical bills, so the
/// snapshot carries everything the receipt needs.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillLine {
    /// Product id at time of sale (for reporting joins).
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub name: String,
    /// Local-language name at time of sale (frozen).
    pub name_local: Option<String>,
    /// Unit label at time of sale (frozen).
    pub unit_label: String,
    /// Unit price in paise at time of sale (frozen).
    pub unit_price_paise: i64,
    /// Quantity sold.
    pub quantity: i64,
    /// Tax rate in basis points at time of sale (frozen).
    pub tax_rate_bps: u32,
    /// Whether the frozen price already contained tax.
    pub tax_inclusive: bool,
}

impl BillLine {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_paise(self.unit_price_paise)
    }

    /// Line gross: unit price × quantity.
    #[inline]
    pub fn gross(&self) -> Money {
        self.unit_price() * self.quantity
    }
}

// =============================================================================
// Bill
// =============================================================================

/// An immutable, persisted bill.
///
/// Created once by [`Bill::from_cart`]; afterwards only `print_status` may
/// change, and only through the print-status tracker.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Bill {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Ordered line snapshots, insertion order of the cart.
    pub lines: Vec<BillLine>,
    /// Pre-tax base.
    pub subtotal: Money,
    /// Combined tax amount.
    pub tax_amount: Money,
    /// Signed rounding adjustment.
    pub round_off: Money,
    /// Payable amount.
    pub grand_total: Money,
    /// Cart-level tax mode the bill was priced under.
    pub tax_mode: TaxMode,
    /// Optional customer reference.
    pub customer: Option<Customer>,
    /// When the bill was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    /// Identity of the cashier who created the bill.
    pub created_by: String,
    /// Print history, mutated only by the print-status tracker.
    pub print_status: PrintStatus,
}

impl Bill {
    /// Snapshots a cart into an immutable bill.
    ///
    /// Fails fast on an empty cart; otherwise every line is frozen and the
    /// totals are computed under the given mode and rounding unit.
    pub fn from_cart(
        cart: &Cart,
        mode: TaxMode,
        rounding: RoundingUnit,
        created_by: &str,
        customer: Option<Customer>,
    ) -> CoreResult<Bill> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let lines: Vec<BillLine> = cart
            .lines()
            .iter()
            .map(|l| BillLine {
                product_id: l.product.id.clone(),
                name: l.product.name.clone(),
                name_local: l.product.name_local.clone(),
                unit_label: l.product.unit_label.clone(),
                unit_price_paise: l.product.unit_price_paise,
                quantity: l.quantity,
                tax_rate_bps: l.product.tax_rate_bps,
                tax_inclusive: l.product.tax_inclusive,
            })
            .collect();

        let charge_lines: Vec<ChargeLine> = cart.lines().iter().map(|l| l.charge_line()).collect();
        let totals = compute_totals(&charge_lines, mode, rounding);

        Ok(Bill {
            id: Uuid::new_v4().to_string(),
            lines,
            subtotal: totals.subtotal,
            tax_amount: totals.tax_amount,
            round_off: totals.round_off,
            grand_total: totals.grand_total,
            tax_mode: mode,
            customer,
            created_at: Utc::now(),
            created_by: created_by.to_string(),
            print_status: PrintStatus::NotPrinted,
        })
    }

    /// Short human-presentable suffix of the id, as shown on receipts.
    pub fn short_id(&self) -> String {
        let tail_at = self.id.len().saturating_sub(8);
        self.id[tail_at..].to_uppercase()
    }

    /// The totals block of this bill.
    pub fn totals(&self) -> BillTotals {
        BillTotals {
            subtotal: self.subtotal,
            tax_amount: self.tax_amount,
            round_off: self.round_off,
            grand_total: self.grand_total,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Product;
    use chrono::Utc;

    fn line(price_paise: i64, qty: i64, bps: u32, inclusive: bool) -> ChargeLine {
        ChargeLine {
            unit_price: Money::from_paise(price_paise),
            quantity: qty,
            tax_rate_bps: bps,
            tax_inclusive: inclusive,
        }
    }

    fn assert_sum_invariant(t: &BillTotals) {
        assert_eq!(
            t.subtotal + t.tax_amount + t.round_off,
            t.grand_total,
            "sum invariant violated: {:?}",
            t
        );
    }

    #[test]
    fn test_empty_cart_is_all_zero() {
        let t = compute_totals(&[], TaxMode::Exclusive, RoundingUnit::Rupee);
        assert_eq!(t, BillTotals::zero());
        assert_sum_invariant(&t);
    }

    /// ₹120.00 × 2 at 5% exclusive.
    #[test]
    fn test_exclusive_single_line() {
        let t = compute_totals(
            &[line(12000, 2, 500, false)],
            TaxMode::Exclusive,
            RoundingUnit::Rupee,
        );
        assert_eq!(t.subtotal, Money::from_paise(24000));
        assert_eq!(t.tax_amount, Money::from_paise(1200));
        assert_eq!(t.round_off, Money::zero());
        assert_eq!(t.grand_total, Money::from_paise(25200));
        assert_sum_invariant(&t);
    }

    /// ₹100.00 at 18% inclusive. Base = 100/1.18 = 84.7458...,
    /// rounded subtotal 84.75, tax 15.25, total exactly 100.00.
    #[test]
    fn test_inclusive_single_line() {
        let t = compute_totals(
            &[line(10000, 1, 1800, true)],
            TaxMode::Exclusive,
            RoundingUnit::Rupee,
        );
        assert_eq!(t.subtotal, Money::from_paise(8475));
        assert_eq!(t.tax_amount, Money::from_paise(1525));
        assert_eq!(t.grand_total, Money::from_paise(10000));
        assert_eq!(t.round_off, Money::zero());
        assert_sum_invariant(&t);
    }

    /// ₹33.33 × 3 at 0%. The rounding unit decides the outcome and must be
    /// an explicit configuration.
    #[test]
    fn test_rounding_unit_is_explicit() {
        let lines = [line(3333, 3, 0, false)];

        let rupee = compute_totals(&lines, TaxMode::Exclusive, RoundingUnit::Rupee);
        assert_eq!(rupee.subtotal, Money::from_paise(9999));
        assert_eq!(rupee.grand_total, Money::from_paise(10000));
        assert_eq!(rupee.round_off, Money::from_paise(1));
        assert_sum_invariant(&rupee);

        let paise = compute_totals(&lines, TaxMode::Exclusive, RoundingUnit::Paise);
        assert_eq!(paise.grand_total, Money::from_paise(9999));
        assert_eq!(paise.round_off, Money::zero());
        assert_sum_invariant(&paise);
    }

    /// Rounding happens after summation: many small 18%-exclusive lines.
    /// Per-line rounding of 0.18 paise of tax each would drift from the
    /// summed result.
    #[test]
    fn test_tax_rounds_after_summation() {
        // 7 lines of ₹0.01 at 18%: per-line tax 0.0018, summed 0.0126 →
        // rounds to 0.01; rounding each line first would give 0.00.
        let lines: Vec<ChargeLine> = (0..7).map(|_| line(1, 1, 1800, false)).collect();
        let t = compute_totals(&lines, TaxMode::Exclusive, RoundingUnit::Paise);
        assert_eq!(t.tax_amount, Money::from_paise(1));
        assert_sum_invariant(&t);
    }

    /// Cart-level inclusive mode: the payable total is exactly the sum of
    /// displayed prices, and the mode overrides per-product flags.
    #[test]
    fn test_cart_level_inclusive_mode() {
        // One product marked exclusive, one inclusive; mode wins for both.
        let lines = [line(10000, 1, 1800, false), line(5000, 2, 500, true)];
        let t = compute_totals(&lines, TaxMode::Inclusive, RoundingUnit::Rupee);

        // Grand total is the exact shelf sum, untouched by tax math
        assert_eq!(t.grand_total, Money::from_paise(20000));
        assert_sum_invariant(&t);

        // Back-computed parts, rounded after summation:
        // 100/1.18 + 100/1.05 = 84.745762 + 95.238095 = 179.983858 → 179.98
        assert_eq!(t.subtotal, Money::from_paise(17998));
        assert_eq!(t.tax_amount, Money::from_paise(2002));
        assert_eq!(t.round_off, Money::zero());
    }

    /// The sum invariant holds across arbitrary prices, quantities and
    /// rates in [0, 100]%, in both modes and both rounding units.
    #[test]
    fn test_sum_invariant_property() {
        // Deterministic pseudo-random walk over the input space
        let mut seed: u64 = 0x4b69_7261_6e61_21;
        let mut next = move || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            seed
        };

        for _ in 0..500 {
            let n = (next() % 12 + 1) as usize;
            let lines: Vec<ChargeLine> = (0..n)
                .map(|_| {
                    line(
                        (next() % 1_000_000 + 1) as i64,
                        (next() % 99 + 1) as i64,
                        (next() % 10_001) as u32,
                        next() % 2 == 0,
                    )
                })
                .collect();

            for mode in [TaxMode::Exclusive, TaxMode::Inclusive] {
                for unit in [RoundingUnit::Paise, RoundingUnit::Rupee] {
                    let t = compute_totals(&lines, mode, unit);
                    assert_sum_invariant(&t);
                }
            }
        }
    }

    /// Single line, qty 1: inclusive tax is P - P/(1+r), exclusive tax is
    /// P×r, within rounding.
    #[test]
    fn test_inclusive_exclusive_consistency() {
        let p = 25000i64; // ₹250.00
        let bps = 1200u32; // 12%

        let excl = compute_totals(
            &[line(p, 1, bps, false)],
            TaxMode::Exclusive,
            RoundingUnit::Paise,
        );
        assert_eq!(excl.tax_amount, Money::from_paise(3000)); // 250 × 12%

        let incl = compute_totals(
            &[line(p, 1, bps, true)],
            TaxMode::Exclusive,
            RoundingUnit::Paise,
        );
        // 250 - 250/1.12 = 26.7857... → 26.79
        assert_eq!(incl.tax_amount, Money::from_paise(2679));
    }

    fn test_product(id: &str, price_paise: i64, bps: u32) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            name_local: None,
            unit_price_paise: price_paise,
            unit_label: "pc".to_string(),
            tax_rate_bps: bps,
            tax_inclusive: false,
            stock_count: None,
            product_code: None,
            barcode: None,
            image_ref: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_bill_from_empty_cart_fails() {
        let cart = Cart::new();
        let result = Bill::from_cart(
            &cart,
            TaxMode::Exclusive,
            RoundingUnit::Rupee,
            "cashier-1",
            None,
        );
        assert!(matches!(result, Err(CoreError::EmptyCart)));
    }

    #[test]
    fn test_bill_snapshots_cart() {
        let mut cart = Cart::new();
        let mut product = test_product("p1", 12000, 500);
        cart.add_line(&product, 2).unwrap();

        let bill = Bill::from_cart(
            &cart,
            TaxMode::Exclusive,
            RoundingUnit::Rupee,
            "cashier-1",
            None,
        )
        .unwrap();

        assert_eq!(bill.lines.len(), 1);
        assert_eq!(bill.grand_total, Money::from_paise(25200));
        assert_eq!(bill.print_status, PrintStatus::NotPrinted);

        // A later product edit does not touch the frozen bill line
        product.unit_price_paise = 99900;
        cart.sync_product(&product);
        assert_eq!(bill.lines[0].unit_price_paise, 12000);
    }

    #[test]
    fn test_bill_short_id() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("p1", 1000, 0), 1).unwrap();
        let bill = Bill::from_cart(
            &cart,
            TaxMode::Exclusive,
            RoundingUnit::Rupee,
            "cashier-1",
            None,
        )
        .unwrap();

        let short = bill.short_id();
        assert_eq!(short.len(), 8);
        assert!(bill.id.to_uppercase().ends_with(&short));
    }
}
