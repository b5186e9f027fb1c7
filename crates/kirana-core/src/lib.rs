//! # kirana-core: Pure Billing Logic for Kirana POS
//!
//! This crate is the **heart** of Kirana POS. It contains the billing math
//! and cart model as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kirana POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      Screens Layer                              │   │
//! │  │    Billing UI ──► Cart UI ──► Checkout UI ──► Printer Setup    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kirana-billing (orchestrator)                │   │
//! │  └──────────┬──────────────────────────────────────┬───────────────┘   │
//! │             │                                      │                    │
//! │  ┌──────────▼──────────────────┐   ┌───────────────▼─────────────────┐ │
//! │  │  ★ kirana-core (THIS) ★     │   │  kirana-print                   │ │
//! │  │                             │   │  transports + receipt renderers │ │
//! │  │  ┌───────┐ ┌──────┐ ┌─────┐ │   └─────────────────────────────────┘ │
//! │  │  │ money │ │ cart │ │bill │ │                                       │
//! │  │  │ Money │ │ Cart │ │calc │ │                                       │
//! │  │  └───────┘ └──────┘ └─────┘ │                                       │
//! │  │                             │                                       │
//! │  │  NO I/O • PURE FUNCTIONS    │                                       │
//! │  └─────────────────────────────┘                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer paise arithmetic (no floating point!)
//! - [`types`] - Domain types (Product, ShopSettings, PrintStatus, etc.)
//! - [`cart`] - The cart model owned by the active billing session
//! - [`billing`] - The billing calculator and the immutable Bill snapshot
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, printer access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in paise (i64) to avoid float errors
//! 4. **One Rounding Site**: Only the calculator rounds, and only after summation
//!
//! ## Example Usage
//!
//! ```rust
//! use kirana_core::billing::{compute_totals, ChargeLine};
//! use kirana_core::money::{Money, RoundingUnit};
//! use kirana_core::types::TaxMode;
//!
//! // ₹120.00 × 2 at 5% exclusive
//! let lines = [ChargeLine {
//!     unit_price: Money::from_paise(12000),
//!     quantity: 2,
//!     tax_rate_bps: 500,
//!     tax_inclusive: false,
//! }];
//!
//! let totals = compute_totals(&lines, TaxMode::Exclusive, RoundingUnit::Rupee);
//! assert_eq!(totals.grand_total, Money::from_paise(25200));
//! assert_eq!(totals.subtotal + totals.tax_amount + totals.round_off, totals.grand_total);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod billing;
pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use kirana_core::Money` instead of
// `use kirana_core::money::Money`

pub use billing::{compute_totals, Bill, BillLine, BillTotals, ChargeLine};
pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, RoundingUnit};
pub use types::{Customer, PrintStatus, Product, ShopSettings, TaxMode, TaxRate};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum unique lines allowed in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and keeps thermal receipts printable in one go.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line in the cart
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
