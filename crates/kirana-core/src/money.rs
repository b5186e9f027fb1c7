//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  On a GST receipt:                                                      │
//! │    ₹100.00 / 1.18 = ₹84.7457627...  → which paise does the bill show?  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    All stored values are whole paise (1/100 rupee).                     │
//! │    Sub-paise precision exists only inside the calculator, in i128       │
//! │    micro-paise, and is rounded exactly once, after summation.           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kirana_core::money::Money;
//!
//! // Create from paise (preferred)
//! let price = Money::from_paise(12050); // ₹120.50
//!
//! // Arithmetic operations
//! let doubled = price * 2;                        // ₹241.00
//! let total = price + Money::from_paise(950);     // ₹130.00
//!
//! // NEVER do this:
//! // let bad = Money::from_float(120.50); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in paise (the smallest currency unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: Round-off deltas are signed; refunds stay expressible
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// Every monetary value in the billing core flows through this type:
/// product prices, line amounts, subtotals, tax, round-off, grand totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

/// Micro-paise scale used by the billing calculator for lossless
/// accumulation (1 paise = 1_000_000 micro-paise).
pub(crate) const MICRO_PER_PAISE: i128 = 1_000_000;

impl Money {
    /// Creates a Money value from paise (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use kirana_core::money::Money;
    ///
    /// let price = Money::from_paise(12099); // Represents ₹120.99
    /// assert_eq!(price.paise(), 12099);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from rupees and paise.
    ///
    /// ## Example
    /// ```rust
    /// use kirana_core::money::Money;
    ///
    /// let price = Money::from_rupees(120, 99); // ₹120.99
    /// assert_eq!(price.paise(), 12099);
    ///
    /// let adjustment = Money::from_rupees(-5, 50); // -₹5.50
    /// assert_eq!(adjustment.paise(), -550);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_rupees(-5, 50)` = -₹5.50, not -₹4.50
    #[inline]
    pub const fn from_rupees(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99, absolute value).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Rounds to the given unit using round-half-up (away from zero).
    ///
    /// This is the single source of grand-total rounding truth. The unit is
    /// an explicit configuration, never an assumption baked into call sites:
    ///
    /// ```rust
    /// use kirana_core::money::{Money, RoundingUnit};
    ///
    /// let raw = Money::from_paise(9999); // ₹99.99
    /// assert_eq!(raw.round_to(RoundingUnit::Rupee).paise(), 10000);
    /// assert_eq!(raw.round_to(RoundingUnit::Paise).paise(), 9999);
    ///
    /// // Half rounds up, away from zero
    /// assert_eq!(Money::from_paise(50).round_to(RoundingUnit::Rupee).paise(), 100);
    /// assert_eq!(Money::from_paise(-50).round_to(RoundingUnit::Rupee).paise(), -100);
    /// ```
    pub fn round_to(&self, unit: RoundingUnit) -> Money {
        let u = unit.paise_value();
        if u == 1 {
            return *self;
        }
        let rounded = if self.0 >= 0 {
            (self.0 + u / 2) / u * u
        } else {
            -((-self.0 + u / 2) / u * u)
        };
        Money(rounded)
    }

    /// Splits into two halves that sum back exactly to the original.
    ///
    /// Used for the CGST/SGST receipt breakdown: the first half is the
    /// rounded-down share, the second takes the odd paise.
    ///
    /// ```rust
    /// use kirana_core::money::Money;
    ///
    /// let (cgst, sgst) = Money::from_paise(1525).split_half();
    /// assert_eq!(cgst.paise(), 762);
    /// assert_eq!(sgst.paise(), 763);
    /// assert_eq!(cgst + sgst, Money::from_paise(1525));
    /// ```
    pub fn split_half(&self) -> (Money, Money) {
        let low = Money(self.0 / 2);
        (low, *self - low)
    }

    /// Converts to micro-paise for lossless accumulation in the calculator.
    #[inline]
    pub(crate) const fn to_micro(self) -> i128 {
        self.0 as i128 * MICRO_PER_PAISE
    }

    /// Rounds a micro-paise amount half-up (away from zero) to whole paise.
    ///
    /// Applied exactly once per accumulated total, never per line.
    pub(crate) const fn from_micro_half_up(micro: i128) -> Money {
        let half = MICRO_PER_PAISE / 2;
        let paise = if micro >= 0 {
            (micro + half) / MICRO_PER_PAISE
        } else {
            -((-micro + half) / MICRO_PER_PAISE)
        };
        Money(paise as i64)
    }
}

// =============================================================================
// Rounding Unit
// =============================================================================

/// Granularity to which a grand total is rounded.
///
/// Indian retail bills conventionally round the payable amount to the whole
/// rupee and show the difference as a "Round Off" line; a shop can instead
/// keep paise-exact totals. The same cart produces different grand totals
/// under the two, so this is an explicit, persisted setting rather than an
/// implicit constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RoundingUnit {
    /// No grand-total rounding (unit 0.01).
    Paise,
    /// Round the grand total to the nearest whole rupee (unit 1.00).
    Rupee,
}

impl RoundingUnit {
    /// The unit expressed in paise.
    #[inline]
    pub const fn paise_value(&self) -> i64 {
        match self {
            RoundingUnit::Paise => 1,
            RoundingUnit::Rupee => 100,
        }
    }
}

impl Default for RoundingUnit {
    fn default() -> Self {
        RoundingUnit::Rupee
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is the receipt formatting: always exactly two decimal places.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
