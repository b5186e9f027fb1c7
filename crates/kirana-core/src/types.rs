//! # Domain Types
//!
//! Core domain types used throughout Kirana POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  ShopSettings   │   │    Customer     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  shop_name      │   │  name           │       │
//! │  │  name/name_local│   │  gstin          │   │  phone          │       │
//! │  │  unit_price     │   │  tax_mode       │   └─────────────────┘       │
//! │  │  tax_rate_bps   │   │  rounding_unit  │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │    TaxMode      │   │  PrintStatus    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Exclusive      │   │  NotPrinted     │       │
//! │  │  500 = 5%       │   │  Inclusive      │   │  Printed        │       │
//! │  └─────────────────┘   └─────────────────┘   │  Reprinted      │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{Money, RoundingUnit};
use crate::validation::{
    validate_product_code, validate_product_name, validate_tax_rate_bps, validate_unit_price,
};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 500 bps = 5%, 1800 bps = 18% (GST slabs)
///
/// The conventional GST slabs are {0, 5, 12, 18, 28}%, but any 0-100% value
/// is accepted; the slabs are presets on the product screen, not a rule the
/// calculator enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percent(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Tax Mode
// =============================================================================

/// Cart-level GST mode, independent of each product's own inclusive flag.
///
/// ## Resolution Rule
/// - `Exclusive`: each line follows its product's `tax_inclusive` flag.
/// - `Inclusive`: the cart-level mode wins for every line, so the payable
///   total equals the sum of displayed prices exactly and no separate tax
///   is added at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxMode {
    /// Tax added on top of prices at checkout (per-product flags apply).
    Exclusive,
    /// Displayed prices are final; tax is back-computed for reporting.
    Inclusive,
}

impl Default for TaxMode {
    fn default() -> Self {
        TaxMode::Exclusive
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to cashier and on the receipt.
    pub name: String,

    /// Optional local-language name, printed as the receipt subtitle.
    pub name_local: Option<String>,

    /// Price in paise (smallest currency unit). Must be positive.
    pub unit_price_paise: i64,

    /// Unit label shown next to quantities ("pc", "kg", "ltr").
    pub unit_label: String,

    /// Tax rate in basis points (500 = 5%).
    pub tax_rate_bps: u32,

    /// Whether the listed price already contains tax.
    pub tax_inclusive: bool,

    /// Current stock level, if tracked.
    pub stock_count: Option<i64>,

    /// Optional unique short code typed at the billing screen.
    pub product_code: Option<String>,

    /// Barcode (EAN-13, UPC-A, etc.).
    pub barcode: Option<String>,

    /// Reference to a stored product image.
    pub image_ref: Option<String>,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_paise(self.unit_price_paise)
    }

    /// Returns the tax rate.
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Validates the fields the billing core depends on.
    ///
    /// ## Rules
    /// - name non-empty, at most 200 characters
    /// - unit price strictly positive
    /// - tax rate between 0% and 100%
    /// - product code (when present) alphanumeric/hyphen/underscore
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_product_name(&self.name)?;
        validate_unit_price(self.unit_price_paise)?;
        validate_tax_rate_bps(self.tax_rate_bps)?;
        if let Some(code) = &self.product_code {
            validate_product_code(code)?;
        }
        Ok(())
    }
}

// =============================================================================
// Customer
// =============================================================================

/// Optional customer reference attached to a bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    pub name: String,
    pub phone: Option<String>,
}

// =============================================================================
// Shop Settings
// =============================================================================

/// Shop-wide settings the billing core reads at checkout and print time.
///
/// Owned by the persistence collaborator; this crate only consumes them.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShopSettings {
    /// Shop name printed at the top of every receipt.
    pub shop_name: String,

    /// Address block printed under the shop name.
    pub address: String,

    /// Contact phone printed in the receipt header.
    pub phone: String,

    /// GST registration number, printed when present.
    pub gstin: Option<String>,

    /// Base64-encoded logo embedded inline in HTML receipts.
    /// Inline data keeps printing fully offline.
    pub logo_base64: Option<String>,

    /// Cart-level tax mode toggle.
    pub tax_mode: TaxMode,

    /// Grand-total rounding granularity.
    pub rounding_unit: RoundingUnit,

    /// Footer line printed at the bottom of every receipt.
    pub footer_message: String,
}

impl Default for ShopSettings {
    fn default() -> Self {
        ShopSettings {
            shop_name: String::new(),
            address: String::new(),
            phone: String::new(),
            gstin: None,
            logo_base64: None,
            tax_mode: TaxMode::default(),
            rounding_unit: RoundingUnit::default(),
            footer_message: "Thank you! Visit again".to_string(),
        }
    }
}

// =============================================================================
// Print Status
// =============================================================================

/// Print history of a bill.
///
/// ## Lifecycle
/// ```text
/// NotPrinted ──first success──► Printed ──every later success──► Reprinted ─┐
///                                                                    ▲      │
///                                                                    └──────┘
/// ```
/// The transition is monotonic forward only; a failed print never moves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PrintStatus {
    /// Bill has never been transmitted successfully.
    NotPrinted,
    /// Exactly one successful transmission.
    Printed,
    /// Two or more successful transmissions.
    Reprinted,
}

impl PrintStatus {
    /// The status after one more successful transmission.
    #[inline]
    pub const fn after_successful_print(self) -> PrintStatus {
        match self {
            PrintStatus::NotPrinted => PrintStatus::Printed,
            PrintStatus::Printed | PrintStatus::Reprinted => PrintStatus::Reprinted,
        }
    }

    /// True once at least one print succeeded.
    #[inline]
    pub const fn has_printed(self) -> bool {
        !matches!(self, PrintStatus::NotPrinted)
    }
}

impl Default for PrintStatus {
    fn default() -> Self {
        PrintStatus::NotPrinted
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
            name: "Basmati Rice 1kg".to_string(),
            name_local: Some("बासमती चावल".to_string()),
            unit_price_paise: 12000,
            unit_label: "pc".to_string(),
            tax_rate_bps: 500,
            tax_inclusive: false,
            stock_count: Some(40),
            product_code: Some("RICE-1".to_string()),
            barcode: None,
            image_ref: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(500);
        assert_eq!(rate.bps(), 500);
        assert!((rate.percent() - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_tax_rate_from_percent() {
        assert_eq!(TaxRate::from_percent(18.0).bps(), 1800);
        assert_eq!(TaxRate::from_percent(0.25).bps(), 25);
    }

    #[test]
    fn test_product_validate() {
        assert!(sample_product().validate().is_ok());

        let mut free = sample_product();
        free.unit_price_paise = 0;
        assert!(free.validate().is_err());

        let mut overtaxed = sample_product();
        overtaxed.tax_rate_bps = 10001;
        assert!(overtaxed.validate().is_err());
    }

    #[test]
    fn test_print_status_progression() {
        let mut status = PrintStatus::default();
        assert_eq!(status, PrintStatus::NotPrinted);

        status = status.after_successful_print();
        assert_eq!(status, PrintStatus::Printed);

        status = status.after_successful_print();
        assert_eq!(status, PrintStatus::Reprinted);

        // Stays at Reprinted forever
        status = status.after_successful_print();
        assert_eq!(status, PrintStatus::Reprinted);
    }

    #[test]
    fn test_print_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&PrintStatus::NotPrinted).unwrap(),
            "\"not_printed\""
        );
        assert_eq!(
            serde_json::to_string(&PrintStatus::Reprinted).unwrap(),
            "\"reprinted\""
        );
    }

    #[test]
    fn test_tax_mode_default() {
        assert_eq!(TaxMode::default(), TaxMode::Exclusive);
    }
}
