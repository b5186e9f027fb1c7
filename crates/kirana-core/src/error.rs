//! # Error Types
//!
//! Domain-specific error types for kirana-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kirana-core errors (this file)                                         │
//! │  ├── CoreError        - Cart/bill domain errors                         │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  kirana-print errors (separate crate)                                   │
//! │  └── PrintError       - Transport and rendering failures                │
//! │                                                                         │
//! │  kirana-billing errors (separate crate)                                 │
//! │  └── BillingError     - What the screens layer sees                     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → BillingError → Screens             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, limits, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core billing logic errors.
///
/// These errors represent business rule violations. They are never retried;
/// the caller surfaces them immediately and no partial state is written.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A bill was requested from a cart with no lines.
    #[error("Cannot create a bill from an empty cart")]
    EmptyCart,

    /// A cart operation referenced a product that is not in the cart.
    #[error("Product not in cart: {0}")]
    LineNotFound(String),

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when input doesn't meet requirements. Used for early
/// validation before any cart or bill state changes.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., bad characters in a product code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::QuantityTooLarge {
            requested: 1200,
            max: 999,
        };
        assert_eq!(
            err.to_string(),
            "Quantity 1200 exceeds maximum allowed (999)"
        );

        assert_eq!(
            CoreError::EmptyCart.to_string(),
            "Cannot create a bill from an empty cart"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::MustBePositive {
            field: "unit price".to_string(),
        };
        assert_eq!(err.to_string(), "unit price must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
