//! # Billing Error Type
//!
//! The funnel error the screens layer receives from the orchestrator.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Kirana POS                             │
//! │                                                                         │
//! │  CoreError          (empty cart, bad quantity)       ──┐               │
//! │  PrintError         (permission, adapter, busy, ...) ──┼──► BillingError│
//! │  GatewayError       (persistence failures)           ──┘        │      │
//! │                                                                 ▼      │
//! │                                              screens pick a message    │
//! │                                              from the category helpers │
//! │                                                                         │
//! │  Nothing is swallowed: every failure reaches the caller with its        │
//! │  category intact, and a failed print is always recoverable by a fresh   │
//! │  user-initiated retry.                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use kirana_core::CoreError;
use kirana_print::PrintError;

use crate::gateway::GatewayError;

/// Error returned by the billing orchestrator.
#[derive(Debug, Error)]
pub enum BillingError {
    /// Business rule violation (empty cart, invalid quantity, ...).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Printing failure, categorized per transport rules.
    #[error(transparent)]
    Print(#[from] PrintError),

    /// Persistence collaborator failure.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl BillingError {
    /// True for rule violations that should render as form/input feedback.
    pub fn is_validation(&self) -> bool {
        matches!(self, BillingError::Core(_))
    }

    /// True when the user must grant an OS permission.
    pub fn is_permission(&self) -> bool {
        matches!(self, BillingError::Print(e) if e.is_permission())
    }

    /// True when the fix is enabling the radio/adapter.
    pub fn is_adapter_unavailable(&self) -> bool {
        matches!(self, BillingError::Print(e) if e.is_adapter_unavailable())
    }

    /// True when another print was already in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, BillingError::Print(e) if e.is_busy())
    }
}
