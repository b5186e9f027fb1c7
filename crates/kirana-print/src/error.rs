//! # Print Error Types
//!
//! The categorized failure taxonomy for printing.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Print Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Preconditions  │  │   Connectivity  │  │     In-flight           │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │ PermissionDenied│  │  Connection     │  │  Transmission           │ │
//! │  │ AdapterUnavail. │  │  NotConnected   │  │  Busy                   │ │
//! │  │ ScanUnsupported │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │    Documents    │  │   Persistence   │                              │
//! │  │                 │  │                 │                              │
//! │  │  Rendering      │  │  Store          │                              │
//! │  │  Spooler        │  │                 │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! │                                                                         │
//! │  Every category reaches the caller; nothing is swallowed. No variant    │
//! │  ever clears the persisted printer selection.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::device::TransportKind;
use crate::driver::StoreError;

/// Result type alias for print operations.
pub type PrintResult<T> = Result<T, PrintError>;

/// Print failure, categorized for specific user-facing messages.
#[derive(Debug, Error)]
pub enum PrintError {
    // =========================================================================
    // Precondition Errors
    // =========================================================================
    /// OS permission for the transport was denied.
    /// The screens offer to open system settings for this one.
    #[error("printing permission denied for {kind}")]
    PermissionDenied { kind: TransportKind },

    /// The radio/adapter is off. Distinguished from a generic connection
    /// failure so the screens can prompt to enable it; the persisted
    /// selection is kept so the same device reconnects once it is back on.
    #[error("{kind} adapter is off or unavailable")]
    AdapterUnavailable { kind: TransportKind },

    /// Scan requested for a kind that has no discovery (network printers
    /// are entered manually; the spooler needs no device).
    #[error("scan is not supported for {kind}")]
    ScanUnsupported { kind: TransportKind },

    // =========================================================================
    // Connectivity Errors
    // =========================================================================
    /// Device unreachable, handshake failure, or connect timeout.
    /// One attempt per explicit call; no automatic retry loop.
    #[error("could not connect to {device}: {reason}")]
    Connection { device: String, reason: String },

    /// A print was requested without a connected transport.
    #[error("no printer connected")]
    NotConnected,

    // =========================================================================
    // In-flight Errors
    // =========================================================================
    /// The connection was up but bytes failed mid-print. The transport is
    /// now Disconnected; print status was not advanced, so a retry that
    /// succeeds lands on the correct status.
    #[error("transmission failed mid-print: {0}")]
    Transmission(String),

    /// A second print was attempted while one is in flight. Rejected
    /// synchronously, nothing queued, no state change.
    #[error("another print is already in progress")]
    Busy,

    // =========================================================================
    // Document Errors
    // =========================================================================
    /// The rendered document does not fit the active transport
    /// (an HTML document on a thermal link, or vice versa).
    #[error("receipt rendering failed: {0}")]
    Rendering(String),

    /// The OS print spooler rejected or failed the hand-off.
    #[error("system print spooler failed: {0}")]
    Spooler(String),

    // =========================================================================
    // Persistence Errors
    // =========================================================================
    /// The selected-printer store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// =============================================================================
// Error Categorization (for the screens layer)
// =============================================================================

impl PrintError {
    /// True when the user must grant an OS permission.
    pub fn is_permission(&self) -> bool {
        matches!(self, PrintError::PermissionDenied { .. })
    }

    /// True when the fix is turning the radio/adapter on, not re-pairing.
    pub fn is_adapter_unavailable(&self) -> bool {
        matches!(self, PrintError::AdapterUnavailable { .. })
    }

    /// True when the failure was a synchronous busy rejection.
    pub fn is_busy(&self) -> bool {
        matches!(self, PrintError::Busy)
    }

    /// True when the transport dropped to Disconnected and the next print
    /// needs a fresh connect first.
    pub fn forces_disconnect(&self) -> bool {
        matches!(self, PrintError::Transmission(_))
    }
}
