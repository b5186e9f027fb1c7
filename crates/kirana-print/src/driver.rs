//! # Native Driver Ports
//!
//! Collaborator traits for the platform layer. The billing core never talks
//! to a radio or a socket directly; it orchestrates these ports, which the
//! surrounding app implements on top of its native SDKs.
//!
//! ## Port Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Collaborator Ports                                  │
//! │                                                                         │
//! │  TransportDriver    discover / open / write / close per transport kind  │
//! │  PermissionGate     OS permission + adapter power state queries         │
//! │  SpoolerDriver      hand a rendered HTML document to the OS dialog      │
//! │  SelectionStore     the single persisted selected-printer record        │
//! │                                                                         │
//! │  All fallible, all async, no transactional composition across calls.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::device::{PrinterDevice, SelectedPrinter, TransportKind};

// =============================================================================
// Driver Handle
// =============================================================================

/// Opaque token for an open native connection, issued by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DriverHandle(pub u64);

// =============================================================================
// Driver Error
// =============================================================================

/// Failure vocabulary of the native transport layer.
///
/// The manager maps these onto the user-facing print error taxonomy; the
/// distinction between `AdapterOff` and `Unreachable` is what lets the
/// screens prompt "turn on Bluetooth" instead of a generic failure message.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The radio/adapter itself is powered off or missing.
    #[error("adapter is off or unavailable")]
    AdapterOff,

    /// The OS denied the permission required for this transport.
    #[error("permission denied by the operating system")]
    PermissionDenied,

    /// The device did not answer (out of range, powered off, bad address).
    #[error("device unreachable: {0}")]
    Unreachable(String),

    /// The native call did not complete in time.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// The connection was open but bytes could not be delivered.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// Any other native I/O failure.
    #[error("driver I/O error: {0}")]
    Io(String),
}

// =============================================================================
// Transport Driver
// =============================================================================

/// The thin native transport driver (Bluetooth / USB / network socket).
///
/// Implementations own discovery, addressing, and byte delivery; command
/// framing such as cut/feed sequences also lives behind this port.
#[async_trait]
pub trait TransportDriver: Send + Sync {
    /// Lists reachable devices of the given kind.
    /// Only called for kinds where [`TransportKind::supports_scan`] is true.
    async fn discover(&self, kind: TransportKind) -> Result<Vec<PrinterDevice>, DriverError>;

    /// Opens a connection to the given address.
    async fn open(&self, kind: TransportKind, address: &str) -> Result<DriverHandle, DriverError>;

    /// Delivers a payload over an open connection.
    async fn write(&self, handle: DriverHandle, payload: &[u8]) -> Result<(), DriverError>;

    /// Closes an open connection. Closing twice is a driver-level no-op.
    async fn close(&self, handle: DriverHandle) -> Result<(), DriverError>;
}

// =============================================================================
// Permission Gate
// =============================================================================

/// OS permission and adapter state queries for Bluetooth/USB transports.
///
/// Checked before any scan or connect so a denial never turns into a
/// confusing transport error.
#[async_trait]
pub trait PermissionGate: Send + Sync {
    /// Whether the required permissions are currently granted.
    async fn is_granted(&self, kind: TransportKind) -> bool;

    /// Prompts the user; returns whether the grant was given.
    async fn request(&self, kind: TransportKind) -> bool;

    /// Whether the radio/adapter for this kind is powered on.
    async fn adapter_enabled(&self, kind: TransportKind) -> bool;
}

// =============================================================================
// Spooler Driver
// =============================================================================

/// Hands a self-contained HTML document to the OS print dialog.
///
/// There is no connection state behind this port; it can only fail while
/// rendering or spooling.
#[async_trait]
pub trait SpoolerDriver: Send + Sync {
    async fn spool(&self, document: &str) -> Result<(), DriverError>;
}

// =============================================================================
// Selection Store
// =============================================================================

/// Error from the key-value store holding the selected printer.
#[derive(Debug, Error)]
#[error("printer selection store failed: {0}")]
pub struct StoreError(pub String);

/// The single-key persistence for the user's chosen printer.
///
/// `load` returning `None` means no printer was ever selected, which the
/// manager treats as "use the system spooler". The record is overwritten on
/// every successful user-initiated connect and cleared never.
#[async_trait]
pub trait SelectionStore: Send + Sync {
    async fn load(&self) -> Result<Option<SelectedPrinter>, StoreError>;
    async fn save(&self, printer: &SelectedPrinter) -> Result<(), StoreError>;
}
