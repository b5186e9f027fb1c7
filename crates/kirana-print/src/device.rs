//! # Printer Device Model
//!
//! Devices, transport kinds, and the persisted printer selection.
//!
//! ## Device Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    PrinterDevice Lifecycle                              │
//! │                                                                         │
//! │  scan(bluetooth|usb) ──► ephemeral device list (never persisted)       │
//! │                                                                         │
//! │  manual IP entry ──────► synthesized network device                     │
//! │                                                                         │
//! │  connect(device) ✓ ────► SelectedPrinter record saved                   │
//! │                          (the ONLY persisted device, one at a time)     │
//! │                                                                         │
//! │  startup ──────────────► SelectedPrinter loaded ──► auto-reconnect     │
//! │                                                                         │
//! │  absence of a record  =  "use the system print spooler"                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Conventional raw-printing TCP port for network printers.
pub const DEFAULT_RAW_PRINT_PORT: u16 = 9100;

// =============================================================================
// Transport Kind
// =============================================================================

/// The closed set of receipt delivery channels.
///
/// A closed enum instead of a loose "type" string: every match on it is
/// checked by the compiler, and each variant carries its own capability
/// answers below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// Bluetooth thermal printer, addressed by MAC.
    Bluetooth,
    /// USB thermal printer, addressed by MAC/serial as the driver reports it.
    Usb,
    /// Network printer, addressed by `ip:port` (raw socket).
    Network,
    /// The operating system's print dialog; no connection state at all.
    SystemSpooler,
}

impl TransportKind {
    /// Whether `scan` can produce a device list for this kind.
    /// Network printers are entered manually; the spooler needs no device.
    #[inline]
    pub const fn supports_scan(&self) -> bool {
        matches!(self, TransportKind::Bluetooth | TransportKind::Usb)
    }

    /// Whether OS permissions must be granted before any transport I/O.
    #[inline]
    pub const fn requires_permission(&self) -> bool {
        matches!(self, TransportKind::Bluetooth | TransportKind::Usb)
    }

    /// Whether this kind holds an open connection between prints.
    #[inline]
    pub const fn holds_connection(&self) -> bool {
        !matches!(self, TransportKind::SystemSpooler)
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Bluetooth => write!(f, "bluetooth"),
            TransportKind::Usb => write!(f, "usb"),
            TransportKind::Network => write!(f, "network"),
            TransportKind::SystemSpooler => write!(f, "system_spooler"),
        }
    }
}

// =============================================================================
// Printer Device
// =============================================================================

/// A printer as seen by the transport layer.
///
/// Discovered devices are ephemeral; only the user's chosen device is ever
/// persisted, as a [`SelectedPrinter`] record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PrinterDevice {
    /// Stable identifier (the address doubles as id for scanned devices).
    pub id: String,
    /// Human-readable name shown in the printer-setup screen.
    pub name: String,
    /// Transport kind.
    pub kind: TransportKind,
    /// MAC for bluetooth/usb, `ip:port` for network, empty for the spooler.
    pub address: String,
    /// Last-known connected flag for list display.
    pub last_connected: bool,
}

impl PrinterDevice {
    /// Synthesizes the single-element "device list" for a manually entered
    /// network printer. Port 0 falls back to the conventional raw port.
    pub fn network(ip: &str, port: u16, name: &str) -> Self {
        let port = if port == 0 { DEFAULT_RAW_PRINT_PORT } else { port };
        let address = format!("{}:{}", ip, port);
        PrinterDevice {
            id: address.clone(),
            name: if name.is_empty() {
                address.clone()
            } else {
                name.to_string()
            },
            kind: TransportKind::Network,
            address,
            last_connected: false,
        }
    }

    /// The implicit device used when no printer has ever been selected.
    pub fn system_spooler() -> Self {
        PrinterDevice {
            id: "system".to_string(),
            name: "System printer".to_string(),
            kind: TransportKind::SystemSpooler,
            address: String::new(),
            last_connected: false,
        }
    }
}

// =============================================================================
// Selected Printer Record
// =============================================================================

/// The single persisted "selected printer" record.
///
/// Stored under one key by the key-value collaborator; the wire shape is
/// `{id, name, type, address}` and must stay stable across releases because
/// old installs carry it forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SelectedPrinter {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TransportKind,
    pub address: String,
}

impl From<&PrinterDevice> for SelectedPrinter {
    fn from(device: &PrinterDevice) -> Self {
        SelectedPrinter {
            id: device.id.clone(),
            name: device.name.clone(),
            kind: device.kind,
            address: device.address.clone(),
        }
    }
}

impl SelectedPrinter {
    /// Rehydrates the record into a device for reconnection.
    pub fn to_device(&self) -> PrinterDevice {
        PrinterDevice {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind,
            address: self.address.clone(),
            last_connected: false,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
