//! # kirana-print: Printer Transports & Receipt Rendering
//!
//! Everything between an immutable [`Bill`](kirana_core::Bill) and paper.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Kirana POS Print Layer                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 kirana-print (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐ │   │
//! │  │  │  Manager    │  │  Receipt    │  │  Device Model          │ │   │
//! │  │  │ (manager.rs)│  │ (receipt.rs)│  │  (device.rs)           │ │   │
//! │  │  │             │  │             │  │                        │ │   │
//! │  │  │ state       │  │ thermal     │  │ TransportKind          │ │   │
//! │  │  │ machine +   │  │ text +      │  │ PrinterDevice          │ │   │
//! │  │  │ single-     │  │ spooler     │  │ SelectedPrinter        │ │   │
//! │  │  │ flight guard│  │ HTML        │  │                        │ │   │
//! │  │  └──────┬──────┘  └─────────────┘  └────────────────────────┘ │   │
//! │  │         │                                                      │   │
//! │  │         ▼ collaborator ports (driver.rs)                       │   │
//! │  │  TransportDriver · PermissionGate · SpoolerDriver ·            │   │
//! │  │  SelectionStore                                                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │                                ▼                                        │
//! │              native SDKs of the surrounding app                         │
//! │        (Bluetooth serial, USB, TCP socket, OS print dialog)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Rules
//!
//! - Permission and adapter prechecks run before any transport I/O, and
//!   their failures keep their own error categories.
//! - At most one print is in flight per manager; concurrent calls fail
//!   fast with `Busy` instead of queueing silently.
//! - A mid-print failure drops the transport to Disconnected; print status
//!   tracking (one crate up) is never advanced by a failed attempt.
//! - The persisted printer selection survives every failure category.

pub mod config;
pub mod device;
pub mod driver;
pub mod error;
pub mod manager;
pub mod receipt;

pub use config::TransportConfig;
pub use device::{PrinterDevice, SelectedPrinter, TransportKind, DEFAULT_RAW_PRINT_PORT};
pub use driver::{
    DriverError, DriverHandle, PermissionGate, SelectionStore, SpoolerDriver, StoreError,
    TransportDriver,
};
pub use error::{PrintError, PrintResult};
pub use manager::{ConnectionState, PrinterTransportManager};
pub use receipt::{render_html, render_thermal, ReceiptDocument};
