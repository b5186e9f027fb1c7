//! # Printer Transport Manager
//!
//! Owns the currently selected transport and funnels every state-changing
//! operation through one single-flight guard.
//!
//! ## Transport State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Transport States                                     │
//! │                                                                         │
//! │  ┌────────────┐   scan()    ┌────────────┐                             │
//! │  │Disconnected│ ──────────► │  Scanning  │ ──► (state restored)        │
//! │  └────────────┘             └────────────┘                             │
//! │        │                                                                │
//! │        │ connect() / auto_reconnect()                                   │
//! │        │                                                                │
//! │        │   failure: stays Disconnected, error keeps its category        │
//! │        │                                                                │
//! │        ▼                             print()      ┌────────────┐       │
//! │   (native open) ─────success──► Connected ──────► │  Printing  │       │
//! │                                      ▲            └─────┬──────┘       │
//! │                                      │  write ok        │              │
//! │                                      └──────────────────┘              │
//! │                                      │                                  │
//! │                      write failure / │ timeout                          │
//! │                                      ▼                                  │
//! │                                Disconnected (fresh connect required)    │
//! │                                                                         │
//! │  SINGLE-FLIGHT GUARD                                                    │
//! │  ───────────────────                                                    │
//! │  connect, auto_reconnect, scan and print all try-lock the same mutex.   │
//! │  A second caller while one is in flight gets Busy immediately;          │
//! │  nothing queues silently. disconnect() waits instead, because it must   │
//! │  be safe from any state.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The system spooler bypasses connect/scan entirely: it has no connection
//! state and can only fail while rendering or spooling.

use std::fmt;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::TransportConfig;
use crate::device::{PrinterDevice, SelectedPrinter, TransportKind};
use crate::driver::{DriverError, DriverHandle, PermissionGate, SelectionStore, SpoolerDriver, TransportDriver};
use crate::error::{PrintError, PrintResult};
use crate::receipt::{self, ReceiptDocument};

// =============================================================================
// Connection State
// =============================================================================

/// Connection state of the active transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No open connection.
    Disconnected,
    /// Device discovery in progress.
    Scanning,
    /// Connected and ready to print.
    Connected,
    /// A payload is in flight.
    Printing,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Scanning => write!(f, "scanning"),
            ConnectionState::Connected => write!(f, "connected"),
            ConnectionState::Printing => write!(f, "printing"),
        }
    }
}

// =============================================================================
// Manager
// =============================================================================

/// Mutable transport state, guarded by the manager's mutex.
struct Inner {
    state: ConnectionState,
    device: Option<PrinterDevice>,
    handle: Option<DriverHandle>,
}

/// The transport facade the orchestrator talks to.
///
/// Collaborators (native driver, permission gate, spooler, selection store)
/// are injected; everything here is orchestration and business rules.
pub struct PrinterTransportManager {
    driver: Arc<dyn TransportDriver>,
    permissions: Arc<dyn PermissionGate>,
    spooler: Arc<dyn SpoolerDriver>,
    store: Arc<dyn SelectionStore>,
    config: TransportConfig,
    inner: Mutex<Inner>,
}

impl PrinterTransportManager {
    pub fn new(
        driver: Arc<dyn TransportDriver>,
        permissions: Arc<dyn PermissionGate>,
        spooler: Arc<dyn SpoolerDriver>,
        store: Arc<dyn SelectionStore>,
        config: TransportConfig,
    ) -> Self {
        PrinterTransportManager {
            driver,
            permissions,
            spooler,
            store,
            config,
            inner: Mutex::new(Inner {
                state: ConnectionState::Disconnected,
                device: None,
                handle: None,
            }),
        }
    }

    /// The transport configuration in effect.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Current connection state.
    pub async fn state(&self) -> ConnectionState {
        self.inner.lock().await.state
    }

    /// The device currently targeted, if any.
    pub async fn current_device(&self) -> Option<PrinterDevice> {
        self.inner.lock().await.device.clone()
    }

    /// The transport kind a print would use right now. With no device
    /// targeted this is the system spooler, the default for fresh installs.
    pub async fn active_kind(&self) -> TransportKind {
        self.inner
            .lock()
            .await
            .device
            .as_ref()
            .map(|d| d.kind)
            .unwrap_or(TransportKind::SystemSpooler)
    }

    /// Synthesizes the single-element device list for a manually entered
    /// network printer (there is no discovery for this kind).
    pub fn manual_network_device(&self, ip: &str, port: Option<u16>, name: &str) -> PrinterDevice {
        PrinterDevice::network(ip, port.unwrap_or(self.config.default_network_port), name)
    }

    // =========================================================================
    // Scan
    // =========================================================================

    /// Discovers devices of the given kind.
    ///
    /// Permissions are verified (and requested once) before any transport
    /// I/O; a denial surfaces as `PermissionDenied`, never as a transport
    /// failure. Kinds without discovery return `ScanUnsupported`.
    pub async fn scan(&self, kind: TransportKind) -> PrintResult<Vec<PrinterDevice>> {
        if !kind.supports_scan() {
            return Err(PrintError::ScanUnsupported { kind });
        }

        let mut inner = self.lock_or_busy()?;
        self.ensure_permission(kind).await?;
        if !self.permissions.adapter_enabled(kind).await {
            return Err(PrintError::AdapterUnavailable { kind });
        }

        let prior = inner.state;
        inner.state = ConnectionState::Scanning;
        let result = self.driver.discover(kind).await;
        inner.state = prior;

        match result {
            Ok(devices) => {
                debug!(kind = %kind, found = devices.len(), "Printer scan finished");
                Ok(devices)
            }
            Err(e) => Err(Self::categorize_connect(kind, &format!("{} scan", kind), e)),
        }
    }

    // =========================================================================
    // Connect
    // =========================================================================

    /// Opens the transport to the given device and, on success, persists it
    /// as the selected printer. On failure the persisted selection is left
    /// untouched.
    pub async fn connect(&self, device: &PrinterDevice) -> PrintResult<()> {
        let mut inner = self.lock_or_busy()?;
        self.connect_locked(&mut inner, device, true).await
    }

    /// Startup path: loads the persisted selection and silently attempts to
    /// connect to it. Funnels through the same guard as explicit `connect`,
    /// so the two can never race on the native `open`.
    ///
    /// Returns the connected device, or `None` when no printer was ever
    /// selected. On failure the selection is kept (so the same device
    /// reconnects once the adapter is back) and the error keeps its
    /// category, letting the caller prompt only for adapter-off.
    pub async fn auto_reconnect(&self) -> PrintResult<Option<PrinterDevice>> {
        let mut inner = self.lock_or_busy()?;

        let record = self.store.load().await?;
        let Some(record) = record else {
            debug!("no printer selected; system spooler remains the default");
            return Ok(None);
        };

        let device = record.to_device();
        match self.connect_locked(&mut inner, &device, false).await {
            Ok(()) => Ok(Some(device)),
            Err(e) => {
                warn!(device = %device.name, error = %e, "Auto-reconnect failed");
                Err(e)
            }
        }
    }

    async fn connect_locked(
        &self,
        inner: &mut Inner,
        device: &PrinterDevice,
        persist: bool,
    ) -> PrintResult<()> {
        // The spooler holds no connection; selecting it only retargets,
        // closing whatever transport was open before.
        if device.kind == TransportKind::SystemSpooler {
            if let Some(old) = inner.handle.take() {
                if let Err(e) = self.driver.close(old).await {
                    warn!(error = %e, "Closing previous connection failed");
                }
            }
            inner.device = Some(device.clone());
            inner.state = ConnectionState::Disconnected;
            if persist {
                self.store.save(&SelectedPrinter::from(device)).await?;
            }
            return Ok(());
        }

        // Retarget first: drop any previous connection, then record the new
        // device. A failed attempt leaves it as the active (disconnected)
        // transport, so later prints report NotConnected instead of
        // silently falling back to the spooler.
        if let Some(old) = inner.handle.take() {
            if let Err(e) = self.driver.close(old).await {
                warn!(error = %e, "Closing previous connection failed");
            }
        }
        inner.state = ConnectionState::Disconnected;
        inner.device = Some(device.clone());

        self.ensure_permission(device.kind).await?;
        if device.kind.requires_permission() && !self.permissions.adapter_enabled(device.kind).await
        {
            return Err(PrintError::AdapterUnavailable { kind: device.kind });
        }

        let opened = timeout(
            self.config.connect_timeout,
            self.driver.open(device.kind, &device.address),
        )
        .await;

        let handle = match opened {
            Ok(Ok(handle)) => handle,
            Ok(Err(e)) => return Err(Self::categorize_connect(device.kind, &device.name, e)),
            Err(_) => {
                return Err(PrintError::Connection {
                    device: device.name.clone(),
                    reason: format!("no response within {:?}", self.config.connect_timeout),
                })
            }
        };

        inner.handle = Some(handle);
        inner.state = ConnectionState::Connected;
        info!(device = %device.name, kind = %device.kind, "Printer connected");

        if persist {
            // The connection stays up even if the record write fails; the
            // Store category tells the caller what actually went wrong.
            self.store.save(&SelectedPrinter::from(device)).await?;
        }

        Ok(())
    }

    // =========================================================================
    // Print
    // =========================================================================

    /// Transmits a rendered receipt over the active transport.
    ///
    /// At most one print is in flight per manager; a concurrent call is
    /// rejected synchronously with `Busy`. A mid-print failure (including
    /// write-timeout expiry) drops the transport to Disconnected so the
    /// next attempt starts with a fresh connect.
    pub async fn print(&self, document: &ReceiptDocument) -> PrintResult<()> {
        let mut inner = self.lock_or_busy()?;

        let kind = inner
            .device
            .as_ref()
            .map(|d| d.kind)
            .unwrap_or(TransportKind::SystemSpooler);

        match (kind, document) {
            (TransportKind::SystemSpooler, ReceiptDocument::Html(html)) => {
                self.spooler
                    .spool(html)
                    .await
                    .map_err(|e| PrintError::Spooler(e.to_string()))?;
                info!("Receipt handed to the system print spooler");
                Ok(())
            }
            (TransportKind::SystemSpooler, ReceiptDocument::Thermal(_)) => {
                Err(PrintError::Rendering(
                    "thermal payload cannot go to the system spooler".to_string(),
                ))
            }
            (_, ReceiptDocument::Html(_)) => Err(PrintError::Rendering(
                "HTML document cannot go to a thermal transport".to_string(),
            )),
            (_, ReceiptDocument::Thermal(text)) => {
                if inner.state != ConnectionState::Connected {
                    return Err(PrintError::NotConnected);
                }
                let Some(handle) = inner.handle else {
                    return Err(PrintError::NotConnected);
                };

                inner.state = ConnectionState::Printing;
                let written = timeout(
                    self.config.write_timeout,
                    self.driver.write(handle, text.as_bytes()),
                )
                .await;

                match written {
                    Ok(Ok(())) => {
                        inner.state = ConnectionState::Connected;
                        info!(bytes = text.len(), kind = %kind, "Receipt transmitted");
                        Ok(())
                    }
                    Ok(Err(e)) => Err(self.fail_in_flight(&mut inner, e.to_string()).await),
                    Err(_) => {
                        let reason =
                            format!("write timed out after {:?}", self.config.write_timeout);
                        Err(self.fail_in_flight(&mut inner, reason).await)
                    }
                }
            }
        }
    }

    /// Prints a short self-test page over the active transport.
    pub async fn test_print(&self) -> PrintResult<()> {
        let document = match self.active_kind().await {
            TransportKind::SystemSpooler => ReceiptDocument::Html(receipt::test_page_html()),
            _ => ReceiptDocument::Thermal(receipt::test_page(self.config.receipt_width)),
        };
        self.print(&document).await
    }

    // =========================================================================
    // Disconnect
    // =========================================================================

    /// Closes the transport. Safe to call from any state, idempotent, and
    /// waits for an in-flight print rather than failing with Busy.
    pub async fn disconnect(&self) {
        let mut inner = self.inner.lock().await;
        if let Some(handle) = inner.handle.take() {
            if let Err(e) = self.driver.close(handle).await {
                warn!(error = %e, "Close failed during disconnect");
            }
        }
        if inner.state != ConnectionState::Disconnected {
            info!("Printer disconnected");
        }
        inner.state = ConnectionState::Disconnected;
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lock_or_busy(&self) -> PrintResult<MutexGuard<'_, Inner>> {
        self.inner.try_lock().map_err(|_| PrintError::Busy)
    }

    /// Verifies (and requests once) the OS permission for the kind.
    /// Fails without attempting transport I/O when denied.
    async fn ensure_permission(&self, kind: TransportKind) -> PrintResult<()> {
        if !kind.requires_permission() {
            return Ok(());
        }
        if self.permissions.is_granted(kind).await {
            return Ok(());
        }
        if self.permissions.request(kind).await {
            return Ok(());
        }
        Err(PrintError::PermissionDenied { kind })
    }

    /// Maps a driver failure during open/discover to its user-facing
    /// category. Adapter-off keeps its own category so the screens can
    /// prompt to enable the radio instead of blaming the device.
    fn categorize_connect(kind: TransportKind, device: &str, e: DriverError) -> PrintError {
        match e {
            DriverError::AdapterOff => PrintError::AdapterUnavailable { kind },
            DriverError::PermissionDenied => PrintError::PermissionDenied { kind },
            other => PrintError::Connection {
                device: device.to_string(),
                reason: other.to_string(),
            },
        }
    }

    /// Mid-print failure: the connection is no longer trustworthy, so close
    /// it and require a fresh connect before the next attempt.
    async fn fail_in_flight(&self, inner: &mut Inner, reason: String) -> PrintError {
        if let Some(handle) = inner.handle.take() {
            if let Err(e) = self.driver.close(handle).await {
                warn!(error = %e, "Close failed after transmission error");
            }
        }
        inner.state = ConnectionState::Disconnected;
        warn!(reason = %reason, "Transmission failed; transport disconnected");
        PrintError::Transmission(reason)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
