//! # Billing Orchestrator
//!
//! The top-level coordinator the screens call. One instance per signed-in
//! cashier session.
//!
//! ## Flows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_bill(cart)                                                      │
//! │                                                                         │
//! │  cart non-empty? ──no──► ValidationError (fail fast, nothing written)   │
//! │        │yes                                                             │
//! │        ▼                                                                │
//! │  settings ──► calculator ──► immutable Bill ──► gateway.create_bill     │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  cart.clear() ──► return Bill                                           │
//! │                                                                         │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │  print_bill(bill)                                                       │
//! │                                                                         │
//! │  resolve transport (spooler when none selected)                         │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  render (thermal text | spooler HTML) ──► manager.print                 │
//! │        │ success                  │ failure                             │
//! │        ▼                          ▼                                     │
//! │  tracker.record_print_success    categorized error to caller;          │
//! │  bill.print_status = new         print status UNTOUCHED, no retry      │
//! │                                                                         │
//! │  Steps run strictly in order; no step begins before the previous one    │
//! │  resolves.                                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::{debug, info, warn};

use kirana_core::{Bill, Cart, CoreError, Customer, PrintStatus};
use kirana_print::receipt::{render_html, render_thermal, ReceiptDocument};
use kirana_print::{PrinterDevice, PrinterTransportManager, TransportKind};

use crate::error::BillingError;
use crate::gateway::PersistenceGateway;
use crate::status::PrintStatusTracker;

/// Coordinates cart → bill → receipt → printer → status tracking.
pub struct BillingOrchestrator {
    gateway: Arc<dyn PersistenceGateway>,
    printer: Arc<PrinterTransportManager>,
    tracker: PrintStatusTracker,
    operator: String,
}

impl BillingOrchestrator {
    /// `operator` is the signed-in cashier identity stamped on every bill
    /// this session creates.
    pub fn new(
        gateway: Arc<dyn PersistenceGateway>,
        printer: Arc<PrinterTransportManager>,
        operator: impl Into<String>,
    ) -> Self {
        let tracker = PrintStatusTracker::new(gateway.clone());
        BillingOrchestrator {
            gateway,
            printer,
            tracker,
            operator: operator.into(),
        }
    }

    /// Startup wiring: silently reconnects the persisted printer, once.
    ///
    /// Returns the reconnected device, `None` when no printer was ever
    /// selected. An adapter-off failure keeps its category so the screens
    /// can prompt to enable the radio; any failure leaves the persisted
    /// selection intact.
    pub async fn startup(&self) -> Result<Option<PrinterDevice>, BillingError> {
        match self.printer.auto_reconnect().await {
            Ok(Some(device)) => {
                info!(device = %device.name, "Printer reconnected on startup");
                Ok(Some(device))
            }
            Ok(None) => {
                debug!("No printer selected; receipts go to the system spooler");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Startup printer reconnect failed");
                Err(e.into())
            }
        }
    }

    /// Snapshots the cart into a persisted, immutable bill and clears the
    /// cart. Fails fast on an empty cart with nothing written.
    pub async fn create_bill(
        &self,
        cart: &mut Cart,
        customer: Option<Customer>,
    ) -> Result<Bill, BillingError> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        let settings = self.gateway.get_settings().await?;
        let bill = Bill::from_cart(
            cart,
            settings.tax_mode,
            settings.rounding_unit,
            &self.operator,
            customer,
        )?;

        self.gateway.create_bill(&bill).await?;
        cart.clear();

        info!(
            bill_id = %bill.id,
            total = %bill.grand_total,
            lines = bill.lines.len(),
            "Bill created"
        );
        Ok(bill)
    }

    /// Renders and transmits the receipt, then advances the print status.
    ///
    /// The transport falls back to the system spooler only when no printer
    /// was ever selected. On any failure the print status (persisted and
    /// in-memory) is left untouched and the categorized error goes to the
    /// caller; retrying is always a fresh user-initiated call.
    pub async fn print_bill(&self, bill: &mut Bill) -> Result<PrintStatus, BillingError> {
        let settings = self.gateway.get_settings().await?;

        let document = match self.printer.active_kind().await {
            TransportKind::SystemSpooler => ReceiptDocument::Html(render_html(bill, &settings)),
            _ => ReceiptDocument::Thermal(render_thermal(
                bill,
                &settings,
                self.printer.config().receipt_width,
            )),
        };

        self.printer.print(&document).await?;

        let status = self.tracker.record_print_success(&bill.id).await?;
        bill.print_status = status;

        info!(bill_id = %bill.id, status = ?status, "Receipt printed");
        Ok(status)
    }

    /// Prints a self-test page over the active transport.
    pub async fn test_print(&self) -> Result<(), BillingError> {
        self.printer.test_print().await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
