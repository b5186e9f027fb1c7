//! # kirana-billing: Billing Orchestration for Kirana POS
//!
//! The facade the screens layer calls. Wires the pure billing core to the
//! print layer and the persistence collaborator.
//!
//! ## Data Flow (one direction)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  cart mutations ──► Cart (kirana-core)                                  │
//! │                       │  create_bill                                    │
//! │                       ▼                                                 │
//! │                 BillingCalculator ──► immutable Bill ──► gateway        │
//! │                                          │  print_bill                  │
//! │                                          ▼                              │
//! │                 ReceiptRenderer ──► PrinterTransportManager             │
//! │                                          │  success                     │
//! │                                          ▼                              │
//! │                 PrintStatusTracker (printed / reprinted)                │
//! │                                                                         │
//! │  Failures flow back up with their categories intact; a failed print     │
//! │  never advances print status and never strands the transport.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Wiring
//! ```rust,ignore
//! let manager = Arc::new(PrinterTransportManager::new(
//!     native_driver, permission_gate, os_spooler, selection_store,
//!     TransportConfig::default(),
//! ));
//! let orchestrator = BillingOrchestrator::new(db_gateway, manager, "asha");
//!
//! orchestrator.startup().await?;                  // reconnect saved printer
//! let bill = orchestrator.create_bill(&mut cart, None).await?;
//! orchestrator.print_bill(&mut bill.clone()).await?;
//! ```

pub mod error;
pub mod gateway;
pub mod orchestrator;
pub mod status;

pub use error::BillingError;
pub use gateway::{GatewayError, PersistenceGateway};
pub use orchestrator::BillingOrchestrator;
pub use status::PrintStatusTracker;
