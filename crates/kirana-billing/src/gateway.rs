//! # Persistence Gateway Port
//!
//! The collaborator trait through which bills and settings are stored. The
//! billing core never owns a database; the surrounding app implements this
//! on its local storage engine.
//!
//! All operations are fallible, async, single-record writes; there is no
//! transactional composition across calls.

use async_trait::async_trait;
use thiserror::Error;

use kirana_core::{Bill, PrintStatus, ShopSettings};

/// Error from the persistence collaborator.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The referenced bill does not exist.
    #[error("bill not found: {0}")]
    BillNotFound(String),

    /// Any storage-level failure (I/O, serialization, constraint).
    #[error("persistence operation failed: {0}")]
    Failed(String),
}

/// The persistence operations the billing core depends on.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Stores a freshly created bill and returns its id.
    async fn create_bill(&self, bill: &Bill) -> Result<String, GatewayError>;

    /// Reads the current print status of a bill.
    async fn get_bill_print_status(&self, bill_id: &str) -> Result<PrintStatus, GatewayError>;

    /// Writes a new print status for a bill. This is the only mutation a
    /// bill sees after creation.
    async fn update_bill_print_status(
        &self,
        bill_id: &str,
        status: PrintStatus,
    ) -> Result<(), GatewayError>;

    /// Loads the shop settings used at checkout and print time.
    async fn get_settings(&self) -> Result<ShopSettings, GatewayError>;
}
