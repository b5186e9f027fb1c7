//! # Print Status Tracker
//!
//! The one place a bill's print status changes.
//!
//! ## Transition Rule
//! ```text
//! read current ──► NotPrinted ──► write Printed
//!             └──► otherwise  ──► write Reprinted
//! ```
//! The check-then-write is one logical transition. If the write fails, no
//! in-memory bill is mutated (this type never touches one), so the caller
//! can safely retry the whole print and land on the correct status.

use std::sync::Arc;

use tracing::debug;

use kirana_core::PrintStatus;

use crate::gateway::{GatewayError, PersistenceGateway};

/// Records successful transmissions against the persisted bill.
pub struct PrintStatusTracker {
    gateway: Arc<dyn PersistenceGateway>,
}

impl PrintStatusTracker {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        PrintStatusTracker { gateway }
    }

    /// Advances the bill's print status after a successful transmission.
    ///
    /// Monotonic forward only: NotPrinted → Printed → Reprinted → Reprinted.
    /// Returns the status that was written.
    pub async fn record_print_success(&self, bill_id: &str) -> Result<PrintStatus, GatewayError> {
        let current = self.gateway.get_bill_print_status(bill_id).await?;
        let next = current.after_successful_print();
        self.gateway.update_bill_print_status(bill_id, next).await?;
        debug!(bill_id = %bill_id, from = ?current, to = ?next, "Print status advanced");
        Ok(next)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kirana_core::{Bill, ShopSettings};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryGateway {
        statuses: Mutex<HashMap<String, PrintStatus>>,
        fail_update: AtomicBool,
    }

    #[async_trait]
    impl PersistenceGateway for MemoryGateway {
        async fn create_bill(&self, bill: &Bill) -> Result<String, GatewayError> {
            self.statuses
                .lock()
                .unwrap()
                .insert(bill.id.clone(), bill.print_status);
            Ok(bill.id.clone())
        }

        async fn get_bill_print_status(&self, bill_id: &str) -> Result<PrintStatus, GatewayError> {
            self.statuses
                .lock()
                .unwrap()
                .get(bill_id)
                .copied()
                .ok_or_else(|| GatewayError::BillNotFound(bill_id.to_string()))
        }

        async fn update_bill_print_status(
            &self,
            bill_id: &str,
            status: PrintStatus,
        ) -> Result<(), GatewayError> {
            if self.fail_update.load(Ordering::SeqCst) {
                return Err(GatewayError::Failed("disk full".to_string()));
            }
            self.statuses
                .lock()
                .unwrap()
                .insert(bill_id.to_string(), status);
            Ok(())
        }

        async fn get_settings(&self) -> Result<ShopSettings, GatewayError> {
            Ok(ShopSettings::default())
        }
    }

    fn seeded_gateway(bill_id: &str) -> Arc<MemoryGateway> {
        let gateway = Arc::new(MemoryGateway::default());
        gateway
            .statuses
            .lock()
            .unwrap()
            .insert(bill_id.to_string(), PrintStatus::NotPrinted);
        gateway
    }

    /// Any number of successes produces printed, reprinted, reprinted, ...
    #[tokio::test]
    async fn test_status_is_monotonic() {
        let gateway = seeded_gateway("b1");
        let tracker = PrintStatusTracker::new(gateway.clone());

        assert_eq!(
            tracker.record_print_success("b1").await.unwrap(),
            PrintStatus::Printed
        );
        assert_eq!(
            tracker.record_print_success("b1").await.unwrap(),
            PrintStatus::Reprinted
        );
        assert_eq!(
            tracker.record_print_success("b1").await.unwrap(),
            PrintStatus::Reprinted
        );
    }

    /// A failed write leaves the stored status untouched so a retry is safe.
    #[tokio::test]
    async fn test_failed_write_changes_nothing() {
        let gateway = seeded_gateway("b1");
        let tracker = PrintStatusTracker::new(gateway.clone());

        gateway.fail_update.store(true, Ordering::SeqCst);
        assert!(tracker.record_print_success("b1").await.is_err());
        assert_eq!(
            gateway.statuses.lock().unwrap()["b1"],
            PrintStatus::NotPrinted
        );

        // Retry after the store recovers lands on Printed, not Reprinted
        gateway.fail_update.store(false, Ordering::SeqCst);
        assert_eq!(
            tracker.record_print_success("b1").await.unwrap(),
            PrintStatus::Printed
        );
    }

    #[tokio::test]
    async fn test_unknown_bill_errors() {
        let tracker = PrintStatusTracker::new(Arc::new(MemoryGateway::default()));
        assert!(matches!(
            tracker.record_print_success("ghost").await,
            Err(GatewayError::BillNotFound(_))
        ));
    }
}
