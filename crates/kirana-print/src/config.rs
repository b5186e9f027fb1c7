//! # Transport Configuration
//!
//! Tunables for the printer transport layer. Defaults match the common
//! 58mm Bluetooth thermal printer this class of shop runs.

use std::time::Duration;

use crate::device::DEFAULT_RAW_PRINT_PORT;

/// Configuration for the printer transport manager.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// How long a connect attempt may take before it fails.
    pub connect_timeout: Duration,

    /// How long one payload write may take. Expiry counts as a
    /// transmission failure and drops the transport to Disconnected.
    pub write_timeout: Duration,

    /// Port used when a network printer is entered without one.
    pub default_network_port: u16,

    /// Character columns of the thermal receipt (32 for 58mm, 48 for 80mm).
    pub receipt_width: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            connect_timeout: Duration::from_secs(10),
            write_timeout: Duration::from_secs(15),
            default_network_port: DEFAULT_RAW_PRINT_PORT,
            receipt_width: 32,
        }
    }
}
