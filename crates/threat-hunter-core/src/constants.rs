//! Shared constants for the dashboard coordinator

use std::time::Duration;

/// Maximum live records retained in the stream buffer
pub const STREAM_CAPACITY: usize = 1000;

/// Rows per page in the prediction tables
pub const PAGE_SIZE: usize = 50;

/// How long a "Done" / "Stopped" label stays up before reverting to idle
pub const STATUS_RESET_DELAY: Duration = Duration::from_millis(1500);

/// Wait before resubscribing after the packet feed drops
pub const FEED_RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// Default event loop tick
pub const DEFAULT_TICK_MS: u64 = 100;

// =============================================================================
// Button labels
// =============================================================================

/// Labels shown on the control strip, keyed by workflow
pub mod labels {
    pub const START_SNIFFING: &str = "Start Sniffing";
    pub const SNIFF_RUNNING: &str = "Running…";
    pub const SNIFF_STOPPING: &str = "Stopping…";
    pub const SNIFF_STOPPED: &str = "Stopped";
    pub const SNIFF_FAILED: &str = "Stop failed";

    pub const RUN_PREDICTIONS: &str = "Run Predictions";
    pub const RUN_FILE: &str = "Run File";
    pub const RUN_MALICIOUS: &str = "Run Malicious";

    pub const REASONING: &str = "Reasoning…";
    pub const DONE: &str = "Done";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits() {
        assert_eq!(STREAM_CAPACITY, 1000);
        assert_eq!(PAGE_SIZE, 50);
        assert_eq!(STATUS_RESET_DELAY, Duration::from_millis(1500));
    }
}
