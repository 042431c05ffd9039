use std::thread;
use std::time::{Duration, Instant};

use crate::workflow::error::Result;

/// How long the device is given after the last submission.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(10);

/// Wait applied between a workflow's final submission and its verification read.
///
/// The device processes deletes and imports asynchronously and offers no
/// completion signal. `Fixed` sleeps once and reads once. `Poll` re-reads
/// until the workflow's completion check passes or `timeout` runs out. Either
/// way the workflow verifies the last snapshot read, so the outcome reported
/// to the caller has the same shape under both policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlePolicy {
    Fixed(Duration),
    Poll { interval: Duration, timeout: Duration },
}

impl Default for SettlePolicy {
    fn default() -> Self {
        SettlePolicy::Fixed(DEFAULT_SETTLE_DELAY)
    }
}

impl SettlePolicy {
    /// No waiting at all. Mostly useful against simulated devices.
    pub const fn immediate() -> Self {
        SettlePolicy::Fixed(Duration::ZERO)
    }

    /// Wait, then read with `probe` until `done` accepts the snapshot or the
    /// policy gives up. Returns the last snapshot read.
    pub fn settle<T>(
        &self,
        mut probe: impl FnMut() -> Result<T>,
        mut done: impl FnMut(&T) -> bool,
    ) -> Result<T> {
        match *self {
            SettlePolicy::Fixed(delay) => {
                tracing::info!(delay_ms = delay.as_millis() as u64, "waiting for device to settle");
                thread::sleep(delay);
                probe()
            }
            SettlePolicy::Poll { interval, timeout } => {
                tracing::info!(
                    interval_ms = interval.as_millis() as u64,
                    timeout_ms = timeout.as_millis() as u64,
                    "polling device until it settles"
                );
                let started = Instant::now();
                let mut attempts = 0u32;
                loop {
                    thread::sleep(interval);
                    attempts += 1;
                    let snapshot = probe()?;
                    if done(&snapshot) {
                        tracing::debug!(attempts, "device settled");
                        return Ok(snapshot);
                    }
                    if started.elapsed() >= timeout {
                        tracing::debug!(attempts, "settle timeout reached");
                        return Ok(snapshot);
                    }
                }
            }
        }
    }
}
