use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use crate::cancel::{CancelSignal, StopReason};

/// Forces cancellation once a wall-clock deadline passes, independently of
/// the event stream. Aborted on drop.
#[derive(Debug)]
pub struct DeadlineGovernor {
    handle: Option<JoinHandle<()>>,
}

impl DeadlineGovernor {
    /// Starts the timer. `None` or a zero duration means no deadline.
    /// Must be called from within a tokio runtime when a deadline is set.
    pub fn start(timeout: Option<Duration>, signal: CancelSignal) -> Self {
        let handle = timeout.filter(|t| !t.is_zero()).map(|timeout| {
            tokio::spawn(async move {
                tokio::select! {
                    () = tokio::time::sleep(timeout) => {
                        if signal.trigger(StopReason::DeadlineExceeded) {
                            info!(timeout_ms = timeout.as_millis() as u64, "watch deadline exceeded");
                        }
                    }
                    () = signal.cancelled() => {}
                }
            })
        });
        Self { handle }
    }

    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for DeadlineGovernor {
    fn drop(&mut self) {
        if let Some(h) = self.handle.take() {
            h.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fires_after_timeout() {
        let sig = CancelSignal::new();
        let _gov = DeadlineGovernor::start(Some(Duration::from_millis(20)), sig.clone());
        tokio::time::timeout(Duration::from_secs(2), sig.cancelled())
            .await
            .expect("deadline should fire");
        assert_eq!(sig.reason(), Some(StopReason::DeadlineExceeded));
    }

    #[tokio::test]
    async fn zero_means_disabled() {
        let sig = CancelSignal::new();
        let gov = DeadlineGovernor::start(Some(Duration::ZERO), sig.clone());
        assert!(!gov.is_armed());
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!sig.is_triggered());
    }

    #[tokio::test]
    async fn earlier_trigger_keeps_its_reason() {
        let sig = CancelSignal::new();
        let _gov = DeadlineGovernor::start(Some(Duration::from_millis(10)), sig.clone());
        assert!(sig.trigger(StopReason::PolicySatisfied));
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(sig.reason(), Some(StopReason::PolicySatisfied));
    }

    #[tokio::test]
    async fn dropping_disarms() {
        let sig = CancelSignal::new();
        let gov = DeadlineGovernor::start(Some(Duration::from_millis(10)), sig.clone());
        drop(gov);
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!sig.is_triggered());
    }
}
