use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Why a watch stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    PolicySatisfied,
    DeadlineExceeded,
    Interrupted,
    /// The producer closed its stream before anything else stopped the watch.
    StreamEnded,
    /// The producer's transport failed. Surfaced as an error, not an outcome.
    StreamFailed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::PolicySatisfied => "policy satisfied",
            StopReason::DeadlineExceeded => "deadline exceeded",
            StopReason::Interrupted => "interrupted",
            StopReason::StreamEnded => "stream ended",
            StopReason::StreamFailed => "stream failed",
        };
        f.write_str(s)
    }
}

/// Single-fire cancellation shared by the engine, the producer, the deadline
/// governor and any external interrupt. The first trigger's reason is kept;
/// every later trigger is a no-op.
#[derive(Clone, Debug, Default)]
pub struct CancelSignal {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    token: CancellationToken,
    reason: OnceLock<StopReason>,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the signal. Returns true only for the call that won.
    pub fn trigger(&self, reason: StopReason) -> bool {
        if self.inner.reason.set(reason).is_err() {
            debug!(%reason, "cancel signal already triggered");
            return false;
        }
        self.inner.token.cancel();
        true
    }

    pub fn is_triggered(&self) -> bool {
        self.inner.token.is_cancelled()
    }

    pub fn reason(&self) -> Option<StopReason> {
        self.inner.reason.get().copied()
    }

    /// Resolves once the signal has fired.
    pub async fn cancelled(&self) {
        self.inner.token.cancelled().await
    }

    /// Token view for producers that already speak `CancellationToken`.
    pub fn token(&self) -> CancellationToken {
        self.inner.token.clone()
    }
}
