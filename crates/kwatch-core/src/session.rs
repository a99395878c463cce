use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::{
    cancel::CancelSignal,
    config::WatchConfig,
    deadline::DeadlineGovernor,
    engine::{ConvergenceEngine, WatchOutcome},
    error::WatchError,
    ids::WatchSet,
    sink::EventSink,
    source::{PollOptions, StatusSource},
};

/// One watch over a fixed set of resources: wires the cancel signal, the
/// deadline, the producer and the engine together.
#[derive(Debug)]
pub struct WatchSession {
    id: Uuid,
    watch_set: WatchSet,
    config: WatchConfig,
    signal: CancelSignal,
}

impl WatchSession {
    pub fn new(watch_set: WatchSet, config: WatchConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            watch_set,
            config,
            signal: CancelSignal::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Handle for external cancellation, e.g. an operator interrupt.
    pub fn signal(&self) -> CancelSignal {
        self.signal.clone()
    }

    pub async fn run(self, source: &dyn StatusSource, sink: &mut dyn EventSink) -> Result<WatchOutcome, WatchError> {
        let span = info_span!("watch", session = %self.id);
        async move {
            let policy = self.config.policy();
            info!(
                resources = self.watch_set.len(),
                %policy,
                poll_period_ms = self.config.poll_period.as_millis() as u64,
                timeout_ms = self.config.timeout.map(|t| t.as_millis() as u64),
                "starting watch"
            );

            let _deadline = DeadlineGovernor::start(self.config.timeout, self.signal.clone());
            let options = PollOptions {
                poll_interval: self.config.poll_period,
                use_cache: self.config.use_cache,
            };
            let events = source.watch(&self.watch_set, &options, self.signal.clone());

            let engine = ConvergenceEngine::new(self.watch_set, policy, self.signal).with_session_id(self.id);
            let outcome = engine.run(events, sink).await?;

            info!(
                reason = %outcome.reason,
                aggregate = %outcome.aggregate,
                converged = outcome.converged,
                events = outcome.events_seen,
                "watch stopped"
            );
            Ok(outcome)
        }
        .instrument(span)
        .await
    }
}
