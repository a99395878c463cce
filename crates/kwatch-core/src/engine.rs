use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    aggregate::aggregate_status,
    cancel::{CancelSignal, StopReason},
    error::{SinkError, SourceError, WatchError},
    ids::WatchSet,
    model::{Event, Status},
    policy::TerminationPolicy,
    sink::EventSink,
    source::EventStream,
    store::{Snapshot, StatusStore},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Running,
    Terminating,
    Stopped,
}

/// Result of folding a single event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    /// Status the resource had before the event; `None` for events that did
    /// not touch the store.
    pub previous: Option<Status>,
    pub snapshot: Snapshot,
    /// True when this event satisfied the policy and its trigger won.
    pub policy_stop: bool,
}

/// Final result of a watch that stopped normally.
#[derive(Clone, Debug, Serialize)]
pub struct WatchOutcome {
    pub session_id: Uuid,
    pub reason: StopReason,
    pub aggregate: Status,
    pub converged: bool,
    pub snapshot: Snapshot,
    pub events_seen: u64,
    #[serde(skip)]
    pub sink_errors: Vec<SinkError>,
}

/// Consumes one event stream and decides when the watch is over.
///
/// All mutation happens on the caller's task: events are folded one at a
/// time and the policy is evaluated between them.
#[derive(Debug)]
pub struct ConvergenceEngine {
    session_id: Uuid,
    store: StatusStore,
    policy: TerminationPolicy,
    signal: CancelSignal,
    state: EngineState,
    events_seen: u64,
}

enum Wake {
    Cancelled,
    Item(Option<Result<Event, SourceError>>),
}

impl ConvergenceEngine {
    pub fn new(watch_set: WatchSet, policy: TerminationPolicy, signal: CancelSignal) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            store: StatusStore::new(watch_set),
            policy,
            signal,
            state: EngineState::Running,
            events_seen: 0,
        }
    }

    pub fn with_session_id(mut self, id: Uuid) -> Self {
        self.session_id = id;
        self
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn policy(&self) -> TerminationPolicy {
        self.policy
    }

    pub fn store(&self) -> &StatusStore {
        &self.store
    }

    pub fn signal(&self) -> &CancelSignal {
        &self.signal
    }

    /// Folds one event into the store and, while running, evaluates the
    /// policy against the result.
    pub fn apply(&mut self, event: &Event) -> Step {
        self.events_seen += 1;
        let previous = match event {
            Event::ResourceUpdate { id, status, message } => {
                let prev = self.store.update(id, *status, message.clone());
                match prev {
                    Some(prev) => debug!(%id, from = %prev, to = %status, "status update"),
                    None => debug!(%id, "ignoring event for unwatched resource"),
                }
                prev
            }
            Event::ResourceError { id, error } => {
                debug!(%id, %error, "resource observation error");
                self.store.record_error(id, error.clone())
            }
            Event::StreamClosed => None,
        };

        let snapshot = self.store.snapshot();
        let mut policy_stop = false;
        if self.state == EngineState::Running {
            if self.signal.is_triggered() {
                self.enter_terminating();
            } else if self.policy.evaluate(&snapshot, event) {
                policy_stop = self.signal.trigger(StopReason::PolicySatisfied);
                self.enter_terminating();
            }
        }

        Step {
            previous,
            snapshot,
            policy_stop,
        }
    }

    fn enter_terminating(&mut self) {
        if self.state != EngineState::Running {
            return;
        }
        self.state = EngineState::Terminating;
        info!(
            reason = %self.signal.reason().unwrap_or(StopReason::StreamEnded),
            events = self.events_seen,
            "watch terminating"
        );
    }

    /// Drives the engine until the stream closes. Returns `Err` only when
    /// the stream itself fails.
    pub async fn run(mut self, mut events: EventStream, sink: &mut dyn EventSink) -> Result<WatchOutcome, WatchError> {
        let mut sink_errors = Vec::new();

        loop {
            let item = if self.state == EngineState::Running {
                let wake = tokio::select! {
                    biased;
                    () = self.signal.cancelled() => Wake::Cancelled,
                    item = events.recv() => Wake::Item(item),
                };
                match wake {
                    Wake::Cancelled => {
                        self.enter_terminating();
                        continue;
                    }
                    Wake::Item(item) => item,
                }
            } else {
                events.recv().await
            };

            let event = match item {
                None => break,
                Some(Err(e)) => {
                    warn!(error = %e, "event stream failed");
                    self.signal.trigger(StopReason::StreamFailed);
                    self.state = EngineState::Stopped;
                    return Err(WatchError::Stream(e));
                }
                Some(Ok(event)) => event,
            };

            let step = self.apply(&event);
            if let Err(e) = sink.on_event(&event, &step.snapshot) {
                warn!(error = %e, "failed to render event");
                sink_errors.push(e);
            }
            if event == Event::StreamClosed {
                break;
            }
        }

        if self.signal.trigger(StopReason::StreamEnded) {
            info!("event stream closed before the watch was cancelled");
        }
        let mut outcome = self.finish(sink_errors);
        if let Err(e) = sink.on_finish(&outcome) {
            warn!(error = %e, "failed to render final status");
            outcome.sink_errors.push(e);
        }
        Ok(outcome)
    }

    /// Stops the engine and computes the final result from the store.
    pub fn finish(&mut self, sink_errors: Vec<SinkError>) -> WatchOutcome {
        self.state = EngineState::Stopped;
        let snapshot = self.store.snapshot();
        WatchOutcome {
            session_id: self.session_id,
            reason: self.signal.reason().unwrap_or(StopReason::StreamEnded),
            aggregate: aggregate_status(&snapshot.records, self.policy.target()),
            converged: self.policy.is_satisfied(&snapshot),
            snapshot,
            events_seen: self.events_seen,
            sink_errors,
        }
    }
}
