use crate::{engine::WatchOutcome, error::SinkError, model::Event, store::Snapshot};

/// Renders the watch as it happens. A failing sink never stops the watch;
/// its errors are collected into the outcome.
pub trait EventSink: Send {
    /// Called for every consumed event, after it has been folded into
    /// `snapshot`.
    fn on_event(&mut self, event: &Event, snapshot: &Snapshot) -> Result<(), SinkError>;

    /// Called once with the final result.
    fn on_finish(&mut self, outcome: &WatchOutcome) -> Result<(), SinkError>;
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn on_event(&mut self, _event: &Event, _snapshot: &Snapshot) -> Result<(), SinkError> {
        Ok(())
    }

    fn on_finish(&mut self, _outcome: &WatchOutcome) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Keeps every forwarded event and the final outcome in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub events: Vec<Event>,
    pub outcome: Option<WatchOutcome>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for CollectingSink {
    fn on_event(&mut self, event: &Event, _snapshot: &Snapshot) -> Result<(), SinkError> {
        self.events.push(event.clone());
        Ok(())
    }

    fn on_finish(&mut self, outcome: &WatchOutcome) -> Result<(), SinkError> {
        self.outcome = Some(outcome.clone());
        Ok(())
    }
}
