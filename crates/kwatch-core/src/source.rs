use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use crate::{
    cancel::CancelSignal,
    error::SourceError,
    ids::WatchSet,
    model::Event,
};

/// Capacity of the channel between a producer and the engine.
pub const EVENT_BUFFER: usize = 64;

/// Ordered, closable event stream. Closing every sender closes the stream.
pub type EventStream = mpsc::Receiver<Result<Event, SourceError>>;
pub type EventSender = mpsc::Sender<Result<Event, SourceError>>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollOptions {
    pub poll_interval: Duration,
    pub use_cache: bool,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            use_cache: true,
        }
    }
}

/// Producer of status events for a watch set.
///
/// Implementations must stop emitting and drop their sender promptly once
/// `cancel` fires.
pub trait StatusSource: Send + Sync {
    fn watch(&self, watch_set: &WatchSet, options: &PollOptions, cancel: CancelSignal) -> EventStream;
}

/// In-memory producer replaying a fixed script. Useful for tests and for
/// driving the engine without a cluster.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    steps: Vec<(Duration, Result<Event, SourceError>)>,
    hold_open: bool,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: impl IntoIterator<Item = Event>) -> Self {
        let mut s = Self::new();
        for ev in events {
            s = s.emit(ev);
        }
        s
    }

    pub fn emit(self, event: Event) -> Self {
        self.after(Duration::ZERO, event)
    }

    /// Emits `event` once `delay` has passed since the previous step.
    pub fn after(mut self, delay: Duration, event: Event) -> Self {
        self.steps.push((delay, Ok(event)));
        self
    }

    pub fn fail(mut self, error: SourceError) -> Self {
        self.steps.push((Duration::ZERO, Err(error)));
        self
    }

    /// Keep the stream open after the script runs out, like a live poller,
    /// until the cancel signal fires.
    pub fn hold_open(mut self) -> Self {
        self.hold_open = true;
        self
    }
}

impl StatusSource for ScriptedSource {
    fn watch(&self, _watch_set: &WatchSet, _options: &PollOptions, cancel: CancelSignal) -> EventStream {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let steps = self.steps.clone();
        let hold_open = self.hold_open;
        tokio::spawn(async move {
            for (delay, item) in steps {
                if !delay.is_zero() {
                    tokio::select! {
                        () = tokio::time::sleep(delay) => {}
                        () = cancel.cancelled() => break,
                    }
                }
                if cancel.is_triggered() || tx.send(item).await.is_err() {
                    break;
                }
            }
            if hold_open {
                cancel.cancelled().await;
            }
            debug!("scripted source closed");
        });
        rx
    }
}
