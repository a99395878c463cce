use std::io::Write;

use kwatch_core::{now_ms, EpochMs, Event, EventSink, SinkError, Snapshot, WatchOutcome};
use serde::Serialize;

/// One JSON object per line.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Line<'a> {
    Event { timestamp_ms: EpochMs, event: &'a Event },
    Summary { timestamp_ms: EpochMs, outcome: &'a WatchOutcome },
}

pub struct JsonPrinter<W> {
    out: W,
}

impl<W: Write + Send> JsonPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &Line<'_>) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.out, line)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> EventSink for JsonPrinter<W> {
    fn on_event(&mut self, event: &Event, _snapshot: &Snapshot) -> Result<(), SinkError> {
        self.write_line(&Line::Event {
            timestamp_ms: now_ms(),
            event,
        })
    }

    fn on_finish(&mut self, outcome: &WatchOutcome) -> Result<(), SinkError> {
        self.write_line(&Line::Summary {
            timestamp_ms: now_ms(),
            outcome,
        })
    }
}
