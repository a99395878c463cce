use std::io::Write;

use kwatch_core::{Event, EventSink, SinkError, Snapshot, WatchOutcome};

/// Human-readable output: one line per event, then the final status of
/// every resource.
pub struct EventsPrinter<W> {
    out: W,
}

impl<W: Write + Send> EventsPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> EventSink for EventsPrinter<W> {
    fn on_event(&mut self, event: &Event, _snapshot: &Snapshot) -> Result<(), SinkError> {
        match event {
            Event::ResourceUpdate { id, status, message } => match message {
                Some(m) => writeln!(self.out, "{id} is {status}: {m}")?,
                None => writeln!(self.out, "{id} is {status}")?,
            },
            Event::ResourceError { id, error } => writeln!(self.out, "{id} error: {error}")?,
            Event::StreamClosed => writeln!(self.out, "event stream closed")?,
        }
        self.out.flush()?;
        Ok(())
    }

    fn on_finish(&mut self, outcome: &WatchOutcome) -> Result<(), SinkError> {
        writeln!(
            self.out,
            "watch stopped ({}): aggregate status {}, {}",
            outcome.reason,
            outcome.aggregate,
            if outcome.converged { "converged" } else { "not converged" }
        )?;
        for r in &outcome.snapshot.records {
            match &r.error {
                Some(e) => writeln!(self.out, "  {}  {} ({e})", r.id, r.status)?,
                None => writeln!(self.out, "  {}  {}", r.id, r.status)?,
            }
        }
        self.out.flush()?;
        Ok(())
    }
}
