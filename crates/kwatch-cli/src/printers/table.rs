use std::io::Write;

use kwatch_core::{Event, EventSink, SinkError, Snapshot, WatchOutcome};

const HEADERS: [&str; 5] = ["NAMESPACE", "KIND", "NAME", "STATUS", "MESSAGE"];

/// Prints nothing while the watch runs, then one aligned row per resource
/// with its final status.
pub struct TablePrinter<W> {
    out: W,
}

impl<W: Write + Send> TablePrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

fn rows(snapshot: &Snapshot) -> Vec<[String; 5]> {
    snapshot
        .records
        .iter()
        .map(|r| {
            let message = r.error.as_deref().or(r.message.as_deref()).unwrap_or_default();
            [
                r.id.namespace.clone(),
                r.id.kind.clone(),
                r.id.name.clone(),
                r.status.to_string(),
                message.to_string(),
            ]
        })
        .collect()
}

impl<W: Write + Send> EventSink for TablePrinter<W> {
    fn on_event(&mut self, _event: &Event, _snapshot: &Snapshot) -> Result<(), SinkError> {
        Ok(())
    }

    fn on_finish(&mut self, outcome: &WatchOutcome) -> Result<(), SinkError> {
        let header = HEADERS.map(String::from);
        let body = rows(&outcome.snapshot);
        let mut widths = [0usize; 5];
        for row in std::iter::once(&header).chain(&body) {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.len());
            }
        }

        for row in std::iter::once(&header).chain(&body) {
            let line = row
                .iter()
                .zip(widths)
                .map(|(cell, w)| format!("{cell:<w$}"))
                .collect::<Vec<_>>()
                .join("  ");
            writeln!(self.out, "{}", line.trim_end())?;
        }
        writeln!(
            self.out,
            "aggregate status {} ({}, {})",
            outcome.aggregate,
            outcome.reason,
            if outcome.converged { "converged" } else { "not converged" }
        )?;
        self.out.flush()?;
        Ok(())
    }
}
