use std::path::PathBuf;

use kwatch_core::{
    CancelSignal, Event, EventSender, EventStream, PollOptions, SourceError, StatusSource, WatchSet,
    EVENT_BUFFER,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Replays recorded observations from a newline-delimited JSON file, one
/// event per poll interval. Blank lines and `#` comments are skipped. The
/// stream closes when the file is exhausted.
#[derive(Clone, Debug)]
pub struct ReplaySource {
    path: PathBuf,
}

impl ReplaySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StatusSource for ReplaySource {
    fn watch(&self, watch_set: &WatchSet, options: &PollOptions, cancel: CancelSignal) -> EventStream {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let path = self.path.clone();
        let options = options.clone();
        info!(
            path = %path.display(),
            resources = watch_set.len(),
            poll_interval_ms = options.poll_interval.as_millis() as u64,
            use_cache = options.use_cache,
            "replaying recorded status events"
        );
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => debug!("replay cancelled"),
                () = replay(path, options, tx) => {}
            }
        });
        rx
    }
}

async fn replay(path: PathBuf, options: PollOptions, tx: EventSender) {
    let file = match tokio::fs::File::open(&path).await {
        Ok(f) => f,
        Err(e) => {
            let _ = tx
                .send(Err(SourceError::Transport(format!("open {}: {e}", path.display()))))
                .await;
            return;
        }
    };

    let mut lines = BufReader::new(file).lines();
    let mut line_no = 0;
    let mut first = true;
    loop {
        let line = match lines.next_line().await {
            Ok(Some(l)) => l,
            Ok(None) => break,
            Err(e) => {
                let _ = tx.send(Err(SourceError::Transport(e.to_string()))).await;
                return;
            }
        };
        line_no += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let item = serde_json::from_str::<Event>(trimmed).map_err(|e| SourceError::Decode {
            line: line_no,
            message: e.to_string(),
        });
        let failed = item.is_err();

        if !first {
            tokio::time::sleep(options.poll_interval).await;
        }
        first = false;
        if tx.send(item).await.is_err() || failed {
            return;
        }
    }
    debug!(lines = line_no, "replay exhausted");
}
