use thiserror::Error;

/// Rejected configuration; raised before any watch begins.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown value for poll-until: {0:?} (expected known, current, deleted or forever)")]
    UnknownPolicy(String),
    #[error("invalid duration: {0:?}")]
    InvalidDuration(String),
    #[error("poll period must be greater than zero")]
    ZeroPollPeriod,
}

/// Failure of the event producer itself. Fatal to the watch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("cannot decode event at line {line}: {message}")]
    Decode { line: usize, message: String },
}

/// Rendering failure. Reported to the caller, never aborts the watch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("write failed: {0}")]
    Io(String),
    #[error("encode failed: {0}")]
    Encode(String),
}

impl From<std::io::Error> for SinkError {
    fn from(e: std::io::Error) -> Self {
        SinkError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for SinkError {
    fn from(e: serde_json::Error) -> Self {
        SinkError::Encode(e.to_string())
    }
}

/// Outcomes that end a watch abnormally, as opposed to a stop decided by
/// policy, deadline or interrupt.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("event stream failed: {0}")]
    Stream(#[source] SourceError),
}
