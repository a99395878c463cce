use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ids::ResourceId, time::EpochMs};

/// Observed status of a single resource.
///
/// Variants are declared from weakest to most severe, so the derived `Ord`
/// is the aggregation precedence: a fleet is only as converged as its worst
/// member, and a definite failure outranks a status nobody has seen yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    NotFound,
    Current,
    InProgress,
    Terminating,
    Unknown,
    Failed,
}

impl Status {
    pub const ALL: [Status; 6] = [
        Status::NotFound,
        Status::Current,
        Status::InProgress,
        Status::Terminating,
        Status::Unknown,
        Status::Failed,
    ];

    pub fn severity(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::NotFound => "NotFound",
            Status::Current => "Current",
            Status::InProgress => "InProgress",
            Status::Terminating => "Terminating",
            Status::Unknown => "Unknown",
            Status::Failed => "Failed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown status {0:?}")]
pub struct ParseStatusError(pub String);

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// Latest known observation for one watched resource. Replaced, never
/// appended, when a newer observation arrives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceStatus {
    pub id: ResourceId,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Observation error for this resource only; never fatal to the watch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub updated_at_ms: EpochMs,
}

impl ResourceStatus {
    /// Placeholder for a watched identifier with no observation yet.
    pub fn unobserved(id: ResourceId) -> Self {
        Self {
            id,
            status: Status::Unknown,
            message: None,
            error: None,
            updated_at_ms: 0,
        }
    }
}

/// One item of the producer's ordered event stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    ResourceUpdate {
        id: ResourceId,
        status: Status,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    ResourceError {
        id: ResourceId,
        error: String,
    },
    StreamClosed,
}

impl Event {
    pub fn update(id: ResourceId, status: Status) -> Self {
        Event::ResourceUpdate {
            id,
            status,
            message: None,
        }
    }

    pub fn resource_id(&self) -> Option<&ResourceId> {
        match self {
            Event::ResourceUpdate { id, .. } | Event::ResourceError { id, .. } => Some(id),
            Event::StreamClosed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_order_is_pinned() {
        let mut all = Status::ALL.to_vec();
        all.sort();
        assert_eq!(
            all,
            vec![
                Status::NotFound,
                Status::Current,
                Status::InProgress,
                Status::Terminating,
                Status::Unknown,
                Status::Failed,
            ]
        );
        assert!(Status::Failed.severity() > Status::Unknown.severity());
    }

    #[test]
    fn status_names_round_trip_through_from_str() {
        for st in Status::ALL {
            assert_eq!(st.as_str().parse::<Status>(), Ok(st));
        }
        assert!("current".parse::<Status>().is_err());
    }

    #[test]
    fn event_wire_format() {
        let ev = Event::update(ResourceId::new("apps", "Deployment", "default", "web"), Status::Current);
        let json = serde_json::to_string(&ev).unwrap();
        assert_eq!(
            json,
            r#"{"type":"resource_update","id":{"group":"apps","kind":"Deployment","namespace":"default","name":"web"},"status":"Current"}"#
        );

        let closed: Event = serde_json::from_str(r#"{"type":"stream_closed"}"#).unwrap();
        assert_eq!(closed, Event::StreamClosed);
    }
}
