use std::fmt;

use crate::{
    aggregate::aggregate_status,
    model::{Event, Status},
    store::Snapshot,
};

/// When a watch should stop on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminationPolicy {
    /// Stop once no watched resource is `Unknown`.
    AllKnown,
    /// Stop once every watched resource has the given status.
    ReachedStatus(Status),
    /// Never stop; only the deadline or an interrupt ends the watch.
    Forever,
}

impl TerminationPolicy {
    /// Returns true when the watch should stop now. Called after `last` has
    /// been folded into `snapshot`.
    pub fn evaluate(&self, snapshot: &Snapshot, _last: &Event) -> bool {
        self.is_satisfied(snapshot)
    }

    pub fn is_satisfied(&self, snapshot: &Snapshot) -> bool {
        match self {
            TerminationPolicy::AllKnown => !snapshot.statuses().any(|s| s == Status::Unknown),
            TerminationPolicy::ReachedStatus(desired) => {
                aggregate_status(&snapshot.records, Some(*desired)) == *desired
            }
            TerminationPolicy::Forever => false,
        }
    }

    /// Status the policy converges towards, used for the final aggregate.
    pub fn target(&self) -> Option<Status> {
        match self {
            TerminationPolicy::ReachedStatus(s) => Some(*s),
            TerminationPolicy::AllKnown | TerminationPolicy::Forever => None,
        }
    }
}

impl fmt::Display for TerminationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationPolicy::AllKnown => f.write_str("all-known"),
            TerminationPolicy::ReachedStatus(s) => write!(f, "reached-{s}"),
            TerminationPolicy::Forever => f.write_str("forever"),
        }
    }
}
