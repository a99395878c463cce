use crate::model::{ResourceStatus, Status};

/// Folds a set of records into a single status for the whole fleet.
///
/// Without a target the result is the most severe status present (see the
/// ordering on [`Status`]). With a target the result is the target only when
/// every record has reached it; otherwise it is the most severe status among
/// the records that have not, so callers decide convergence with one
/// equality check.
///
/// An empty set is vacuously converged when a target is given and `Unknown`
/// otherwise.
pub fn aggregate_status(records: &[ResourceStatus], target: Option<Status>) -> Status {
    aggregate_statuses(records.iter().map(|r| r.status), target)
}

pub fn aggregate_statuses(statuses: impl IntoIterator<Item = Status>, target: Option<Status>) -> Status {
    match target {
        None => statuses.into_iter().max().unwrap_or(Status::Unknown),
        Some(target) => statuses
            .into_iter()
            .filter(|s| *s != target)
            .max()
            .unwrap_or(target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ResourceId;

    fn records(statuses: &[(&str, Status)]) -> Vec<ResourceStatus> {
        statuses
            .iter()
            .map(|(name, st)| ResourceStatus {
                id: ResourceId::new("", "Pod", "default", *name),
                status: *st,
                message: None,
                error: None,
                updated_at_ms: 1,
            })
            .collect()
    }

    #[test]
    fn failed_outranks_unknown_without_target() {
        let rs = records(&[("a", Status::Failed), ("b", Status::Current), ("c", Status::Unknown)]);
        assert_eq!(aggregate_status(&rs, None), Status::Failed);
    }

    #[test]
    fn unknown_outranks_progress_without_target() {
        let rs = records(&[("a", Status::InProgress), ("b", Status::Unknown), ("c", Status::Terminating)]);
        assert_eq!(aggregate_status(&rs, None), Status::Unknown);
    }

    #[test]
    fn converged_only_when_all_match_target() {
        let rs = records(&[("a", Status::Current), ("b", Status::Current)]);
        assert_eq!(aggregate_status(&rs, Some(Status::Current)), Status::Current);

        let rs = records(&[("a", Status::Current), ("b", Status::InProgress)]);
        assert_eq!(aggregate_status(&rs, Some(Status::Current)), Status::InProgress);
    }

    #[test]
    fn target_weaker_than_others_is_not_masked() {
        // NotFound is the weakest status, Current must still win over it
        // when the target is NotFound.
        let rs = records(&[("a", Status::NotFound), ("b", Status::Current)]);
        assert_eq!(aggregate_status(&rs, Some(Status::NotFound)), Status::Current);
    }

    #[test]
    fn target_does_not_hide_more_severe_statuses() {
        let rs = records(&[("a", Status::Failed), ("b", Status::Failed), ("c", Status::Current)]);
        assert_eq!(aggregate_status(&rs, Some(Status::Failed)), Status::Current);
        let rs = records(&[("a", Status::Failed), ("b", Status::Unknown), ("c", Status::Current)]);
        assert_eq!(aggregate_status(&rs, Some(Status::Current)), Status::Failed);
    }

    #[test]
    fn empty_set() {
        assert_eq!(aggregate_status(&[], None), Status::Unknown);
        assert_eq!(aggregate_status(&[], Some(Status::Current)), Status::Current);
        assert_eq!(aggregate_status(&[], Some(Status::NotFound)), Status::NotFound);
    }
}
