use std::collections::BTreeMap;

use crate::{
    ids::{ResourceId, WatchSet},
    model::{ResourceStatus, Status},
    time::now_ms,
};

/// Latest known status per watched identifier.
///
/// Owned by the engine's control loop; readers get a [`Snapshot`] copy and
/// never hold a reference into the store.
#[derive(Clone, Debug)]
pub struct StatusStore {
    watch_set: WatchSet,
    records: BTreeMap<ResourceId, ResourceStatus>,
}

impl StatusStore {
    pub fn new(watch_set: WatchSet) -> Self {
        Self {
            watch_set,
            records: BTreeMap::new(),
        }
    }

    pub fn watch_set(&self) -> &WatchSet {
        &self.watch_set
    }

    /// Replaces the record for `id` and returns the status it had before
    /// (`Unknown` when it was never observed). Identifiers outside the watch
    /// set are ignored and yield `None`.
    pub fn update(&mut self, id: &ResourceId, status: Status, message: Option<String>) -> Option<Status> {
        self.put(ResourceStatus {
            id: id.clone(),
            status,
            message,
            error: None,
            updated_at_ms: now_ms(),
        })
    }

    /// Records a per-resource observation error. The resource's status
    /// becomes `Unknown` and the error is kept as its detail.
    pub fn record_error(&mut self, id: &ResourceId, error: impl Into<String>) -> Option<Status> {
        self.put(ResourceStatus {
            id: id.clone(),
            status: Status::Unknown,
            message: None,
            error: Some(error.into()),
            updated_at_ms: now_ms(),
        })
    }

    fn put(&mut self, record: ResourceStatus) -> Option<Status> {
        if !self.watch_set.contains(&record.id) {
            return None;
        }
        let previous = self
            .records
            .insert(record.id.clone(), record)
            .map(|r| r.status)
            .unwrap_or(Status::Unknown);
        Some(previous)
    }

    pub fn get(&self, id: &ResourceId) -> Option<&ResourceStatus> {
        self.records.get(id)
    }

    /// Number of identifiers with at least one observation.
    pub fn observed(&self) -> usize {
        self.records.len()
    }

    /// Read-consistent copy with one record per watched identifier;
    /// unobserved identifiers appear as `Unknown`.
    pub fn snapshot(&self) -> Snapshot {
        let records = self
            .watch_set
            .iter()
            .map(|id| {
                self.records
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| ResourceStatus::unobserved(id.clone()))
            })
            .collect();
        Snapshot { records }
    }
}

/// Immutable view of the store, ordered by identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct Snapshot {
    pub records: Vec<ResourceStatus>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &ResourceId) -> Option<&ResourceStatus> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn statuses(&self) -> impl Iterator<Item = Status> + '_ {
        self.records.iter().map(|r| r.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> ResourceId {
        ResourceId::new("apps", "Deployment", "default", name)
    }

    fn store(names: &[&str]) -> StatusStore {
        StatusStore::new(names.iter().map(|n| id(n)).collect())
    }

    #[test]
    fn update_returns_previous_status() {
        let mut s = store(&["a"]);
        assert_eq!(s.update(&id("a"), Status::InProgress, None), Some(Status::Unknown));
        assert_eq!(s.update(&id("a"), Status::Current, None), Some(Status::InProgress));
        assert_eq!(s.get(&id("a")).unwrap().status, Status::Current);
    }

    #[test]
    fn last_write_wins_per_identifier() {
        let mut s = store(&["a", "b"]);
        s.update(&id("a"), Status::InProgress, None);
        s.update(&id("b"), Status::Failed, Some("crashloop".into()));
        s.update(&id("a"), Status::Current, None);
        s.update(&id("b"), Status::InProgress, None);

        assert_eq!(s.observed(), 2);
        let snap = s.snapshot();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap.get(&id("a")).unwrap().status, Status::Current);
        let b = snap.get(&id("b")).unwrap();
        assert_eq!(b.status, Status::InProgress);
        assert_eq!(b.message, None);
    }

    #[test]
    fn snapshot_reports_unobserved_as_unknown() {
        let mut s = store(&["a", "b"]);
        s.update(&id("a"), Status::Current, None);
        let snap = s.snapshot();
        assert_eq!(snap.get(&id("b")).unwrap().status, Status::Unknown);
        assert_eq!(snap.get(&id("b")).unwrap().updated_at_ms, 0);
    }

    #[test]
    fn ignores_identifiers_outside_watch_set() {
        let mut s = store(&["a"]);
        assert_eq!(s.update(&id("zzz"), Status::Current, None), None);
        assert_eq!(s.observed(), 0);
        assert_eq!(s.snapshot().len(), 1);
    }

    #[test]
    fn error_becomes_unknown_with_detail_and_is_cleared_by_update() {
        let mut s = store(&["a"]);
        s.update(&id("a"), Status::Current, None);
        assert_eq!(s.record_error(&id("a"), "forbidden"), Some(Status::Current));
        let rec = s.get(&id("a")).unwrap();
        assert_eq!(rec.status, Status::Unknown);
        assert_eq!(rec.error.as_deref(), Some("forbidden"));

        s.update(&id("a"), Status::Current, None);
        assert_eq!(s.get(&id("a")).unwrap().error, None);
    }

    #[test]
    fn snapshot_is_detached_from_later_updates() {
        let mut s = store(&["a"]);
        s.update(&id("a"), Status::InProgress, None);
        let before = s.snapshot();
        s.update(&id("a"), Status::Current, None);
        assert_eq!(before.get(&id("a")).unwrap().status, Status::InProgress);
    }
}
