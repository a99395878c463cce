use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of one watched cluster resource.
///
/// Field order doubles as the sort order, so snapshots and renderings list
/// resources grouped by API group and kind.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceId {
    #[serde(default)]
    pub group: String,
    pub kind: String,
    #[serde(default)]
    pub namespace: String,
    pub name: String,
}

impl ResourceId {
    pub fn new(
        group: impl Into<String>,
        kind: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            kind: kind.into(),
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}/{}", self.group, self.kind, self.namespace, self.name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid resource id {0:?}: expected group/kind/namespace/name")]
pub struct ParseResourceIdError(pub String);

impl FromStr for ResourceId {
    type Err = ParseResourceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [group, kind, namespace, name] if !kind.is_empty() && !name.is_empty() => {
                Ok(Self::new(*group, *kind, *namespace, *name))
            }
            _ => Err(ParseResourceIdError(s.to_string())),
        }
    }
}

/// Fixed set of identifiers observed by one watch. Built once, never mutated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WatchSet(BTreeSet<ResourceId>);

impl WatchSet {
    pub fn new(ids: impl IntoIterator<Item = ResourceId>) -> Self {
        Self(ids.into_iter().collect())
    }

    pub fn contains(&self, id: &ResourceId) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceId> {
        self.0.iter()
    }
}

impl FromIterator<ResourceId> for WatchSet {
    fn from_iter<T: IntoIterator<Item = ResourceId>>(iter: T) -> Self {
        Self::new(iter)
    }
}
