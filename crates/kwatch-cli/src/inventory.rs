use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use kwatch_core::{ResourceId, WatchSet};
use serde::Deserialize;

/// Inventory file: either a bare list or `{ resources: [...] }`. Entries are
/// `group/kind/namespace/name` strings or mappings with those fields.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InventoryFile {
    List(Vec<Entry>),
    Doc { resources: Vec<Entry> },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Entry {
    Text(String),
    Fields(ResourceId),
}

/// Loads the watch set from `path`, or from stdin when no path is given or
/// the path is `-`.
pub fn load(path: Option<&Path>) -> Result<WatchSet> {
    match path {
        Some(path) if path != Path::new("-") => {
            let raw = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
            parse(&raw).with_context(|| format!("parse inventory {}", path.display()))
        }
        _ => read_from(std::io::stdin().lock()),
    }
}

pub fn read_from(mut reader: impl Read) -> Result<WatchSet> {
    let mut raw = String::new();
    reader.read_to_string(&mut raw).context("read inventory from stdin")?;
    parse(&raw).context("parse inventory from stdin")
}

pub fn parse(raw: &str) -> Result<WatchSet> {
    if raw.trim().is_empty() {
        return Ok(WatchSet::default());
    }
    let file: InventoryFile = serde_yaml::from_str(raw)?;
    let entries = match file {
        InventoryFile::List(e) | InventoryFile::Doc { resources: e } => e,
    };
    entries
        .into_iter()
        .map(|e| match e {
            Entry::Text(s) => s.parse::<ResourceId>().map_err(anyhow::Error::from),
            Entry::Fields(id) => Ok(id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_string_and_mapping_entries() {
        let set = parse(
            r#"
resources:
  - apps/Deployment/default/web
  - kind: ConfigMap
    namespace: default
    name: settings
"#,
        )
        .unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&ResourceId::new("apps", "Deployment", "default", "web")));
        assert!(set.contains(&ResourceId::new("", "ConfigMap", "default", "settings")));
    }

    #[test]
    fn parses_bare_json_list() {
        let set = parse(r#"["apps/Deployment/default/web", "/Namespace//team-a"]"#).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn empty_inventory_is_empty_set() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("resources: []").unwrap().is_empty());
    }

    #[test]
    fn rejects_bad_ids() {
        assert!(parse("- not-an-id").is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.yaml");
        std::fs::write(&path, "- apps/Deployment/default/web\n").unwrap();
        assert_eq!(load(Some(&path)).unwrap().len(), 1);
        assert!(load(Some(&dir.path().join("missing.yaml"))).is_err());
    }

    #[test]
    fn reads_piped_inventory() {
        let piped = std::io::Cursor::new("resources:\n  - apps/Deployment/default/web\n  - /Service/default/web\n");
        let set = read_from(piped).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&ResourceId::new("", "Service", "default", "web")));

        assert!(read_from(std::io::Cursor::new("")).unwrap().is_empty());
        assert!(read_from(std::io::Cursor::new("- nope")).is_err());
    }
}
