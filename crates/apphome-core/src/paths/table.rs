//! Role-indexed table of resolved directories.

use std::ops::Index;
use std::path::{Path, PathBuf};

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::PathRole;

/// Resolved absolute directory for every [`PathRole`].
///
/// Built once during initialization and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTable {
    entries: [PathBuf; PathRole::COUNT],
}

impl PathTable {
    pub(crate) fn from_fn(mut resolve: impl FnMut(PathRole) -> PathBuf) -> Self {
        Self {
            entries: PathRole::ALL.map(&mut resolve),
        }
    }

    pub fn get(&self, role: PathRole) -> &Path {
        &self.entries[role.index()]
    }

    /// Iterate `(role, path)` pairs in role order.
    pub fn iter(&self) -> impl Iterator<Item = (PathRole, &Path)> {
        PathRole::ALL
            .into_iter()
            .zip(self.entries.iter().map(PathBuf::as_path))
    }
}

impl Index<PathRole> for PathTable {
    type Output = Path;

    fn index(&self, role: PathRole) -> &Path {
        self.get(role)
    }
}

impl std::fmt::Display for PathTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (role, path) in self.iter() {
            writeln!(f, "{role} = {}", path.display())?;
        }
        Ok(())
    }
}

impl Serialize for PathTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(PathRole::COUNT))?;
        for (role, path) in self.iter() {
            map.serialize_entry(role.as_str(), &path.to_string_lossy())?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PathTable {
        PathTable::from_fn(|role| PathBuf::from("/root").join(role.as_str()))
    }

    #[test]
    fn index_matches_get() {
        let table = sample();
        for role in PathRole::ALL {
            assert_eq!(&table[role], table.get(role));
            assert!(table[role].ends_with(role.as_str()));
        }
    }

    #[test]
    fn display_lists_every_role() {
        let output = sample().to_string();
        assert_eq!(output.lines().count(), PathRole::COUNT);
        assert!(output.contains("bundles = /root/bundles"));
        assert!(output.contains("temp = /root/temp"));
    }

    #[test]
    fn serializes_as_role_keyed_map() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["file_lists"], "/root/file_lists");
        assert_eq!(json.as_object().unwrap().len(), PathRole::COUNT);
    }
}
