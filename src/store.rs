//! JSON snapshot storage for the group registry.
//!
//! The registry lives in memory; this store writes the whole registry to a
//! single JSON file after each change and reads it back on startup. Unlike
//! the detail view, snapshots include each group's privacy room.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::group::{Group, GroupList, Member};
use crate::{Result, RollcallError};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    version: u32,
    saved_at: DateTime<Utc>,
    groups: Vec<GroupRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupRecord {
    id: u64,
    group_name: String,
    #[serde(default)]
    members: Vec<Member>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    privacy_room_id: Option<String>,
}

impl From<&Group> for GroupRecord {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id(),
            group_name: group.name().to_string(),
            members: group.members().to_vec(),
            privacy_room_id: group.privacy_room().map(str::to_string),
        }
    }
}

impl TryFrom<GroupRecord> for Group {
    type Error = RollcallError;

    fn try_from(record: GroupRecord) -> Result<Self> {
        let mut group = Group::new(record.id, record.group_name);
        for member in record.members {
            let chat_id = member.chat_id.clone();
            if !group.add_member(member) {
                return Err(RollcallError::Storage(format!(
                    "duplicate member {chat_id:?} in group {:?}",
                    group.name()
                )));
            }
        }
        if let Some(room) = record.privacy_room_id {
            group.restrict_to(room);
        }
        Ok(group)
    }
}

/// File-backed snapshot store.
#[derive(Debug, Clone)]
pub struct GroupStore {
    path: PathBuf,
}

impl GroupStore {
    /// Create a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the registry.
    ///
    /// A missing file yields an empty registry.
    pub fn load(&self) -> Result<GroupList> {
        if !self.path.exists() {
            info!("No group snapshot at {}, starting empty", self.path.display());
            return Ok(GroupList::new());
        }

        let content = fs::read_to_string(&self.path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(RollcallError::Storage(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }

        let mut groups = GroupList::new();
        for record in snapshot.groups {
            groups
                .insert(Group::try_from(record)?)
                .map_err(|e| match e {
                    RollcallError::Validation(msg) => RollcallError::Storage(msg),
                    other => other,
                })?;
        }

        info!(
            groups = groups.len(),
            "Loaded group snapshot from {}",
            self.path.display()
        );
        Ok(groups)
    }

    /// Write the registry, replacing the previous snapshot.
    ///
    /// Writes to a sibling temporary file first and renames it into place.
    pub fn save(&self, groups: &GroupList) -> Result<()> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            groups: groups
                .sorted_by_id()
                .into_iter()
                .map(GroupRecord::from)
                .collect(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.temp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        debug!(groups = groups.len(), "Saved group snapshot");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_round_trip_keeps_privacy() {
        let mut group = Group::new(4, "Eng");
        group.add_member(Member::new("Alice", "users/1"));
        group.restrict_to("spaces/A");

        let record = GroupRecord::from(&group);
        assert_eq!(record.privacy_room_id.as_deref(), Some("spaces/A"));

        let restored = Group::try_from(record).unwrap();
        assert_eq!(restored, group);
    }

    #[test]
    fn test_record_with_duplicate_member_rejected() {
        let record = GroupRecord {
            id: 1,
            group_name: "Eng".to_string(),
            members: vec![
                Member::new("Alice", "users/1"),
                Member::new("Alice", "users/1"),
            ],
            privacy_room_id: None,
        };

        let err = Group::try_from(record).unwrap_err();
        assert!(matches!(err, RollcallError::Storage(_)));
        assert!(err.to_string().contains("users/1"));
    }

    #[test]
    fn test_record_json_shape() {
        let group = Group::new(1, "Eng");
        let value = serde_json::to_value(GroupRecord::from(&group)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "id": 1, "groupName": "Eng", "members": [] })
        );
    }

    #[test]
    fn test_temp_path() {
        let store = GroupStore::new("data/groups.json");
        assert_eq!(store.temp_path(), PathBuf::from("data/groups.json.tmp"));
    }
}
