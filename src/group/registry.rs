//! Group registry.
//!
//! Maps normalized (lowercased) group names to groups. The registry is
//! plain owned state: whoever holds it passes it by reference to the
//! command handlers.

use std::collections::HashMap;

use crate::{Result, RollcallError};

use super::member::{normalize, Group};

/// Result of looking a group up from a particular room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupAccess {
    /// No group with that name.
    Missing,
    /// The group exists and may be used from the requesting room.
    Accessible,
    /// The group exists but is private to another room.
    Forbidden,
}

impl GroupAccess {
    /// Whether the group exists (accessible or not).
    pub fn exists(&self) -> bool {
        !matches!(self, GroupAccess::Missing)
    }

    /// Whether the group exists but is private to a different room.
    pub fn is_private(&self) -> bool {
        matches!(self, GroupAccess::Forbidden)
    }
}

/// Registry of named groups.
#[derive(Debug, Default, Clone)]
pub struct GroupList {
    groups: HashMap<String, Group>,
}

impl GroupList {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the registry has no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Look a group up by name (any casing).
    pub fn get(&self, name: &str) -> Option<&Group> {
        self.groups.get(&normalize(name))
    }

    /// Look a group up by name (any casing) for mutation.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Group> {
        self.groups.get_mut(&normalize(name))
    }

    /// Insert a group under its normalized name.
    ///
    /// Fails if a live group already has the same id or the same name in any
    /// casing; the registry is left unchanged in that case.
    pub fn insert(&mut self, group: Group) -> Result<()> {
        if self.groups.values().any(|g| g.id() == group.id()) {
            return Err(RollcallError::Validation(format!(
                "duplicate group id {}",
                group.id()
            )));
        }
        let key = group.key();
        if self.groups.contains_key(&key) {
            return Err(RollcallError::Validation(format!(
                "duplicate group name {:?}",
                group.name()
            )));
        }
        self.groups.insert(key, group);
        Ok(())
    }

    /// Remove a group by name (any casing).
    pub fn remove(&mut self, name: &str) -> Option<Group> {
        self.groups.remove(&normalize(name))
    }

    /// Iterate over all groups in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    /// All groups ordered by id.
    pub fn sorted_by_id(&self) -> Vec<&Group> {
        let mut groups: Vec<&Group> = self.groups.values().collect();
        groups.sort_by_key(|g| g.id());
        groups
    }

    /// Resolve a group name and check whether `room_id` may use it.
    ///
    /// Returns the normalized key along with the access status.
    pub fn check_group(&self, name: &str, room_id: &str) -> (String, GroupAccess) {
        let key = normalize(name);
        let access = match self.groups.get(&key) {
            None => GroupAccess::Missing,
            Some(group) if group.accessible_from(room_id) => GroupAccess::Accessible,
            Some(_) => GroupAccess::Forbidden,
        };
        (key, access)
    }

    /// Whether the named group has a member with `chat_id`.
    ///
    /// A missing group has no members.
    pub fn check_member(&self, name: &str, chat_id: &str) -> bool {
        self.get(name).is_some_and(|g| g.has_member(chat_id))
    }

    /// Identifier for the next group: one past the highest live id.
    pub fn next_id(&self) -> u64 {
        self.groups.values().map(|g| g.id()).max().map_or(1, |id| id + 1)
    }
}
