//! Group and member entities.
//!
//! A [`Group`] is a named alias for a set of chat users. Members are
//! snapshots taken when the user was added and do not follow renames.

use serde::{Deserialize, Serialize};

use crate::command::ChatUser;

/// A chat user held by a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Display name at the time the member was added.
    #[serde(rename = "memberName")]
    pub name: String,
    /// Platform chat identifier (e.g. `users/1234`).
    #[serde(rename = "gchatID")]
    pub chat_id: String,
}

impl Member {
    /// Create a new member.
    pub fn new(name: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chat_id: chat_id.into(),
        }
    }

    /// Mention markup understood by the chat platform.
    pub fn mention(&self) -> String {
        format!("<{}>", self.chat_id)
    }
}

impl From<&ChatUser> for Member {
    fn from(user: &ChatUser) -> Self {
        Self::new(&user.name, &user.chat_id)
    }
}

/// A named group of members.
///
/// Serializes to the detail-view shape (`id`, `groupName`, `members`);
/// the privacy room is not part of that shape. Identity and membership are
/// read-only from outside: the name is fixed at creation so the registry key
/// always matches it, and members only change through `add_member` and
/// `remove_member`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    id: u64,
    #[serde(rename = "groupName")]
    name: String,
    members: Vec<Member>,
    #[serde(skip)]
    privacy_room: Option<String>,
}

impl Group {
    /// Create a new public group without members.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            members: Vec::new(),
            privacy_room: None,
        }
    }

    /// Identifier, unique among live groups of a registry.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Display name as originally given.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in insertion order, without duplicate chat ids.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Lookup key for this group.
    pub fn key(&self) -> String {
        normalize(&self.name)
    }

    /// Whether the group is restricted to a single room.
    pub fn is_private(&self) -> bool {
        self.privacy_room.is_some()
    }

    /// Room the group is restricted to, if any.
    pub fn privacy_room(&self) -> Option<&str> {
        self.privacy_room.as_deref()
    }

    /// Restrict the group to `room_id`. An empty room id makes it public.
    pub fn restrict_to(&mut self, room_id: impl Into<String>) {
        let room_id = room_id.into();
        self.privacy_room = if room_id.is_empty() {
            None
        } else {
            Some(room_id)
        };
    }

    /// Make the group usable from any room.
    pub fn make_public(&mut self) {
        self.privacy_room = None;
    }

    /// Whether a request from `room_id` may use this group.
    pub fn accessible_from(&self, room_id: &str) -> bool {
        match &self.privacy_room {
            Some(room) => room == room_id,
            None => true,
        }
    }

    /// Whether a member with the given chat id is present.
    pub fn has_member(&self, chat_id: &str) -> bool {
        self.members.iter().any(|m| m.chat_id == chat_id)
    }

    /// Add a member unless one with the same chat id is already present.
    ///
    /// Returns true if the member was added.
    pub fn add_member(&mut self, member: Member) -> bool {
        if self.has_member(&member.chat_id) {
            return false;
        }
        self.members.push(member);
        true
    }

    /// Remove every member with the given chat id.
    ///
    /// Returns the number of entries removed.
    pub fn remove_member(&mut self, chat_id: &str) -> usize {
        let before = self.members.len();
        self.members.retain(|m| m.chat_id != chat_id);
        before - self.members.len()
    }

    /// Mention markup for every member, each followed by a space.
    pub fn mention_list(&self) -> String {
        self.members
            .iter()
            .map(|m| format!("{} ", m.mention()))
            .collect()
    }
}

/// Normalize a group name into its registry key.
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
}
