//! Group command handlers.
//!
//! Every handler takes the registry explicitly, applies one command and
//! returns the reply text. Business-rule failures (unknown group, private
//! group, oversized broadcast) are replies too; nothing here returns an
//! error.

use std::ops::Range;

use tracing::{debug, error, info};

use crate::config::BotConfig;
use crate::group::{Group, GroupAccess, GroupList, Member, SeenNames};

use super::context::RequestContext;

/// Default character limit for a broadcast message.
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 4000;

/// Reply used when a broadcast would be too long for the transport.
pub const MESSAGE_TOO_LONG: &str =
    "My apologies, your message with the group added would exceed Google Chat's character limit. :(";

/// Reply used when there is nothing to list.
pub const NO_GROUPS: &str = "There are no groups to show currently. :(";

/// Executes group commands on behalf of the bot.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    bot_name: String,
    max_message_length: usize,
}

impl CommandEngine {
    /// Create an engine for the bot invoked as `bot_name`.
    pub fn new(bot_name: impl Into<String>) -> Self {
        Self {
            bot_name: bot_name.into(),
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
        }
    }

    /// Create an engine from the bot configuration.
    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(&config.name).with_max_message_length(config.max_message_length)
    }

    /// Set the broadcast character limit.
    pub fn with_max_message_length(mut self, max: usize) -> Self {
        self.max_message_length = max;
        self
    }

    /// The bot invocation token.
    pub fn bot_name(&self) -> &str {
        &self.bot_name
    }

    /// The broadcast character limit.
    pub fn max_message_length(&self) -> usize {
        self.max_message_length
    }

    /// Create a group seeded with the mentioned users.
    pub fn create(&self, groups: &mut GroupList, group_name: &str, ctx: &RequestContext) -> String {
        let (_, access) = groups.check_group(group_name, &ctx.room_id);
        if access.exists() {
            return format!(
                "Group {group_name:?} seems to already exist.\n\
                 If you'd like to remove and recreate the group please say \
                 \"{bot} delete {group_name}\" followed by \"{bot} create {group_name} @Members...\"",
                bot = self.bot_name
            );
        }

        let mut group = Group::new(groups.next_id(), group_name);
        let mut seen = SeenNames::new();
        let mut added = Vec::new();

        for mention in &ctx.mentions {
            if seen.seen(&mention.target.name) {
                continue;
            }
            if mention.is_member_candidate() && group.add_member(Member::from(&mention.target)) {
                added.push(mention.target.name.as_str());
            }
        }

        let (id, members) = (group.id(), group.members().len());
        if let Err(e) = groups.insert(group) {
            error!(group = %group_name, "Failed to register group: {}", e);
            return format!("Sorry, I couldn't create the group {group_name:?}.");
        }
        info!(group = %group_name, id, members, "Group created");

        if added.is_empty() {
            format!("Created group {group_name:?} with no members yet.")
        } else {
            format!(
                "Created group {group_name:?} with user(s) {}",
                added.join(", ")
            )
        }
    }

    /// Delete a group and all of its data.
    pub fn delete(&self, groups: &mut GroupList, group_name: &str, ctx: &RequestContext) -> String {
        let (key, access) = groups.check_group(group_name, &ctx.room_id);
        if let Some(reply) = mutation_gate(group_name, access) {
            return reply;
        }

        if let Some(group) = groups.remove(&key) {
            info!(group = %group.name(), id = group.id(), "Group deleted");
        }
        format!("Group {group_name:?} has been deleted, along with all its data. This cannot be undone.")
    }

    /// Add the mentioned users to a group.
    pub fn add_members(
        &self,
        groups: &mut GroupList,
        group_name: &str,
        ctx: &RequestContext,
    ) -> String {
        let (key, access) = groups.check_group(group_name, &ctx.room_id);
        if let Some(reply) = mutation_gate(group_name, access) {
            return reply;
        }
        let Some(group) = groups.get_mut(&key) else {
            return not_found(group_name);
        };

        let mut seen = SeenNames::new();
        let mut added = Vec::new();
        let mut existing = Vec::new();

        for mention in ctx.mentions.iter().filter(|m| !seen.seen(&m.target.name)) {
            if !mention.is_member_candidate() {
                continue;
            }
            if group.add_member(Member::from(&mention.target)) {
                added.push(mention.target.name.as_str());
            } else {
                existing.push(mention.target.name.as_str());
            }
        }

        debug!(group = %group.name(), added = added.len(), existing = existing.len(), "Members added");

        let mut clauses = Vec::new();
        if !added.is_empty() {
            clauses.push(format!(
                "Got [ {} ] added to the group {group_name:?}.",
                added.join(" ")
            ));
        }
        if !existing.is_empty() {
            clauses.push(format!(
                "User(s) [ {} ] already added to the group {group_name:?}.",
                existing.join(" ")
            ));
        }
        if clauses.is_empty() {
            return format!("I didn't see any users mentioned to add to {group_name:?}.");
        }
        clauses.join("\n")
    }

    /// Remove the mentioned users from a group.
    pub fn remove_members(
        &self,
        groups: &mut GroupList,
        group_name: &str,
        ctx: &RequestContext,
    ) -> String {
        let (key, access) = groups.check_group(group_name, &ctx.room_id);
        if let Some(reply) = mutation_gate(group_name, access) {
            return reply;
        }
        let Some(group) = groups.get_mut(&key) else {
            return not_found(group_name);
        };

        let mut seen = SeenNames::new();
        let mut removed = Vec::new();
        let mut missing = Vec::new();

        for mention in ctx.mentions.iter().filter(|m| !seen.seen(&m.target.name)) {
            if !mention.is_member_candidate() {
                continue;
            }
            if group.remove_member(&mention.target.chat_id) > 0 {
                removed.push(mention.target.name.as_str());
            } else {
                missing.push(mention.target.name.as_str());
            }
        }

        debug!(group = %group.name(), removed = removed.len(), missing = missing.len(), "Members removed");

        let mut clauses = Vec::new();
        if !removed.is_empty() {
            clauses.push(format!(
                "I've removed [ {} ] from {group_name:?}.",
                removed.join(" ")
            ));
        }
        if !missing.is_empty() {
            clauses.push(format!(
                "User(s) [ {} ] didn't seem to exist when attempting to remove them from {group_name:?}.",
                missing.join(" ")
            ));
        }
        if clauses.is_empty() {
            return format!("I didn't see any users mentioned to remove from {group_name:?}.");
        }
        clauses.join("\n")
    }

    /// Toggle whether a group is private to the requesting room.
    pub fn restrict(&self, groups: &mut GroupList, group_name: &str, ctx: &RequestContext) -> String {
        let (key, access) = groups.check_group(group_name, &ctx.room_id);
        if let Some(reply) = mutation_gate(group_name, access) {
            return reply;
        }
        let Some(group) = groups.get_mut(&key) else {
            return not_found(group_name);
        };

        if group.is_private() {
            group.make_public();
            info!(group = %group.name(), "Group made public");
            return format!("I've set {group_name:?} to public, now it can be used in any room.");
        }

        if ctx.room_id.is_empty() {
            return format!(
                "I can't tell which room this is, so {group_name:?} can't be made private from here."
            );
        }

        group.restrict_to(&ctx.room_id);
        info!(group = %group.name(), room = %ctx.room_id, "Group made private");
        format!("I've set {group_name:?} to be private, the group can only be used in this room now.")
    }

    /// Broadcast the message to every member of a group.
    ///
    /// The command text (bot token through group name) is replaced by the
    /// members' mention markup and the result is attributed to the sender.
    pub fn notify(&self, groups: &GroupList, group_name: &str, ctx: &RequestContext) -> String {
        let (key, access) = groups.check_group(group_name, &ctx.room_id);
        match access {
            GroupAccess::Missing => return not_found(group_name),
            GroupAccess::Forbidden => {
                return format!("The group {group_name:?} is private, and you may not use it.")
            }
            GroupAccess::Accessible => {}
        }
        let Some(group) = groups.get(&key) else {
            return not_found(group_name);
        };

        let mentions = group.mention_list();
        let text = &ctx.text;
        let body = match ctx
            .valid_command_span()
            .or_else(|| locate_command_span(text, &self.bot_name, group_name))
        {
            Some(span) => format!("{}{}{}", &text[..span.start], mentions, &text[span.end..]),
            None => format!("{mentions}{text}"),
        };

        let message = format!("{} said:\n\n{}", ctx.sender_name, body);
        if message.chars().count() >= self.max_message_length {
            debug!(group = %group.name(), "Broadcast exceeds message limit");
            return MESSAGE_TOO_LONG.to_string();
        }
        message
    }

    /// List visible groups, or show one group's details.
    pub fn list(&self, groups: &GroupList, group_name: &str, ctx: &RequestContext) -> String {
        if group_name.is_empty() {
            return self.list_all(groups, ctx);
        }

        let (key, access) = groups.check_group(group_name, &ctx.room_id);
        match access {
            GroupAccess::Missing => return not_found(group_name),
            GroupAccess::Forbidden => {
                return format!("The group {group_name:?} is private, and you may not view it.")
            }
            GroupAccess::Accessible => {}
        }
        let Some(group) = groups.get(&key) else {
            return not_found(group_name);
        };

        match serde_json::to_string_pretty(group) {
            Ok(details) => format!("Here are details for {group_name:?}: ```{details}```"),
            Err(e) => {
                error!(group = %group.name(), "Failed to serialize group details: {}", e);
                format!("Sorry, I couldn't render the details for {group_name:?}.")
            }
        }
    }

    fn list_all(&self, groups: &GroupList, ctx: &RequestContext) -> String {
        let visible: Vec<&str> = groups
            .sorted_by_id()
            .into_iter()
            .filter(|g| g.accessible_from(&ctx.room_id))
            .map(|g| g.name())
            .collect();

        if visible.is_empty() {
            return NO_GROUPS.to_string();
        }

        format!(
            "Here are all of the usable group names: ```{}``` If the group is private, \
             it will not appear in this list. Ask me about a specific group for more \
             information. ( {} list groupName )",
            visible.join(" | "),
            self.bot_name
        )
    }
}

/// Find the span from the first bot token through the first occurrence of
/// the group name after it.
pub fn locate_command_span(text: &str, bot_name: &str, group_name: &str) -> Option<Range<usize>> {
    if bot_name.is_empty() || group_name.is_empty() {
        return None;
    }
    let bot_start = text.find(bot_name)?;
    let after_bot = bot_start + bot_name.len();
    let group_offset = text[after_bot..].find(group_name)?;
    Some(bot_start..after_bot + group_offset + group_name.len())
}

fn not_found(group_name: &str) -> String {
    format!("Group {group_name:?} does not seem to exist.")
}

/// Shared existence/privacy check for commands that change a group.
fn mutation_gate(group_name: &str, access: GroupAccess) -> Option<String> {
    match access {
        GroupAccess::Missing => Some(not_found(group_name)),
        GroupAccess::Forbidden => Some(format!(
            "The group {group_name:?} is private, and you may not mutate it."
        )),
        GroupAccess::Accessible => None,
    }
}
