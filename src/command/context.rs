//! Inbound request context handed to the command handlers.

use std::ops::Range;

/// Kind of chat account a mention points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserKind {
    /// A human user.
    Human,
    /// A bot account (including this bot).
    Bot,
}

/// Kind of mention annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentionKind {
    /// A direct `@user` mention.
    User,
    /// Any other annotation that references a user (slash commands, links).
    Other,
}

/// A chat user referenced by a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatUser {
    /// Display name.
    pub name: String,
    /// Platform chat identifier.
    pub chat_id: String,
    /// Account kind.
    pub kind: UserKind,
}

impl ChatUser {
    /// Create a human user.
    pub fn human(name: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chat_id: chat_id.into(),
            kind: UserKind::Human,
        }
    }

    /// Create a bot user.
    pub fn bot(name: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chat_id: chat_id.into(),
            kind: UserKind::Bot,
        }
    }
}

/// A mention found in the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention {
    /// Mentioned user.
    pub target: ChatUser,
    /// Annotation kind.
    pub kind: MentionKind,
}

impl Mention {
    /// Direct mention of `target`.
    pub fn user(target: ChatUser) -> Self {
        Self {
            target,
            kind: MentionKind::User,
        }
    }

    /// Non-mention annotation referencing `target`.
    pub fn other(target: ChatUser) -> Self {
        Self {
            target,
            kind: MentionKind::Other,
        }
    }

    /// Whether this mention names a human that may become a group member.
    pub fn is_member_candidate(&self) -> bool {
        self.kind == MentionKind::User && self.target.kind == UserKind::Human
    }
}

/// Everything a command handler knows about the inbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Sender's display name.
    pub sender_name: String,
    /// Identifier of the room the message came from.
    pub room_id: String,
    /// Raw message text.
    pub text: String,
    /// Mentions in message order.
    pub mentions: Vec<Mention>,
    /// Byte range of the bot token through the group-name token, when known.
    pub command_span: Option<Range<usize>>,
}

impl RequestContext {
    /// Create a context without mentions.
    pub fn new(
        sender_name: impl Into<String>,
        room_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            sender_name: sender_name.into(),
            room_id: room_id.into(),
            text: text.into(),
            mentions: Vec::new(),
            command_span: None,
        }
    }

    /// Append a mention.
    pub fn with_mention(mut self, mention: Mention) -> Self {
        self.mentions.push(mention);
        self
    }

    /// Replace all mentions.
    pub fn with_mentions(mut self, mentions: Vec<Mention>) -> Self {
        self.mentions = mentions;
        self
    }

    /// Set the command span.
    pub fn with_command_span(mut self, span: Range<usize>) -> Self {
        self.command_span = Some(span);
        self
    }

    /// The command span if it lies on character boundaries inside the text.
    pub fn valid_command_span(&self) -> Option<Range<usize>> {
        let span = self.command_span.clone()?;
        let valid = span.start <= span.end
            && span.end <= self.text.len()
            && self.text.is_char_boundary(span.start)
            && self.text.is_char_boundary(span.end);
        valid.then_some(span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_candidate_filter() {
        assert!(Mention::user(ChatUser::human("Alice", "users/1")).is_member_candidate());
        assert!(!Mention::user(ChatUser::bot("rollcall", "users/bot")).is_member_candidate());
        assert!(!Mention::other(ChatUser::human("Alice", "users/1")).is_member_candidate());
    }

    #[test]
    fn test_builder() {
        let ctx = RequestContext::new("Bob", "spaces/A", "@rollcall list")
            .with_mention(Mention::user(ChatUser::human("Alice", "users/1")))
            .with_command_span(0..9);

        assert_eq!(ctx.sender_name, "Bob");
        assert_eq!(ctx.room_id, "spaces/A");
        assert_eq!(ctx.mentions.len(), 1);
        assert_eq!(ctx.command_span, Some(0..9));
    }

    #[test]
    fn test_valid_command_span() {
        let ctx = RequestContext::new("Bob", "spaces/A", "héllo").with_command_span(0..2);
        // Byte 2 is inside 'é'.
        assert_eq!(ctx.valid_command_span(), None);

        let ctx = ctx.with_command_span(0..3);
        assert_eq!(ctx.valid_command_span(), Some(0..3));

        let ctx = ctx.with_command_span(2..40);
        assert_eq!(ctx.valid_command_span(), None);

        let ctx = RequestContext::new("Bob", "spaces/A", "text");
        assert_eq!(ctx.valid_command_span(), None);
    }
}
