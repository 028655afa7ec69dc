//! Google Chat event and reply DTOs.

use serde::{Deserialize, Serialize};

use crate::command::{ChatUser, Mention, RequestContext};

/// Kind of event delivered to the webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// A message addressed to the bot.
    Message,
    /// The bot was added to a space.
    AddedToSpace,
    /// The bot was removed from a space.
    RemovedFromSpace,
    /// Anything else (card clicks, future event types).
    #[default]
    #[serde(other)]
    Unknown,
}

/// Kind of chat account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    /// Human user.
    Human,
    /// Bot account.
    Bot,
    /// Unspecified.
    #[default]
    #[serde(other)]
    Unknown,
}

/// A chat user as sent by the platform.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    /// Resource name, e.g. `users/1234`.
    #[serde(default)]
    pub name: String,
    /// Display name.
    #[serde(default)]
    pub display_name: String,
    /// Account kind.
    #[serde(rename = "type", default)]
    pub user_type: UserType,
}

impl From<&UserDto> for ChatUser {
    fn from(user: &UserDto) -> Self {
        match user.user_type {
            UserType::Bot => ChatUser::bot(&user.display_name, &user.name),
            UserType::Human | UserType::Unknown => ChatUser::human(&user.display_name, &user.name),
        }
    }
}

/// Annotation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnnotationType {
    /// `@user` mention.
    UserMention,
    /// Slash command invocation.
    SlashCommand,
    /// Any other annotation.
    #[default]
    #[serde(other)]
    Other,
}

/// User payload of an annotation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserMention {
    /// Mentioned user.
    #[serde(default)]
    pub user: UserDto,
}

/// A message annotation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Annotation kind.
    #[serde(rename = "type", default)]
    pub annotation_type: AnnotationType,
    /// Referenced user, when the annotation points at one.
    #[serde(default)]
    pub user_mention: Option<UserMention>,
}

/// A chat message.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    /// Full message text, including the bot mention.
    #[serde(default)]
    pub text: String,
    /// Sender.
    #[serde(default)]
    pub sender: Option<UserDto>,
    /// Annotations in message order.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// The space (room or DM) an event happened in.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceDto {
    /// Resource name, e.g. `spaces/AAAA`.
    #[serde(default)]
    pub name: String,
}

/// An event delivered to the webhook.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEvent {
    /// Event kind.
    #[serde(rename = "type", default)]
    pub event_type: EventType,
    /// Message, for message events.
    #[serde(default)]
    pub message: Option<MessageDto>,
    /// Space the event happened in.
    #[serde(default)]
    pub space: Option<SpaceDto>,
    /// Acting user.
    #[serde(default)]
    pub user: Option<UserDto>,
}

impl ChatEvent {
    /// Build the command context for a message event.
    ///
    /// Returns None when the event carries no message.
    pub fn to_request_context(&self) -> Option<RequestContext> {
        let message = self.message.as_ref()?;

        let sender_name = message
            .sender
            .as_ref()
            .or(self.user.as_ref())
            .map(|u| u.display_name.clone())
            .unwrap_or_default();
        let room_id = self
            .space
            .as_ref()
            .map(|s| s.name.clone())
            .unwrap_or_default();

        let mentions = message
            .annotations
            .iter()
            .filter_map(|annotation| {
                let target = ChatUser::from(&annotation.user_mention.as_ref()?.user);
                Some(match annotation.annotation_type {
                    AnnotationType::UserMention => Mention::user(target),
                    AnnotationType::SlashCommand | AnnotationType::Other => Mention::other(target),
                })
            })
            .collect();

        Some(RequestContext::new(sender_name, room_id, message.text.clone()).with_mentions(mentions))
    }
}

/// Synchronous reply to a webhook event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    /// Message text; omitted for events that need no reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ChatReply {
    /// Reply with text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// Empty acknowledgement.
    pub fn empty() -> Self {
        Self::default()
    }
}
