//! Test helpers for integration tests.
//!
//! Provides request builders and Google Chat event fixtures.

#![allow(dead_code)]

use serde_json::{json, Value};

use rollcall::{ChatUser, Mention, RequestContext};

/// Bot token used throughout the tests.
pub const BOT: &str = "@rollcall";

/// Room the tests usually talk from.
pub const ROOM_A: &str = "spaces/AAAA";

/// A second room.
pub const ROOM_B: &str = "spaces/BBBB";

/// Direct mention of a human user.
pub fn user(name: &str, chat_id: &str) -> Mention {
    Mention::user(ChatUser::human(name, chat_id))
}

/// Direct mention of the bot.
pub fn bot_mention() -> Mention {
    Mention::user(ChatUser::bot("rollcall", "users/bot"))
}

/// Request from `room` carrying `text` and the given mentions (bot first).
pub fn request(room: &str, text: &str, mentions: Vec<Mention>) -> RequestContext {
    let mut all = vec![bot_mention()];
    all.extend(mentions);
    RequestContext::new("Carol", room, text).with_mentions(all)
}

/// Google Chat `USER_MENTION` annotation.
pub fn mention_annotation(name: &str, chat_id: &str, user_type: &str) -> Value {
    json!({
        "type": "USER_MENTION",
        "userMention": {
            "user": { "name": chat_id, "displayName": name, "type": user_type },
            "type": "MENTION"
        }
    })
}

/// Google Chat `MESSAGE` event addressed to the bot.
pub fn message_event(space: &str, text: &str, users: &[(&str, &str)]) -> Value {
    let mut annotations = vec![mention_annotation("rollcall", "users/bot", "BOT")];
    annotations.extend(
        users
            .iter()
            .map(|(name, id)| mention_annotation(name, id, "HUMAN")),
    );

    json!({
        "type": "MESSAGE",
        "message": {
            "text": text,
            "sender": { "name": "users/3", "displayName": "Carol", "type": "HUMAN" },
            "annotations": annotations
        },
        "space": { "name": space, "type": "ROOM" }
    })
}
