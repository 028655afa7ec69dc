//! Group commands for the bot.
//!
//! This module provides:
//! - The request context decoded from an inbound chat message
//! - Handlers for create, delete, add, remove, restrict, notify and list
//! - A parser and dispatcher that route a message to one handler

mod context;
mod dispatch;
mod handlers;
mod parser;

pub use context::{ChatUser, Mention, MentionKind, RequestContext, UserKind};
pub use dispatch::Dispatch;
pub use handlers::{
    locate_command_span, CommandEngine, DEFAULT_MAX_MESSAGE_LENGTH, MESSAGE_TOO_LONG, NO_GROUPS,
};
pub use parser::{
    format_help, get_command_help, parse_command, usage, CommandInfo, GroupCommand, ParsedCommand,
};
