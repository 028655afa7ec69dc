//! Rollcall - named mention groups for chat rooms
//!
//! A chat bot that keeps named groups of users and mentions every member of
//! a group on request, implemented in Rust.

pub mod command;
pub mod config;
pub mod error;
pub mod group;
pub mod logging;
pub mod store;
pub mod web;

pub use command::{
    ChatUser, CommandEngine, Dispatch, GroupCommand, Mention, MentionKind, RequestContext,
    UserKind,
};
pub use config::Config;
pub use error::{Result, RollcallError};
pub use group::{Group, GroupAccess, GroupList, Member};
pub use store::GroupStore;
pub use web::{AppState, WebServer};
