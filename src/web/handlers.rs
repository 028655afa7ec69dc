//! Webhook handlers.

use std::sync::Arc;

use axum::{extract::State, Json};
use tokio::sync::Mutex;

use crate::command::{CommandEngine, RequestContext};
use crate::group::GroupList;
use crate::store::GroupStore;

use super::dto::{ChatEvent, ChatReply, EventType};
use super::error::ApiError;

/// Application state shared across handlers.
pub struct AppState {
    /// Group registry. Held for the whole command so each command sees a
    /// consistent registry.
    pub groups: Mutex<GroupList>,
    /// Command engine.
    pub engine: CommandEngine,
    /// Snapshot store, when persistence is enabled.
    pub store: Option<GroupStore>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(groups: GroupList, engine: CommandEngine) -> Self {
        Self {
            groups: Mutex::new(groups),
            engine,
            store: None,
        }
    }

    /// Persist the registry through `store` after every change.
    pub fn with_store(mut self, store: GroupStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Run one command and return the reply text.
    pub async fn handle_message(&self, ctx: &RequestContext) -> String {
        let mut groups = self.groups.lock().await;
        let result = self.engine.dispatch(&mut groups, ctx);

        if result.mutated() {
            if let Some(store) = &self.store {
                if let Err(e) = store.save(&groups) {
                    tracing::error!("Failed to save group snapshot: {}", e);
                }
            }
        }

        result.reply
    }

    /// Greeting sent when the bot joins a space.
    pub fn greeting(&self) -> String {
        format!(
            "Thanks for adding me! Say \"{} help\" to see what I can do.",
            self.engine.bot_name()
        )
    }
}

/// POST /webhook - Handle a chat event.
pub async fn webhook(
    State(state): State<Arc<AppState>>,
    Json(event): Json<ChatEvent>,
) -> Result<Json<ChatReply>, ApiError> {
    match event.event_type {
        EventType::Message => {
            let ctx = event
                .to_request_context()
                .ok_or_else(|| ApiError::bad_request("MESSAGE event without a message"))?;
            let reply = state.handle_message(&ctx).await;
            Ok(Json(ChatReply::text(reply)))
        }
        EventType::AddedToSpace => {
            let space = event.space.as_ref().map(|s| s.name.as_str()).unwrap_or("");
            tracing::info!(space = %space, "Added to space");
            Ok(Json(ChatReply::text(state.greeting())))
        }
        EventType::RemovedFromSpace => {
            let space = event.space.as_ref().map(|s| s.name.as_str()).unwrap_or("");
            tracing::info!(space = %space, "Removed from space");
            Ok(Json(ChatReply::empty()))
        }
        EventType::Unknown => Ok(Json(ChatReply::empty())),
    }
}
