//! Webhook transport for Rollcall.
//!
//! This module receives Google Chat events over HTTP, runs the addressed
//! group command and returns the reply synchronously.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
