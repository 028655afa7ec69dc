//! Named mention groups.
//!
//! This module provides:
//! - Group and member entities
//! - The group registry keyed by normalized name
//! - Per-command mention deduplication

mod member;
mod registry;
mod seen;

pub use member::{normalize, Group, Member};
pub use registry::{GroupAccess, GroupList};
pub use seen::SeenNames;
