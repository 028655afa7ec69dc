//! Per-command mention deduplication.

use std::collections::HashSet;

/// Display names already processed by the current command.
///
/// Create one per handler call; it must not outlive the command.
#[derive(Debug, Default)]
pub struct SeenNames {
    names: HashSet<String>,
}

impl SeenNames {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `name` was seen before, recording it otherwise.
    pub fn seen(&mut self, name: &str) -> bool {
        !self.names.insert(name.to_string())
    }
}
