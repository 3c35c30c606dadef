//! Router configuration.

use serde::{Deserialize, Serialize};

/// What to do with a registration that can never fire because an earlier one for
/// the same mesh name and category already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep it silently.
    Accept,
    /// Keep it and log a warning.
    #[default]
    Warn,
    /// Drop it and log a warning.
    Reject,
}

/// Tunables for an [`crate::InteractionRouter`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Handling of unreachable duplicate registrations.
    pub duplicate_policy: DuplicatePolicy,
}
