use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Classification outcome of a stored confession.
///
/// Rejected messages are never persisted, so `Approved` is the only state
/// that exists on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfessionStatus {
    Approved,
}

impl ConfessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
        }
    }
}

impl fmt::Display for ConfessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single anonymous submission that passed every moderation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confession {
    pub id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub status: ConfessionStatus,
}
