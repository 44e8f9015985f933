use serde::{Deserialize, Serialize};

use crate::api::PublicConfession;

/// Events pushed to live feed subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum FeedEvent {
    /// Sent once when a subscriber connects
    Ready { policy_version: String },

    /// A confession was accepted and stored
    ConfessionCreate {
        id: String,
        message: String,
        created_at: String,
    },
}

impl From<&PublicConfession> for FeedEvent {
    fn from(c: &PublicConfession) -> Self {
        Self::ConfessionCreate {
            id: c.id.clone(),
            message: c.message.clone(),
            created_at: c.created_at.clone(),
        }
    }
}
