use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::models::Confession;

// -- Confessions --

/// `message` is optional so a missing field surfaces as the same
/// "required" error as an empty one.
#[derive(Debug, Deserialize)]
pub struct CreateConfessionRequest {
    pub message: Option<String>,
}

/// The only confession fields that ever leave the server.
///
/// `created_at` is an RFC 3339 string carried as-is, so a timestamp from
/// the managed API reaches clients exactly as it was stored there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicConfession {
    pub id: String,
    pub message: String,
    pub created_at: String,
}

impl From<Confession> for PublicConfession {
    fn from(c: Confession) -> Self {
        Self {
            id: c.id.to_string(),
            message: c.message,
            created_at: c.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListConfessionsResponse {
    pub items: Vec<PublicConfession>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateConfessionResponse {
    pub success: bool,
    pub confession: PublicConfession,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}

// -- Health --

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub policy_version: String,
    pub backend: String,
}
