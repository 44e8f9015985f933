//! Screens and persists confessions against the local store.
//!
//! Also accepts resolver events in the managed API's direct-invoke shape,
//! so the same deployment can stand in for the hosted resolver.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use confide_db::Database;
use confide_db::models::ConfessionRow;
use confide_filter::{ValidationError, WordFilter, validate_message};
use confide_sentiment::ToxicityGate;
use confide_types::api::PublicConfession;
use confide_types::events::FeedEvent;
use confide_types::models::{Confession, ConfessionStatus};

use crate::error::AppError;
use crate::state::AppState;

pub const DEFAULT_LIST_LIMIT: u32 = 50;

/// Sentiment recorded when the analyzer was skipped or failed open.
const UNKNOWN_SENTIMENT: &str = "UNKNOWN";

#[derive(Clone)]
pub struct Resolver {
    db: Arc<Database>,
    filter: Arc<WordFilter>,
    gate: ToxicityGate,
}

impl Resolver {
    pub fn new(db: Arc<Database>, filter: Arc<WordFilter>, gate: ToxicityGate) -> Self {
        Self { db, filter, gate }
    }

    /// Validate, screen and store one confession.
    pub async fn create(&self, raw: &str) -> Result<Confession, AppError> {
        let message = validate_message(raw)?;

        // Layer 1: word list
        if let Some(term) = self.filter.check(message) {
            info!("Bad word detected: {}", term);
            return Err(AppError::Profanity);
        }

        // Layer 2: sentiment
        let assessment = self.gate.assess(message).await?;
        if assessment.toxic {
            return Err(AppError::Harmful);
        }

        let confession = Confession {
            id: Uuid::new_v4(),
            message: message.to_string(),
            created_at: Utc::now().trunc_subsecs(3),
            status: ConfessionStatus::Approved,
        };

        let row = ConfessionRow {
            id: confession.id.to_string(),
            message: confession.message.clone(),
            status: confession.status.as_str().to_string(),
            sentiment: assessment
                .label
                .map_or(UNKNOWN_SENTIMENT, |label| label.as_str())
                .to_string(),
            created_at: confession
                .created_at
                .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        };

        // Run blocking DB insert off the async runtime
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || db.insert_confession(&row)).await??;

        info!("Confession saved: {}", confession.id);
        Ok(confession)
    }

    /// Approved confessions, newest first.
    pub async fn list(&self, limit: u32) -> Result<Vec<Confession>, AppError> {
        let db = self.db.clone();
        let status = ConfessionStatus::Approved;
        let rows = tokio::task::spawn_blocking(move || db.list_confessions(status.as_str(), limit))
            .await??;

        Ok(rows.into_iter().filter_map(row_to_confession).collect())
    }

    /// Dispatch a resolver event by operation name.
    pub async fn handle(&self, event: ResolverEvent) -> Result<ResolverOutput, AppError> {
        let args = event.arguments.unwrap_or_default();
        let operation = args
            .operation
            .or(event.operation)
            .or_else(|| event.info.map(|i| i.field_name))
            .unwrap_or_default();

        match operation.as_str() {
            "createConfession" | "create" => {
                let message = args.message.or(event.message).unwrap_or_default();
                Ok(ResolverOutput::Create(self.create_outcome(&message).await?))
            }
            "listConfessions" | "list" => {
                let limit = args.limit.or(event.limit).unwrap_or(DEFAULT_LIST_LIMIT);
                let confessions = self.list(limit).await?;
                Ok(ResolverOutput::List(ListOutcome {
                    count: confessions.len(),
                    confessions,
                }))
            }
            _ => {
                warn!("Unknown resolver operation: '{}'", operation);
                Err(AppError::UnknownOperation(operation))
            }
        }
    }

    /// Policy rejections are reported in-band; only failures are errors.
    async fn create_outcome(&self, message: &str) -> Result<CreateOutcome, AppError> {
        match self.create(message).await {
            Ok(confession) => Ok(CreateOutcome {
                success: true,
                confession: Some(confession),
                error: None,
                notification: "Confession posted! 💜".to_string(),
            }),
            Err(e) => {
                let (error, notification) = match &e {
                    AppError::Validation(ValidationError::Required) => {
                        ("Message is required", "कुछ तो लिखो! 📝")
                    }
                    AppError::Validation(ValidationError::TooLong { .. }) => {
                        ("Message too long", "थोड़ा छोटा लिखो! Max 500 characters 📏")
                    }
                    AppError::Profanity => {
                        ("Inappropriate content detected", "अच्छा लिखो! 🙏 No bad words please.")
                    }
                    AppError::Harmful => {
                        ("Content flagged as potentially harmful", "अच्छा लिखो! 🙏 Keep it positive.")
                    }
                    _ => return Err(e),
                };
                Ok(CreateOutcome {
                    success: false,
                    confession: None,
                    error: Some(error.to_string()),
                    notification: notification.to_string(),
                })
            }
        }
    }
}

fn row_to_confession(row: ConfessionRow) -> Option<Confession> {
    let id = row
        .id
        .parse::<Uuid>()
        .map_err(|e| warn!("Corrupt confession id '{}': {}", row.id, e))
        .ok()?;
    let created_at = DateTime::parse_from_rfc3339(&row.created_at)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| warn!("Corrupt created_at '{}' on confession '{}': {}", row.created_at, row.id, e))
        .ok()?;

    Some(Confession {
        id,
        message: row.message,
        created_at,
        status: ConfessionStatus::Approved,
    })
}

// -- Events --

#[derive(Debug, Default, Deserialize)]
pub struct ResolverArguments {
    pub operation: Option<String>,
    pub message: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverInfo {
    pub field_name: String,
}

/// Either `{ arguments, info: { fieldName } }` or a flat
/// `{ operation, message, limit }`.
#[derive(Debug, Default, Deserialize)]
pub struct ResolverEvent {
    pub arguments: Option<ResolverArguments>,
    pub info: Option<ResolverInfo>,
    pub operation: Option<String>,
    pub message: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CreateOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confession: Option<Confession>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub notification: String,
}

#[derive(Debug, Serialize)]
pub struct ListOutcome {
    pub confessions: Vec<Confession>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ResolverOutput {
    Create(CreateOutcome),
    List(ListOutcome),
}

/// POST /resolver: direct resolver invocation.
pub async fn invoke(
    State(state): State<AppState>,
    event: Result<Json<ResolverEvent>, JsonRejection>,
) -> Result<Json<ResolverOutput>, AppError> {
    let Json(event) = event.map_err(|e| {
        debug!("Rejected resolver event: {}", e);
        AppError::Malformed("Invalid resolver event")
    })?;

    let resolver = state
        .backend
        .resolver()
        .ok_or_else(|| AppError::Upstream("resolver route hit without a local backend".into()))?;

    let output = resolver.handle(event).await?;

    if let ResolverOutput::Create(CreateOutcome {
        confession: Some(confession),
        ..
    }) = &output
    {
        let public = PublicConfession::from(confession.clone());
        state.dispatcher.broadcast(FeedEvent::from(&public));
    }

    Ok(Json(output))
}
