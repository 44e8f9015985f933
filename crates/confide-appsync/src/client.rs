use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, error};

use confide_types::api::PublicConfession;

use crate::error::AppSyncError;
use crate::operations::{CREATE_CONFESSION, LIST_CONFESSIONS};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConfession {
    pub id: String,
    pub message: String,
    /// Passed through untouched.
    pub created_at: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl From<RemoteConfession> for PublicConfession {
    fn from(c: RemoteConfession) -> Self {
        Self {
            id: c.id,
            message: c.message,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfessionPage {
    #[serde(default)]
    pub items: Vec<RemoteConfession>,
    #[serde(default)]
    pub next_token: Option<String>,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    #[serde(default)]
    message: String,
    #[serde(rename = "errorType", default)]
    error_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListData {
    list_confessions: Option<ConfessionPage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateData {
    create_confession: Option<RemoteConfession>,
}

/// API-key authenticated GraphQL client.
#[derive(Clone)]
pub struct AppSyncClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl AppSyncClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self, AppSyncError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn list_confessions(
        &self,
        limit: u32,
        next_token: Option<&str>,
    ) -> Result<ConfessionPage, AppSyncError> {
        let data: ListData = self
            .execute(LIST_CONFESSIONS, json!({ "limit": limit, "nextToken": next_token }))
            .await?;

        let page = data.list_confessions.unwrap_or(ConfessionPage {
            items: Vec::new(),
            next_token: None,
        });
        debug!("listConfessions returned {} items", page.items.len());
        Ok(page)
    }

    pub async fn create_confession(&self, message: &str) -> Result<RemoteConfession, AppSyncError> {
        let data: CreateData = self
            .execute(CREATE_CONFESSION, json!({ "message": message }))
            .await?;

        data.create_confession
            .ok_or_else(|| AppSyncError::Response("createConfession returned null".into()))
    }

    async fn execute<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T, AppSyncError> {
        let resp = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = resp.status();
        let body: GraphQlResponse<T> = resp.json().await.map_err(|e| {
            AppSyncError::Response(format!("undecodable body (HTTP {}): {}", status, e))
        })?;

        if let Some(first) = body.errors.first() {
            if is_profanity(first) {
                return Err(AppSyncError::Profanity);
            }
            error!("GraphQL errors: {:?}", body.errors);
            return Err(AppSyncError::GraphQl(first.message.clone()));
        }

        body.data
            .ok_or_else(|| AppSyncError::Response(format!("no data (HTTP {})", status)))
    }
}

fn is_profanity(err: &GraphQlError) -> bool {
    err.message.contains("PROFANITY") || err.error_type.as_deref() == Some("PROFANITY_DETECTED")
}
