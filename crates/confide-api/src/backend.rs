use tracing::debug;

use confide_appsync::AppSyncClient;
use confide_types::api::PublicConfession;

use crate::error::AppError;
use crate::resolver::Resolver;

/// Where confessions are screened and stored.
pub enum Backend {
    /// In-process resolver over the local SQLite store.
    Local(Resolver),
    /// The managed GraphQL API; its resolver does the final screening.
    AppSync(AppSyncClient),
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Local(_) => "local",
            Self::AppSync(_) => "appsync",
        }
    }

    pub fn resolver(&self) -> Option<&Resolver> {
        match self {
            Self::Local(resolver) => Some(resolver),
            Self::AppSync(_) => None,
        }
    }

    pub async fn list(&self, limit: u32) -> Result<Vec<PublicConfession>, AppError> {
        let items: Vec<PublicConfession> = match self {
            Self::Local(resolver) => resolver
                .list(limit)
                .await?
                .into_iter()
                .map(PublicConfession::from)
                .collect(),
            Self::AppSync(client) => client
                .list_confessions(limit, None)
                .await?
                .items
                .into_iter()
                .map(PublicConfession::from)
                .collect(),
        };

        debug!("Listed {} confessions from {} backend", items.len(), self.name());
        Ok(items)
    }

    /// `message` must already be validated and trimmed.
    pub async fn create(&self, message: &str) -> Result<PublicConfession, AppError> {
        match self {
            Self::Local(resolver) => Ok(resolver.create(message).await?.into()),
            Self::AppSync(client) => Ok(client.create_confession(message).await?.into()),
        }
    }
}
