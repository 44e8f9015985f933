//! Client for the managed GraphQL API that fronts the confession store.

pub mod client;
pub mod error;
pub mod operations;

pub use client::{AppSyncClient, ConfessionPage, RemoteConfession};
pub use error::AppSyncError;
