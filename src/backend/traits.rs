use crate::backend::error::BackendError;
use crate::backend::types::{Bucket, SelectQuery};
use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Row access to the hosted relational store.
/// Implementations are injected wherever data is read or written, so tests can swap in a fake.
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Read rows matching `query`
    async fn select(&self, query: &SelectQuery) -> BackendResult<Vec<Value>>;

    /// Insert one row and return it as stored
    async fn insert(&self, table: &str, row: &Value) -> BackendResult<Value>;

    /// Patch one row by id and return it as stored
    async fn update(&self, table: &str, id: &str, patch: &Value) -> BackendResult<Value>;

    async fn delete(&self, table: &str, id: &str) -> BackendResult<()>;

    /// Patch every row in `ids`; returns the number of rows changed
    async fn bulk_update(&self, table: &str, ids: &[String], patch: &Value) -> BackendResult<usize>;

    /// Delete every row in `ids`; returns the number of rows removed
    async fn bulk_delete(&self, table: &str, ids: &[String]) -> BackendResult<usize>;

    /// Name of the backend, for logs
    fn backend_name(&self) -> &'static str;
}

/// File storage buckets
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Upload bytes to `bucket/path` and return the public URL
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> BackendResult<String>;

    async fn list_buckets(&self) -> BackendResult<Vec<Bucket>>;

    async fn create_bucket(&self, name: &str, public: bool) -> BackendResult<()>;

    /// Create a public bucket unless one with this name already exists
    async fn ensure_bucket(&self, name: &str) -> BackendResult<()> {
        let buckets = self.list_buckets().await?;
        if buckets.iter().any(|b| b.name == name || b.id == name) {
            return Ok(());
        }
        info!("Creating storage bucket {}", name);
        self.create_bucket(name, true).await
    }
}
