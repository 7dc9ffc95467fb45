use crate::backend::types::ACTIVE_COLUMN;
use crate::backend::{object_path, BackendClient, BackendResult, StorageClient};
use chrono::Utc;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Content management over the backend's write and storage APIs
#[derive(Clone)]
pub struct ContentAdmin {
    backend: Arc<dyn BackendClient>,
    storage: Arc<dyn StorageClient>,
    bucket: String,
}

impl ContentAdmin {
    pub fn new(
        backend: Arc<dyn BackendClient>,
        storage: Arc<dyn StorageClient>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            storage,
            bucket: bucket.into(),
        }
    }

    pub async fn create(&self, table: &str, row: &Value) -> BackendResult<Value> {
        self.backend.insert(table, row).await
    }

    pub async fn update(&self, table: &str, id: &str, patch: &Value) -> BackendResult<Value> {
        self.backend.update(table, id, patch).await
    }

    pub async fn delete(&self, table: &str, id: &str) -> BackendResult<()> {
        self.backend.delete(table, id).await
    }

    /// Show or hide many rows on the public site at once
    pub async fn set_active(&self, table: &str, ids: &[String], active: bool) -> BackendResult<usize> {
        let changed = self
            .backend
            .bulk_update(table, ids, &json!({ ACTIVE_COLUMN: active }))
            .await?;
        info!("Set {} of {} {} rows active={}", changed, ids.len(), table, active);
        Ok(changed)
    }

    pub async fn delete_many(&self, table: &str, ids: &[String]) -> BackendResult<usize> {
        self.backend.bulk_delete(table, ids).await
    }

    /// Upload an image into `folder`, creating the bucket on first use. Returns its public URL.
    pub async fn upload_image(
        &self,
        folder: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> BackendResult<String> {
        self.storage.ensure_bucket(&self.bucket).await?;
        let path = object_path(folder, file_name, Utc::now());
        self.storage
            .upload(&self.bucket, &path, bytes, content_type_for(file_name))
            .await
    }
}

/// MIME type guessed from the file extension
pub fn content_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{InMemoryBackend, SelectQuery};

    fn admin() -> (Arc<InMemoryBackend>, ContentAdmin) {
        let backend = Arc::new(InMemoryBackend::with_demo_data());
        let admin = ContentAdmin::new(backend.clone(), backend.clone(), "site-images");
        (backend, admin)
    }

    #[tokio::test]
    async fn hiding_rows_removes_them_from_public_reads() {
        let (backend, admin) = admin();
        let query = SelectQuery::new("projects").active_only();
        let before = backend.select(&query).await.unwrap().len();

        let changed = admin
            .set_active("projects", &["1".to_string(), "2".to_string()], false)
            .await
            .unwrap();

        assert_eq!(changed, 2);
        assert_eq!(backend.select(&query).await.unwrap().len(), before - 2);
    }

    #[tokio::test]
    async fn created_rows_are_listed() {
        let (backend, admin) = admin();
        let stored = admin
            .create("survey_boqs", &json!({ "title": "Structural assessment" }))
            .await
            .unwrap();

        assert_eq!(stored["is_active"], json!(true));
        let rows = backend
            .select(&SelectQuery::new("survey_boqs").active_only())
            .await
            .unwrap();
        assert!(rows.iter().any(|r| r["title"] == json!("Structural assessment")));
    }

    #[tokio::test]
    async fn upload_creates_bucket_on_first_use() {
        let (backend, admin) = admin();
        let url = admin
            .upload_image("projects", "Site Photo.PNG", vec![0x89, 0x50])
            .await
            .unwrap();

        assert!(url.starts_with("memory://site-images/projects/"));
        assert!(url.ends_with("-site-photo.png"));
        assert_eq!(backend.list_buckets().await.unwrap().len(), 1);
    }

    #[test]
    fn content_types_by_extension() {
        assert_eq!(content_type_for("a.JPG"), "image/jpeg");
        assert_eq!(content_type_for("plan.pdf"), "application/pdf");
        assert_eq!(content_type_for("README"), "application/octet-stream");
    }
}
