use crate::backend::error::BackendError;
use crate::backend::traits::{BackendClient, BackendResult, StorageClient};
use crate::backend::types::{Bucket, SelectQuery, ACTIVE_COLUMN, ID_COLUMN};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Hosted backend reached over its REST (PostgREST) and Storage HTTP APIs
pub struct SupabaseClient {
    client: Client,
    base_url: String,
}

impl SupabaseClient {
    /// Create a client for the project at `base_url`, authenticating with `api_key`
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> BackendResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(BackendError::Config("backend url is empty".to_string()));
        }
        if api_key.trim().is_empty() {
            return Err(BackendError::Config("api key is empty".to_string()));
        }

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key.trim())
            .map_err(|e| BackendError::Config(format!("invalid api key: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
            .map_err(|e| BackendError::Config(format!("invalid api key: {}", e)))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn storage_url(&self, path: &str) -> String {
        format!("{}/storage/v1/{}", self.base_url, path)
    }

    /// Public URL of an object in a public bucket
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        self.storage_url(&format!("object/public/{}/{}", bucket, path))
    }

    /// Send and turn non-2xx responses into `BackendError::Status`
    async fn send(&self, request: RequestBuilder) -> BackendResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!("Backend returned status {}: {}", status, body);
        Err(BackendError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn rows(&self, request: RequestBuilder) -> BackendResult<Vec<Value>> {
        let response = self.send(request).await?;
        let rows = response.json::<Vec<Value>>().await?;
        Ok(rows)
    }
}

/// PostgREST query-string parameters for a select
pub fn select_params(query: &SelectQuery) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    if query.active_only {
        params.push((ACTIVE_COLUMN.to_string(), "eq.true".to_string()));
    }
    for (column, value) in &query.filters {
        params.push((column.clone(), format!("eq.{}", value)));
    }
    if let Some(order) = &query.order {
        let direction = if order.ascending { "asc" } else { "desc" };
        params.push(("order".to_string(), format!("{}.{}.nullslast", order.column, direction)));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}

/// `in.(a,b,c)` filter value for a list of ids
pub fn id_list_filter(ids: &[String]) -> String {
    let quoted: Vec<String> = ids
        .iter()
        .map(|id| format!("\"{}\"", id.replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}

#[async_trait]
impl BackendClient for SupabaseClient {
    async fn select(&self, query: &SelectQuery) -> BackendResult<Vec<Value>> {
        let url = self.rest_url(&query.table);
        debug!("Selecting from {}", url);

        let rows = self
            .rows(self.client.get(&url).query(&select_params(query)))
            .await?;

        debug!("Fetched {} rows from {}", rows.len(), query.table);
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: &Value) -> BackendResult<Value> {
        let request = self
            .client
            .post(self.rest_url(table))
            .header("Prefer", "return=representation")
            .json(row);

        let mut rows = self.rows(request).await?;
        if rows.is_empty() {
            return Err(BackendError::Decode(format!("insert into {} returned no row", table)));
        }
        info!("Inserted row into {}", table);
        Ok(rows.swap_remove(0))
    }

    async fn update(&self, table: &str, id: &str, patch: &Value) -> BackendResult<Value> {
        let request = self
            .client
            .patch(self.rest_url(table))
            .query(&[(ID_COLUMN, format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(patch);

        let mut rows = self.rows(request).await?;
        if rows.is_empty() {
            return Err(BackendError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            });
        }
        info!("Updated {} row {}", table, id);
        Ok(rows.swap_remove(0))
    }

    async fn delete(&self, table: &str, id: &str) -> BackendResult<()> {
        let request = self
            .client
            .delete(self.rest_url(table))
            .query(&[(ID_COLUMN, format!("eq.{}", id))])
            .header("Prefer", "return=representation");

        let rows = self.rows(request).await?;
        if rows.is_empty() {
            return Err(BackendError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            });
        }
        info!("Deleted {} row {}", table, id);
        Ok(())
    }

    async fn bulk_update(&self, table: &str, ids: &[String], patch: &Value) -> BackendResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let request = self
            .client
            .patch(self.rest_url(table))
            .query(&[(ID_COLUMN, id_list_filter(ids))])
            .header("Prefer", "return=representation")
            .json(patch);

        let rows = self.rows(request).await?;
        info!("Updated {} rows in {}", rows.len(), table);
        Ok(rows.len())
    }

    async fn bulk_delete(&self, table: &str, ids: &[String]) -> BackendResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let request = self
            .client
            .delete(self.rest_url(table))
            .query(&[(ID_COLUMN, id_list_filter(ids))])
            .header("Prefer", "return=representation");

        let rows = self.rows(request).await?;
        info!("Deleted {} rows from {}", rows.len(), table);
        Ok(rows.len())
    }

    fn backend_name(&self) -> &'static str {
        "Supabase"
    }
}

#[async_trait]
impl StorageClient for SupabaseClient {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> BackendResult<String> {
        let size = bytes.len();
        let request = self
            .client
            .post(self.storage_url(&format!("object/{}/{}", bucket, path)))
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes);

        self.send(request).await?;
        info!("Uploaded {} bytes to {}/{}", size, bucket, path);
        Ok(self.public_url(bucket, path))
    }

    async fn list_buckets(&self) -> BackendResult<Vec<Bucket>> {
        let response = self.send(self.client.get(self.storage_url("bucket"))).await?;
        Ok(response.json::<Vec<Bucket>>().await?)
    }

    async fn create_bucket(&self, name: &str, public: bool) -> BackendResult<()> {
        let request = self
            .client
            .post(self.storage_url("bucket"))
            .json(&json!({ "id": name, "name": name, "public": public }));

        self.send(request).await?;
        Ok(())
    }
}
