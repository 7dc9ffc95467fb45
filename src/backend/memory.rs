use crate::backend::error::BackendError;
use crate::backend::traits::{BackendClient, BackendResult, StorageClient};
use crate::backend::types::{Bucket, SelectQuery, ACTIVE_COLUMN, CREATED_AT_COLUMN, ID_COLUMN};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Map, Value};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// In-process stand-in for the hosted backend.
/// Implements the same read/write/storage contracts over plain JSON rows.
#[derive(Default)]
pub struct InMemoryBackend {
    tables: RwLock<HashMap<String, Vec<Value>>>,
    buckets: RwLock<BTreeMap<String, Bucket>>,
    objects: RwLock<HashMap<String, Vec<u8>>>,
    failure: Option<String>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose every call fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new()
        }
    }

    /// Seed `table` with `rows` as-is
    pub fn with_table(self, table: &str, rows: Vec<Value>) -> Self {
        let mut tables = self.tables.into_inner();
        tables.insert(table.to_string(), rows);
        Self {
            tables: RwLock::new(tables),
            ..self
        }
    }

    /// Backend preloaded with sample content for every listing page
    pub fn with_demo_data() -> Self {
        info!("📋 Seeding in-memory backend with demo content");
        let mut backend = Self::new();
        for (table, rows) in demo_tables() {
            backend = backend.with_table(table, rows);
        }
        backend
    }

    pub async fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .read()
            .await
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn object(&self, bucket: &str, path: &str) -> Option<Vec<u8>> {
        self.objects
            .read()
            .await
            .get(&format!("{}/{}", bucket, path))
            .cloned()
    }

    fn check_available(&self) -> BackendResult<()> {
        match &self.failure {
            Some(message) => Err(BackendError::Status {
                status: 503,
                body: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn id_of(row: &Value) -> Option<String> {
    row.get(ID_COLUMN).map(text_of)
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn row_matches(row: &Value, query: &SelectQuery) -> bool {
    if query.active_only && row.get(ACTIVE_COLUMN) != Some(&Value::Bool(true)) {
        return false;
    }
    query
        .filters
        .iter()
        .all(|(column, value)| row.get(column).map(text_of).as_deref() == Some(value.as_str()))
}

/// Nulls and missing values sort after everything else
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Greater,
        (_, None | Some(Value::Null)) => Ordering::Less,
        (Some(x), Some(y)) => text_of(x).cmp(&text_of(y)),
    }
}

fn merge(row: &mut Value, patch: &Value) {
    if let (Some(target), Some(fields)) = (row.as_object_mut(), patch.as_object()) {
        for (key, value) in fields {
            if key != ID_COLUMN {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

#[async_trait]
impl BackendClient for InMemoryBackend {
    async fn select(&self, query: &SelectQuery) -> BackendResult<Vec<Value>> {
        self.check_available()?;
        let tables = self.tables.read().await;
        let mut rows: Vec<Value> = tables
            .get(&query.table)
            .map(|rows| rows.iter().filter(|row| row_matches(row, query)).cloned().collect())
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = compare_values(a.get(&order.column), b.get(&order.column));
                if order.ascending {
                    ordering
                } else {
                    // keep nulls last in both directions
                    match (a.get(&order.column), b.get(&order.column)) {
                        (None | Some(Value::Null), _) | (_, None | Some(Value::Null)) => ordering,
                        _ => ordering.reverse(),
                    }
                }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        debug!("In-memory select on {} returned {} rows", query.table, rows.len());
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: &Value) -> BackendResult<Value> {
        self.check_available()?;
        let mut fields = row
            .as_object()
            .cloned()
            .ok_or_else(|| BackendError::Decode("row must be a JSON object".to_string()))?;

        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();

        if !fields.contains_key(ID_COLUMN) {
            let next = rows
                .iter()
                .filter_map(|row| row.get(ID_COLUMN).and_then(Value::as_i64))
                .max()
                .unwrap_or(0)
                + 1;
            fields.insert(ID_COLUMN.to_string(), json!(next));
        }
        fields
            .entry(CREATED_AT_COLUMN.to_string())
            .or_insert_with(|| json!(Utc::now().to_rfc3339()));
        fields
            .entry(ACTIVE_COLUMN.to_string())
            .or_insert(Value::Bool(true));

        let stored = Value::Object(fields);
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, table: &str, id: &str, patch: &Value) -> BackendResult<Value> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|row| id_of(row).as_deref() == Some(id)))
            .ok_or_else(|| BackendError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            })?;

        merge(row, patch);
        Ok(row.clone())
    }

    async fn delete(&self, table: &str, id: &str) -> BackendResult<()> {
        self.check_available()?;
        let removed = self.bulk_delete(table, &[id.to_string()]).await?;
        if removed == 0 {
            return Err(BackendError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn bulk_update(&self, table: &str, ids: &[String], patch: &Value) -> BackendResult<usize> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        let mut changed = 0;
        if let Some(rows) = tables.get_mut(table) {
            for row in rows.iter_mut() {
                if id_of(row).map(|id| ids.contains(&id)).unwrap_or(false) {
                    merge(row, patch);
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }

    async fn bulk_delete(&self, table: &str, ids: &[String]) -> BackendResult<usize> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        let Some(rows) = tables.get_mut(table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|row| !id_of(row).map(|id| ids.contains(&id)).unwrap_or(false));
        Ok(before - rows.len())
    }

    fn backend_name(&self) -> &'static str {
        "in-memory"
    }
}

#[async_trait]
impl StorageClient for InMemoryBackend {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> BackendResult<String> {
        self.check_available()?;
        if !self.buckets.read().await.contains_key(bucket) {
            return Err(BackendError::Status {
                status: 404,
                body: "Bucket not found".to_string(),
            });
        }
        self.objects
            .write()
            .await
            .insert(format!("{}/{}", bucket, path), bytes);
        Ok(format!("memory://{}/{}", bucket, path))
    }

    async fn list_buckets(&self) -> BackendResult<Vec<Bucket>> {
        self.check_available()?;
        Ok(self.buckets.read().await.values().cloned().collect())
    }

    async fn create_bucket(&self, name: &str, public: bool) -> BackendResult<()> {
        self.check_available()?;
        let mut buckets = self.buckets.write().await;
        if buckets.contains_key(name) {
            return Err(BackendError::Status {
                status: 409,
                body: "The resource already exists".to_string(),
            });
        }
        buckets.insert(
            name.to_string(),
            Bucket {
                id: name.to_string(),
                name: name.to_string(),
                public,
            },
        );
        Ok(())
    }
}

fn row(fields: Value) -> Value {
    let mut map: Map<String, Value> = fields.as_object().cloned().unwrap_or_default();
    map.entry(ACTIVE_COLUMN.to_string()).or_insert(Value::Bool(true));
    Value::Object(map)
}

fn demo_tables() -> Vec<(&'static str, Vec<Value>)> {
    vec![
        (
            "projects",
            vec![
                row(json!({
                    "id": 1,
                    "title": "Kololo Estate",
                    "description": "Twelve executive townhouses with private gardens and solar water heating.",
                    "image_url": "https://images.example/projects/kololo.jpg",
                    "gallery_images": [
                        "https://images.example/projects/kololo-1.jpg",
                        "https://images.example/projects/kololo-2.jpg"
                    ],
                    "category": "Residential",
                    "location": "Kololo, Kampala",
                    "tags": ["Townhouses"],
                    "status": "Completed",
                    "created_at": "2024-03-02T09:00:00+00:00"
                })),
                row(json!({
                    "id": 2,
                    "title": "Nakasero Tower",
                    "description": "Twelve floors of Grade A office space with basement parking.",
                    "image_url": "https://images.example/projects/nakasero.jpg",
                    "category": "Commercial",
                    "location": "Nakasero Hill, Kampala",
                    "status": "Ongoing",
                    "price": 8500000000u64,
                    "created_at": "2024-05-18T09:00:00+00:00"
                })),
                row(json!({
                    "id": 3,
                    "title": "Entebbe Road Warehouse",
                    "description": "Steel-frame logistics warehouse with loading bays.",
                    "image_url": "https://images.example/projects/warehouse.jpg",
                    "category": "Industrial",
                    "location": "Kajjansi",
                    "created_at": "2023-11-20T09:00:00+00:00"
                })),
                row(json!({
                    "id": 4,
                    "title": "Muyenga Family Home",
                    "description": "Four-bedroom hillside home with panoramic lake views.",
                    "category": "Residential",
                    "location": "Muyenga, Kampala",
                    "created_at": "2024-01-09T09:00:00+00:00"
                })),
                row(json!({
                    "id": 5,
                    "title": "Ntinda Shopping Arcade",
                    "description": "Two-level retail arcade with 40 shop units.",
                    "image_url": "https://images.example/projects/ntinda.jpg",
                    "category": "Commercial",
                    "location": "Ntinda, Kampala",
                    "created_at": "2023-08-14T09:00:00+00:00"
                })),
                row(json!({
                    "id": 6,
                    "title": "Mukono Community School",
                    "description": "Classroom blocks, dormitories and a borehole for 600 pupils.",
                    "category": "Institutional",
                    "location": "Mukono",
                    "created_at": "2023-06-30T09:00:00+00:00"
                })),
                row(json!({
                    "id": 7,
                    "title": "Bugolobi Flats",
                    "description": "Twenty-four apartments over ground-floor parking.",
                    "image_url": "https://images.example/projects/bugolobi.jpg",
                    "category": "Residential",
                    "location": "Bugolobi, Kampala",
                    "created_at": "2024-07-01T09:00:00+00:00"
                })),
                row(json!({
                    "id": 8,
                    "title": "Archived Showroom",
                    "description": "Hidden from the public site.",
                    "category": "Commercial",
                    "location": "Industrial Area, Kampala",
                    "is_active": false,
                    "created_at": "2022-01-01T09:00:00+00:00"
                })),
            ],
        ),
        (
            "real_estate_deals",
            vec![
                row(json!({
                    "id": 1,
                    "title": "Half-acre plot in Najjera",
                    "description": "Titled residential plot on a murram road, ready for development.",
                    "property_type": "Land",
                    "location": "Najjera, Wakiso",
                    "size": "0.5 acres",
                    "price": 180000000,
                    "created_at": "2024-06-10T09:00:00+00:00"
                })),
                row(json!({
                    "id": 2,
                    "title": "Three-bedroom bungalow in Kira",
                    "description": "Finished bungalow with boys' quarters and perimeter wall.",
                    "property_type": "House",
                    "location": "Kira, Wakiso",
                    "features": ["Boys' quarters", "Perimeter wall"],
                    "created_at": "2024-04-22T09:00:00+00:00"
                })),
            ],
        ),
        (
            "services",
            vec![
                row(json!({
                    "id": 1,
                    "title": "Turnkey home construction",
                    "description": "From foundation to finishes, one contract.",
                    "service_type": "construction",
                    "category": "Residential",
                    "destination": "Greater Kampala",
                    "duration": "6-9 months",
                    "itinerary": [
                        { "day": 2, "title": "Foundation and slab" },
                        { "day": 1, "title": "Site survey and approvals" },
                        { "title": "Handover" }
                    ],
                    "inclusions": ["Architectural drawings", "Building materials", "Labour"],
                    "exclusions": ["Land acquisition"],
                    "created_at": "2024-02-01T09:00:00+00:00"
                })),
                row(json!({
                    "id": 2,
                    "title": "Commercial fit-out",
                    "description": "Office and retail interior build-outs.",
                    "service_type": "construction",
                    "category": "Commercial",
                    "destination": "Kampala CBD",
                    "created_at": "2024-02-15T09:00:00+00:00"
                })),
                row(json!({
                    "id": 3,
                    "title": "Kitchen and bathroom remodelling",
                    "description": "Modernise wet areas without moving out.",
                    "service_type": "renovation",
                    "category": "Residential",
                    "price": "From UGX 15,000,000",
                    "created_at": "2024-03-11T09:00:00+00:00"
                })),
                row(json!({
                    "id": 4,
                    "title": "Interior finishing packages",
                    "description": "Gypsum ceilings, tiling, painting and joinery.",
                    "service_type": "interior",
                    "category": "Residential",
                    "created_at": "2024-03-20T09:00:00+00:00"
                })),
                row(json!({
                    "id": 5,
                    "title": "Owner's representative",
                    "description": "Cost, schedule and quality oversight on your behalf.",
                    "service_type": "management",
                    "category": "Commercial",
                    "created_at": "2024-04-05T09:00:00+00:00"
                })),
            ],
        ),
        (
            "survey_boqs",
            vec![
                row(json!({
                    "id": 1,
                    "title": "Topographical survey",
                    "description": "Contour mapping and boundary pickup for design.",
                    "category": "Land Surveying",
                    "location": "Countrywide",
                    "turnaround": "5 working days",
                    "deliverables": ["CAD drawing", "Survey report"],
                    "created_at": "2024-01-15T09:00:00+00:00"
                })),
                row(json!({
                    "id": 2,
                    "title": "Bills of quantities for residential builds",
                    "description": "Itemised BOQs priced against current Kampala market rates.",
                    "category": "Quantity Surveying",
                    "location": "Kampala",
                    "client": "Private developers",
                    "created_at": "2024-02-20T09:00:00+00:00"
                })),
            ],
        ),
    ]
}
