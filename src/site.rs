use crate::backend::BackendClient;
use crate::listing::{
    transform_row, Listable, ListingController, ListingPageConfig, TransformOptions,
};
use crate::models::ListingItem;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of loading one listing page
#[derive(Debug)]
pub enum PageLoad {
    /// The fetch failed; the page shows this message and nothing else
    Failed(String),
    Ready(ListingPage),
}

/// A loaded listing page: its configuration plus live filter state
#[derive(Debug, Clone)]
pub struct ListingPage {
    pub config: &'static ListingPageConfig,
    pub controller: ListingController<ListingItem>,
}

impl ListingPage {
    /// Message for the current empty state, if the page has nothing to show
    pub fn empty_message(&self) -> Option<String> {
        self.controller
            .empty_state()
            .map(|state| state.message(self.config.kind.plural()))
    }
}

/// Public site: reads listing content through an injected backend client
#[derive(Clone)]
pub struct ListingSite {
    backend: Arc<dyn BackendClient>,
    options: TransformOptions,
}

impl ListingSite {
    pub fn new(backend: Arc<dyn BackendClient>, options: TransformOptions) -> Self {
        Self { backend, options }
    }

    /// Fetch, normalize and wrap one page's items. Runs once per page load with no retry.
    pub async fn load(&self, config: &'static ListingPageConfig) -> PageLoad {
        info!(
            "Loading {} from {} ({})",
            config.slug,
            config.table,
            self.backend.backend_name()
        );

        let rows = match self.backend.select(&config.query()).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!("Failed to load {}: {}", config.slug, err);
                return PageLoad::Failed(format!("Could not load {}: {}", config.kind.plural(), err));
            }
        };

        let fetched = rows.len();
        let items = normalize_rows(config, rows, &self.options);
        info!("Loaded {} of {} rows for {}", items.len(), fetched, config.slug);

        PageLoad::Ready(ListingPage {
            config,
            controller: ListingController::new(items, config.page_size()),
        })
    }
}

/// Normalize rows, skipping rows that are not objects and later duplicates of an id
fn normalize_rows(
    config: &ListingPageConfig,
    rows: Vec<serde_json::Value>,
    options: &TransformOptions,
) -> Vec<ListingItem> {
    let mut seen = HashSet::new();
    let mut items = Vec::with_capacity(rows.len());

    for (idx, row) in rows.into_iter().enumerate() {
        let item = match transform_row(config.kind, row, options) {
            Ok(item) => item,
            Err(err) => {
                warn!("Skipped {} row {}: {}", config.table, idx, err);
                continue;
            }
        };
        if !seen.insert(item.id().to_string()) {
            warn!("Skipped duplicate {} id {}", config.table, item.id());
            continue;
        }
        items.push(item);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::listing::{find_page, EmptyState};
    use serde_json::json;

    fn site(backend: InMemoryBackend) -> ListingSite {
        ListingSite::new(Arc::new(backend), TransformOptions::default())
    }

    fn ready(load: PageLoad) -> ListingPage {
        match load {
            PageLoad::Ready(page) => page,
            PageLoad::Failed(message) => panic!("unexpected failure: {}", message),
        }
    }

    #[tokio::test]
    async fn loads_active_projects_newest_first() {
        let site = site(InMemoryBackend::with_demo_data());
        let page = ready(site.load(find_page("projects").unwrap()).await);

        assert_eq!(page.controller.total_count(), 7);
        assert_eq!(page.controller.total_pages(), 2);
        let first = page.controller.page_items()[0];
        assert_eq!(first.title, "Bugolobi Flats");
        assert!(page.controller.items().iter().all(|i| i.title != "Archived Showroom"));
    }

    #[tokio::test]
    async fn service_pages_only_see_their_service_type() {
        let site = site(InMemoryBackend::with_demo_data());
        let page = ready(site.load(find_page("services-construction").unwrap()).await);

        let titles: Vec<_> = page.controller.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Commercial fit-out", "Turnkey home construction"]);
        assert_eq!(page.controller.page_size().get(), 3);
    }

    #[tokio::test]
    async fn fetch_failure_is_a_page_level_error() {
        let site = site(InMemoryBackend::failing("connection refused"));
        let load = site.load(find_page("deals").unwrap()).await;

        match load {
            PageLoad::Failed(message) => {
                assert!(message.starts_with("Could not load deals"));
                assert!(message.contains("connection refused"));
            }
            PageLoad::Ready(_) => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn empty_table_reports_no_items_not_no_matches() {
        let site = site(InMemoryBackend::new());
        let page = ready(site.load(find_page("survey-boqs").unwrap()).await);

        assert_eq!(page.controller.empty_state(), Some(EmptyState::NoItems));
        assert_eq!(
            page.empty_message().as_deref(),
            Some("No survey and BOQ entries available yet.")
        );
    }

    #[tokio::test]
    async fn filters_that_match_nothing_report_no_matches() {
        let site = site(InMemoryBackend::with_demo_data());
        let mut page = ready(site.load(find_page("projects").unwrap()).await);
        page.controller.set_query("jinja");

        assert_eq!(
            page.empty_message().as_deref(),
            Some("No projects match your search or filters.")
        );
    }

    #[tokio::test]
    async fn malformed_fields_degrade_and_duplicates_are_skipped() {
        let backend = InMemoryBackend::new().with_table(
            "projects",
            vec![
                json!({
                    "id": 1,
                    "title": "First",
                    "is_active": true,
                    "created_at": "2024-03-04T09:00:00Z",
                }),
                json!({
                    "id": 1,
                    "title": "Copy",
                    "is_active": true,
                    "created_at": "2024-03-03T09:00:00Z",
                }),
                json!({
                    "id": 2,
                    "title": 42,
                    "is_active": true,
                    "created_at": "2024-03-02T10:00:00Z",
                }),
                json!({
                    "id": 3,
                    "title": "Third",
                    "is_active": true,
                    "created_at": "2024-03-02T09:00:00",
                    "gallery_images": ["a.jpg", null],
                }),
            ],
        );
        let page = ready(site(backend).load(find_page("projects").unwrap()).await);

        let titles: Vec<_> = page.controller.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "", "Third"]);
        let third = page.controller.items()[2].clone();
        assert!(third.created_at.is_some());
        assert_eq!(third.gallery, vec!["a.jpg".to_string()]);
    }

    #[test]
    fn only_non_object_rows_are_skipped() {
        let config = find_page("projects").unwrap();
        let rows = vec![
            json!({ "id": 1, "title": "Kept" }),
            json!("not a row"),
            json!([1, 2]),
            json!({ "id": { "nested": true }, "price": false }),
        ];

        let items = normalize_rows(config, rows, &TransformOptions::default());

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Kept");
        assert_eq!(items[1].id, "");
        assert_eq!(items[1].price, "Negotiable");
    }
}
