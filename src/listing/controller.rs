use super::category::{matches_categories, CategorySelection};
use super::pagination::{paginate, total_pages};
use super::search::matches_query;
use super::Listable;
use serde::Serialize;
use std::num::NonZeroUsize;
use tracing::debug;

/// Why a listing has nothing to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    /// The source returned no items at all
    NoItems,
    /// Items exist but none pass the current search and category filters
    NoMatches,
}

impl EmptyState {
    pub fn message(self, plural: &str) -> String {
        match self {
            EmptyState::NoItems => format!("No {} available yet.", plural),
            EmptyState::NoMatches => format!("No {} match your search or filters.", plural),
        }
    }
}

/// Snapshot handed to the rendering layer
#[derive(Debug, Clone, Serialize)]
pub struct ListingView<'a, T> {
    pub items: Vec<&'a T>,
    pub query: &'a str,
    pub current_page: usize,
    pub total_pages: usize,
    pub filtered_count: usize,
    pub total_count: usize,
    pub empty: Option<EmptyState>,
}

/// Search, category and page state over one fetched list.
///
/// Items are searched first, then category-filtered; both must pass. Any change that
/// alters the number of matching items sends the listing back to page 1.
#[derive(Debug, Clone)]
pub struct ListingController<T> {
    items: Vec<T>,
    page_size: NonZeroUsize,
    query: String,
    categories: CategorySelection,
    current_page: usize,
    filtered: Vec<usize>,
}

impl<T: Listable> ListingController<T> {
    pub fn new(items: Vec<T>, page_size: NonZeroUsize) -> Self {
        let filtered = (0..items.len()).collect();
        Self {
            items,
            page_size,
            query: String::new(),
            categories: CategorySelection::new(),
            current_page: 1,
            filtered,
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.query {
            self.query = query;
            self.refilter();
        }
    }

    pub fn toggle_category(&mut self, label: &str) {
        self.categories.toggle(label);
        self.refilter();
    }

    pub fn set_categories(&mut self, categories: CategorySelection) {
        if categories != self.categories {
            self.categories = categories;
            self.refilter();
        }
    }

    pub fn clear_categories(&mut self) {
        self.set_categories(CategorySelection::new());
    }

    pub fn clear_filters(&mut self) {
        self.query.clear();
        self.categories.clear();
        self.refilter();
    }

    /// Direct pagination. Out-of-range requests are clamped to the nearest valid page.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        let clamped = page.clamp(1, self.total_pages());
        if clamped != page {
            debug!(requested = page, clamped, "page out of range");
        }
        self.current_page = clamped;
        clamped
    }

    pub fn next_page(&mut self) -> usize {
        self.go_to_page(self.current_page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> usize {
        self.go_to_page(self.current_page.saturating_sub(1))
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn categories(&self) -> &CategorySelection {
        &self.categories
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered.len(), self.page_size)
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    pub fn total_count(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Items on the current page, in source order
    pub fn page_items(&self) -> Vec<&T> {
        paginate(&self.filtered, self.page_size, self.current_page)
            .items
            .iter()
            .map(|&i| &self.items[i])
            .collect()
    }

    /// Distinct category labels across all items, in first-seen order
    pub fn available_categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for category in self.items.iter().filter_map(|item| item.category()) {
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.items.is_empty() {
            Some(EmptyState::NoItems)
        } else if self.filtered.is_empty() {
            Some(EmptyState::NoMatches)
        } else {
            None
        }
    }

    pub fn view(&self) -> ListingView<'_, T> {
        ListingView {
            items: self.page_items(),
            query: &self.query,
            current_page: self.current_page,
            total_pages: self.total_pages(),
            filtered_count: self.filtered.len(),
            total_count: self.items.len(),
            empty: self.empty_state(),
        }
    }

    fn refilter(&mut self) {
        let previous = self.filtered.len();
        let query = &self.query;
        let categories = &self.categories;

        self.filtered = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| matches_query(*item, query) && matches_categories(*item, categories))
            .map(|(i, _)| i)
            .collect();

        if self.filtered.len() != previous {
            self.current_page = 1;
        } else {
            self.current_page = self.current_page.min(self.total_pages());
        }
        debug!(
            query = %self.query,
            matched = self.filtered.len(),
            total = self.items.len(),
            page = self.current_page,
            "listing refiltered"
        );
    }
}
