pub mod category;
pub mod controller;
pub mod pages;
pub mod pagination;
pub mod search;
pub mod transform;

pub use category::{matches_categories, CategorySelection};
pub use controller::{EmptyState, ListingController, ListingView};
pub use pages::{find_page, ListingPageConfig, LISTING_PAGES};
pub use pagination::{paginate, PageSlice};
pub use search::matches_query;
pub use transform::{transform_row, Normalize, TransformOptions};

use crate::models::ListingItem;

/// Anything a listing page can search and category-filter
pub trait Listable {
    /// Stable identifier, unique within one listing
    fn id(&self) -> &str;

    /// Free-text fields checked by search (title, description, location)
    fn search_fields(&self) -> [&str; 3];

    fn category(&self) -> Option<&str>;
}

impl Listable for ListingItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> [&str; 3] {
        [&self.title, &self.description, &self.location]
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::models::{ItemKind, ListingItem};

    pub(crate) fn item(id: &str, title: &str, category: Option<&str>) -> ListingItem {
        ListingItem {
            id: id.to_string(),
            kind: ItemKind::Project,
            title: title.to_string(),
            description: String::new(),
            image_url: String::new(),
            category: category.map(str::to_string),
            location: String::new(),
            tags: Vec::new(),
            price: "Negotiable".to_string(),
            duration: None,
            gallery: Vec::new(),
            itinerary: Vec::new(),
            inclusions: Vec::new(),
            exclusions: Vec::new(),
            created_at: None,
        }
    }
}
