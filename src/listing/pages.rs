use crate::backend::SelectQuery;
use crate::models::ItemKind;
use std::num::NonZeroUsize;

/// Everything that differs between two listing pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingPageConfig {
    pub slug: &'static str,
    pub title: &'static str,
    pub table: &'static str,
    pub kind: ItemKind,
    pub page_size: usize,
    /// Fixed `column = value` restriction applied at fetch time
    pub base_filter: Option<(&'static str, &'static str)>,
}

impl ListingPageConfig {
    pub fn page_size(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.page_size).unwrap_or(NonZeroUsize::MIN)
    }

    /// Read query for this page: active rows, newest first
    pub fn query(&self) -> SelectQuery {
        let query = SelectQuery::new(self.table).active_only().newest_first();
        match self.base_filter {
            Some((column, value)) => query.eq(column, value),
            None => query,
        }
    }
}

const fn service_page(
    slug: &'static str,
    title: &'static str,
    service_type: &'static str,
) -> ListingPageConfig {
    ListingPageConfig {
        slug,
        title,
        table: "services",
        kind: ItemKind::Service,
        page_size: 3,
        base_filter: Some(("service_type", service_type)),
    }
}

pub const LISTING_PAGES: &[ListingPageConfig] = &[
    ListingPageConfig {
        slug: "projects",
        title: "Our Projects",
        table: "projects",
        kind: ItemKind::Project,
        page_size: 6,
        base_filter: None,
    },
    ListingPageConfig {
        slug: "deals",
        title: "Real Estate Deals",
        table: "real_estate_deals",
        kind: ItemKind::RealEstateDeal,
        page_size: 6,
        base_filter: None,
    },
    service_page("services-construction", "Building Construction", "construction"),
    service_page("services-renovation", "Renovations & Remodelling", "renovation"),
    service_page("services-interior", "Interior Design & Finishes", "interior"),
    service_page("services-management", "Project Management", "management"),
    ListingPageConfig {
        slug: "survey-boqs",
        title: "Surveying & BOQs",
        table: "survey_boqs",
        kind: ItemKind::SurveyBoq,
        page_size: 6,
        base_filter: None,
    },
];

pub fn find_page(slug: &str) -> Option<&'static ListingPageConfig> {
    LISTING_PAGES.iter().find(|page| page.slug == slug)
}
