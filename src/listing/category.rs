use super::Listable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Selected category labels; empty means "show everything"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySelection(BTreeSet<String>);

impl CategorySelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(label)
    }

    /// Adds the label if absent, removes it otherwise. Returns whether it is now selected.
    pub fn toggle(&mut self, label: &str) -> bool {
        if self.0.remove(label) {
            false
        } else {
            self.0.insert(label.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for CategorySelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// True when nothing is selected or the item's category is one of the selected labels.
/// Labels compare exactly; uncategorized items never match an active selection.
pub fn matches_categories<T: Listable + ?Sized>(item: &T, selected: &CategorySelection) -> bool {
    if selected.is_empty() {
        return true;
    }
    item.category()
        .map(|category| selected.contains(category))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::tests::item;

    #[test]
    fn empty_selection_matches_uncategorized_items() {
        let selection = CategorySelection::new();

        assert!(matches_categories(&item("1", "Kololo Estate", Some("Residential")), &selection));
        assert!(matches_categories(&item("2", "Warehouse", None), &selection));
    }

    #[test]
    fn selection_uses_or_semantics() {
        let selection: CategorySelection = ["Residential", "Commercial"].into_iter().collect();

        assert!(matches_categories(&item("1", "a", Some("Residential")), &selection));
        assert!(matches_categories(&item("2", "b", Some("Commercial")), &selection));
        assert!(!matches_categories(&item("3", "c", Some("Industrial")), &selection));
        assert!(!matches_categories(&item("4", "d", None), &selection));
    }

    #[test]
    fn labels_are_case_sensitive() {
        let selection: CategorySelection = ["Commercial"].into_iter().collect();
        assert!(!matches_categories(&item("1", "a", Some("commercial")), &selection));
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut selection = CategorySelection::new();

        assert!(selection.toggle("Residential"));
        assert!(selection.contains("Residential"));
        assert!(!selection.toggle("Residential"));
        assert!(selection.is_empty());
    }
}
