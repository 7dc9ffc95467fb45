use super::Listable;

/// True when any searchable field contains `query`, ignoring case.
///
/// A blank query applies no filtering.
pub fn matches_query<T: Listable + ?Sized>(item: &T, query: &str) -> bool {
    let needle = query.trim();
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();

    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::tests::item;

    #[test]
    fn blank_query_matches_everything() {
        let items = [
            item("1", "Kololo Estate", Some("Residential")),
            item("2", "", None),
        ];

        for it in &items {
            assert!(matches_query(it, ""));
            assert!(matches_query(it, "   \t"));
        }
    }

    #[test]
    fn title_substring_matches_in_any_case() {
        let estate = item("1", "Kololo Estate", Some("Residential"));

        assert!(matches_query(&estate, "kolo"));
        assert!(matches_query(&estate, "KOLOLO"));
        assert!(matches_query(&estate, "lo Est"));
        assert!(!matches_query(&estate, "nakasero"));
    }

    #[test]
    fn description_and_location_are_searched() {
        let mut tower = item("2", "Nakasero Tower", Some("Commercial"));
        tower.description = "Twelve floors of Grade A office space".to_string();
        tower.location = "Nakasero Hill, Kampala".to_string();

        assert!(matches_query(&tower, "grade a"));
        assert!(matches_query(&tower, "kampala"));
        assert!(!matches_query(&tower, "entebbe"));
    }

    #[test]
    fn query_is_trimmed_before_matching() {
        let estate = item("1", "Kololo Estate", None);
        assert!(matches_query(&estate, "  estate  "));
    }
}
