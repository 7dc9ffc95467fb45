use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Soft-delete flag every content table carries
pub const ACTIVE_COLUMN: &str = "is_active";
pub const CREATED_AT_COLUMN: &str = "created_at";
pub const ID_COLUMN: &str = "id";

/// Sort order for a read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

impl Order {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }
}

/// "Select rows from a table" request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectQuery {
    pub table: String,
    /// Only rows whose `is_active` column is true
    pub active_only: bool,
    /// Equality filters, all of which must hold
    pub filters: Vec<(String, String)>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl SelectQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            active_only: false,
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    pub fn order_by(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    pub fn newest_first(self) -> Self {
        self.order_by(Order::desc(CREATED_AT_COLUMN))
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Storage bucket as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub public: bool,
}

/// Object key for an upload: `<folder>/<unix-millis>-<sanitized name>`
pub fn object_path(folder: &str, file_name: &str, at: DateTime<Utc>) -> String {
    let mut name: String = file_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    if name.trim_matches(|c| c == '-' || c == '.').is_empty() {
        name = "file".to_string();
    }

    let stamped = format!("{}-{}", at.timestamp_millis(), name);
    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        stamped
    } else {
        format!("{}/{}", folder, stamped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn builder_collects_filters_and_order() {
        let query = SelectQuery::new("projects")
            .active_only()
            .eq("category", "Residential")
            .newest_first()
            .limit(10);

        assert_eq!(query.table, "projects");
        assert!(query.active_only);
        assert_eq!(query.filters, vec![("category".to_string(), "Residential".to_string())]);
        assert_eq!(query.order, Some(Order::desc("created_at")));
        assert_eq!(query.limit, Some(10));
    }

    #[test]
    fn object_path_sanitizes_file_names() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let millis = at.timestamp_millis();

        assert_eq!(
            object_path("projects/", "Kololo Site Photo (1).JPG", at),
            format!("projects/{}-kololo-site-photo--1-.jpg", millis)
        );
        assert_eq!(object_path("", "plan.pdf", at), format!("{}-plan.pdf", millis));
        assert_eq!(object_path("boq", "???", at), format!("boq/{}-file", millis));
    }
}
