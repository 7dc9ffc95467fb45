use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Kind of content a listing page shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Project,
    RealEstateDeal,
    Service,
    SurveyBoq,
}

impl ItemKind {
    /// Price label shown when a record carries no price
    pub fn missing_price_label(self) -> &'static str {
        match self {
            ItemKind::Project | ItemKind::RealEstateDeal => "Negotiable",
            ItemKind::Service | ItemKind::SurveyBoq => "Contact for Quote",
        }
    }

    /// Plural noun used in empty-state messages
    pub fn plural(self) -> &'static str {
        match self {
            ItemKind::Project => "projects",
            ItemKind::RealEstateDeal => "deals",
            ItemKind::Service => "services",
            ItemKind::SurveyBoq => "survey and BOQ entries",
        }
    }
}

/// Row identifier; the backend hands out either integer or uuid keys
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl Default for RecordId {
    fn default() -> Self {
        RecordId::Text(String::new())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

/// Price as authored in the admin dashboard: a number or free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Amount(f64),
    Text(String),
}

/// One step of a service itinerary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItineraryStep {
    #[serde(deserialize_with = "lenient")]
    pub day: Option<u32>,
    #[serde(deserialize_with = "lenient")]
    pub title: String,
    #[serde(deserialize_with = "lenient")]
    pub description: String,
}

/// Raw `projects` row
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectRecord {
    #[serde(deserialize_with = "lenient")]
    pub id: RecordId,
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub image_url: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub gallery_images: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub price: Option<Price>,
    #[serde(deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub completion_date: Option<String>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Raw `real_estate_deals` row
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DealRecord {
    #[serde(deserialize_with = "lenient")]
    pub id: RecordId,
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub image_url: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub gallery_images: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub property_type: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub features: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub price: Option<Price>,
    #[serde(deserialize_with = "lenient")]
    pub size: Option<String>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Raw `services` row
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceRecord {
    #[serde(deserialize_with = "lenient")]
    pub id: RecordId,
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub image_url: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub gallery_images: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub service_type: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub destination: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub price: Option<Price>,
    #[serde(deserialize_with = "lenient")]
    pub duration: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub itinerary: Vec<ItineraryStep>,
    #[serde(deserialize_with = "lenient_list")]
    pub inclusions: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub exclusions: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Raw `survey_boqs` row
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SurveyBoqRecord {
    #[serde(deserialize_with = "lenient")]
    pub id: RecordId,
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub image_url: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub gallery_images: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub client: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub price: Option<Price>,
    #[serde(deserialize_with = "lenient")]
    pub turnaround: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub deliverables: Vec<String>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Normalized display shape shared by every card component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingItem {
    pub id: String,
    pub kind: ItemKind,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub category: Option<String>,
    pub location: String,
    pub tags: Vec<String>,
    pub price: String,
    pub duration: Option<String>,
    pub gallery: Vec<String>,
    pub itinerary: Vec<ItineraryStep>,
    pub inclusions: Vec<String>,
    pub exclusions: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Typed parse of one field; anything that does not fit becomes the default
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// List field keeping only the entries that parse; a non-array becomes empty
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let entries = match value {
        Value::Array(entries) => entries,
        _ => return Ok(Vec::new()),
    };
    Ok(entries
        .into_iter()
        .filter(|entry| !entry.is_null())
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect())
}

/// RFC 3339 timestamps, or naive ones (`timestamp` columns) read as UTC
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(parse_timestamp))
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
