use crate::models::{
    DealRecord, ItemKind, ListingItem, Price, ProjectRecord, ServiceRecord, SurveyBoqRecord,
};
use serde_json::Value;

/// Site-wide defaults applied while normalizing records
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOptions {
    pub currency: String,
    pub placeholder_image: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            currency: "UGX".to_string(),
            placeholder_image: "/images/placeholder.jpg".to_string(),
        }
    }
}

/// Maps a raw backend record into the card display shape
pub trait Normalize {
    fn normalize(self, options: &TransformOptions) -> ListingItem;
}

impl Normalize for ProjectRecord {
    fn normalize(self, options: &TransformOptions) -> ListingItem {
        let kind = ItemKind::Project;
        let mut tags = self.tags;
        if let Some(status) = non_blank(self.status) {
            if !tags.contains(&status) {
                tags.push(status);
            }
        }
        let (image_url, gallery) = images(self.image_url, self.gallery_images, options);

        ListingItem {
            id: self.id.to_string(),
            kind,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            image_url,
            category: non_blank(self.category),
            location: self.location.unwrap_or_default(),
            tags,
            price: display_price(self.price, kind, options),
            duration: non_blank(self.completion_date),
            gallery,
            itinerary: Vec::new(),
            inclusions: Vec::new(),
            exclusions: Vec::new(),
            created_at: self.created_at,
        }
    }
}

impl Normalize for DealRecord {
    fn normalize(self, options: &TransformOptions) -> ListingItem {
        let kind = ItemKind::RealEstateDeal;
        let mut tags = self.features;
        if let Some(size) = non_blank(self.size) {
            tags.insert(0, size);
        }
        let (image_url, gallery) = images(self.image_url, self.gallery_images, options);

        ListingItem {
            id: self.id.to_string(),
            kind,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            image_url,
            category: non_blank(self.property_type),
            location: self.location.unwrap_or_default(),
            tags,
            price: display_price(self.price, kind, options),
            duration: None,
            gallery,
            itinerary: Vec::new(),
            inclusions: Vec::new(),
            exclusions: Vec::new(),
            created_at: self.created_at,
        }
    }
}

impl Normalize for ServiceRecord {
    fn normalize(self, options: &TransformOptions) -> ListingItem {
        let kind = ItemKind::Service;
        let (image_url, gallery) = images(self.image_url, self.gallery_images, options);

        let mut itinerary = self.itinerary;
        // Steps without an explicit day keep authoring order after numbered ones
        itinerary.sort_by_key(|step| step.day.unwrap_or(u32::MAX));

        ListingItem {
            id: self.id.to_string(),
            kind,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            image_url,
            category: non_blank(self.category),
            location: self.destination.unwrap_or_default(),
            tags: self.tags,
            price: display_price(self.price, kind, options),
            duration: non_blank(self.duration),
            gallery,
            itinerary,
            inclusions: self.inclusions,
            exclusions: self.exclusions,
            created_at: self.created_at,
        }
    }
}

impl Normalize for SurveyBoqRecord {
    fn normalize(self, options: &TransformOptions) -> ListingItem {
        let kind = ItemKind::SurveyBoq;
        let (image_url, gallery) = images(self.image_url, self.gallery_images, options);
        let tags = non_blank(self.client).into_iter().collect();

        ListingItem {
            id: self.id.to_string(),
            kind,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            image_url,
            category: non_blank(self.category),
            location: self.location.unwrap_or_default(),
            tags,
            price: display_price(self.price, kind, options),
            duration: non_blank(self.turnaround),
            gallery,
            itinerary: Vec::new(),
            inclusions: self.deliverables,
            exclusions: Vec::new(),
            created_at: self.created_at,
        }
    }
}

/// Parse a raw row of the given kind and normalize it.
///
/// Malformed fields fall back to their defaults; only a row that is not a JSON object fails.
pub fn transform_row(
    kind: ItemKind,
    row: Value,
    options: &TransformOptions,
) -> Result<ListingItem, serde_json::Error> {
    if !row.is_object() {
        return Err(serde::de::Error::custom(format!(
            "expected a JSON object row, got {}",
            value_kind(&row)
        )));
    }
    let item = match kind {
        ItemKind::Project => serde_json::from_value::<ProjectRecord>(row)?.normalize(options),
        ItemKind::RealEstateDeal => serde_json::from_value::<DealRecord>(row)?.normalize(options),
        ItemKind::Service => serde_json::from_value::<ServiceRecord>(row)?.normalize(options),
        ItemKind::SurveyBoq => serde_json::from_value::<SurveyBoqRecord>(row)?.normalize(options),
    };
    Ok(item)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Main image plus gallery, falling back to a one-image gallery
fn images(
    image_url: Option<String>,
    gallery_images: Vec<String>,
    options: &TransformOptions,
) -> (String, Vec<String>) {
    let gallery: Vec<String> = gallery_images
        .into_iter()
        .filter(|url| !url.trim().is_empty())
        .collect();

    match non_blank(image_url) {
        Some(main) if gallery.is_empty() => (main.clone(), vec![main]),
        Some(main) => (main, gallery),
        None => match gallery.first() {
            Some(first) => (first.clone(), gallery),
            None => (options.placeholder_image.clone(), Vec::new()),
        },
    }
}

fn display_price(price: Option<Price>, kind: ItemKind, options: &TransformOptions) -> String {
    match price {
        Some(Price::Amount(amount)) if amount > 0.0 => {
            format!("{} {}", options.currency, group_thousands(amount.round() as u64))
        }
        Some(Price::Text(text)) if !text.trim().is_empty() => text.trim().to_string(),
        _ => kind.missing_price_label().to_string(),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItineraryStep;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn project_without_gallery_uses_main_image() {
        let item = transform_row(
            ItemKind::Project,
            json!({
                "id": 3,
                "title": "Kololo Estate",
                "image_url": "https://cdn.example/kololo.jpg",
                "category": "Residential",
                "location": "Kololo, Kampala",
            }),
            &TransformOptions::default(),
        )
        .unwrap();

        assert_eq!(item.id, "3");
        assert_eq!(item.image_url, "https://cdn.example/kololo.jpg");
        assert_eq!(item.gallery, vec!["https://cdn.example/kololo.jpg".to_string()]);
        assert_eq!(item.price, "Negotiable");
        assert_eq!(item.category.as_deref(), Some("Residential"));
    }

    #[test]
    fn missing_image_and_gallery_fall_back_to_placeholder() {
        let item = ProjectRecord::default().normalize(&TransformOptions::default());

        assert_eq!(item.image_url, "/images/placeholder.jpg");
        assert!(item.gallery.is_empty());
        assert_eq!(item.title, "");
        assert_eq!(item.category, None);
    }

    #[test]
    fn gallery_without_main_image_promotes_first_entry() {
        let record = DealRecord {
            gallery_images: vec!["a.jpg".into(), "b.jpg".into()],
            ..Default::default()
        };
        let item = record.normalize(&TransformOptions::default());

        assert_eq!(item.image_url, "a.jpg");
        assert_eq!(item.gallery.len(), 2);
    }

    #[test]
    fn service_defaults_to_contact_for_quote() {
        let item = transform_row(
            ItemKind::Service,
            json!({ "id": "svc-1", "title": "Roof repair", "price": "  " }),
            &TransformOptions::default(),
        )
        .unwrap();

        assert_eq!(item.price, "Contact for Quote");
    }

    #[test]
    fn numeric_prices_are_grouped_with_currency() {
        let item = transform_row(
            ItemKind::RealEstateDeal,
            json!({ "id": 9, "price": 1250000 }),
            &TransformOptions::default(),
        )
        .unwrap();

        assert_eq!(item.price, "UGX 1,250,000");
    }

    #[test]
    fn blank_category_is_uncategorized() {
        let item = transform_row(
            ItemKind::SurveyBoq,
            json!({ "id": 1, "category": "   " }),
            &TransformOptions::default(),
        )
        .unwrap();

        assert_eq!(item.category, None);
        assert_eq!(item.price, "Contact for Quote");
    }

    #[test]
    fn service_itinerary_is_ordered_by_day() {
        let record = ServiceRecord {
            itinerary: vec![
                ItineraryStep { day: Some(2), title: "Foundation".into(), ..Default::default() },
                ItineraryStep { day: None, title: "Handover".into(), ..Default::default() },
                ItineraryStep { day: Some(1), title: "Survey".into(), ..Default::default() },
            ],
            ..Default::default()
        };
        let item = record.normalize(&TransformOptions::default());
        let titles: Vec<_> = item.itinerary.iter().map(|s| s.title.as_str()).collect();

        assert_eq!(titles, vec!["Survey", "Foundation", "Handover"]);
    }

    #[test]
    fn group_thousands_inserts_separators() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(450000000), "450,000,000");
    }

    #[test]
    fn non_object_rows_are_rejected() {
        let options = TransformOptions::default();

        assert!(transform_row(ItemKind::Project, json!("oops"), &options).is_err());
        assert!(transform_row(ItemKind::Project, json!([1, "Kololo Estate"]), &options).is_err());
        assert!(transform_row(ItemKind::Project, Value::Null, &options).is_err());
    }

    #[test]
    fn naive_timestamp_keeps_the_row() {
        let item = transform_row(
            ItemKind::Project,
            json!({ "id": 1, "title": "Kololo Estate", "created_at": "2024-03-02T09:00:00" }),
            &TransformOptions::default(),
        )
        .unwrap();

        assert_eq!(item.title, "Kololo Estate");
        assert_eq!(
            item.created_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn unparseable_timestamp_becomes_none() {
        let item = transform_row(
            ItemKind::Service,
            json!({ "id": 1, "created_at": "last tuesday" }),
            &TransformOptions::default(),
        )
        .unwrap();

        assert_eq!(item.created_at, None);
    }

    #[test]
    fn null_gallery_entries_are_dropped() {
        let item = transform_row(
            ItemKind::Project,
            json!({ "id": 2, "gallery_images": ["a.jpg", null, 7, "b.jpg"] }),
            &TransformOptions::default(),
        )
        .unwrap();

        assert_eq!(item.gallery, vec!["a.jpg".to_string(), "b.jpg".to_string()]);
        assert_eq!(item.image_url, "a.jpg");
    }

    #[test]
    fn wrong_typed_price_falls_back_to_label() {
        let options = TransformOptions::default();
        let object = transform_row(
            ItemKind::RealEstateDeal,
            json!({ "id": 1, "price": { "amount": 5 } }),
            &options,
        )
        .unwrap();
        let boolean =
            transform_row(ItemKind::Service, json!({ "id": 2, "price": true }), &options).unwrap();

        assert_eq!(object.price, "Negotiable");
        assert_eq!(boolean.price, "Contact for Quote");
    }

    #[test]
    fn odd_ids_degrade_instead_of_failing() {
        let options = TransformOptions::default();
        let text_null =
            transform_row(ItemKind::Project, json!({ "id": "null", "title": "A" }), &options).unwrap();
        let object =
            transform_row(ItemKind::Project, json!({ "id": { "v": 1 }, "title": "B" }), &options)
                .unwrap();

        assert_eq!(text_null.id, "null");
        assert_eq!(object.id, "");
        assert_eq!(object.title, "B");
    }

    #[test]
    fn wrong_typed_text_fields_become_empty() {
        let item = transform_row(
            ItemKind::Service,
            json!({
                "id": 4,
                "title": 42,
                "category": ["Residential"],
                "inclusions": "Labour",
                "itinerary": [{ "day": "two", "title": "Foundation" }, "bogus"]
            }),
            &TransformOptions::default(),
        )
        .unwrap();

        assert_eq!(item.title, "");
        assert_eq!(item.category, None);
        assert!(item.inclusions.is_empty());
        assert_eq!(item.itinerary.len(), 1);
        assert_eq!(item.itinerary[0].title, "Foundation");
        assert_eq!(item.itinerary[0].day, None);
    }
}
