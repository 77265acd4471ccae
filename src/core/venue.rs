//! Venue entity and its wire representation
//!
//! The API exchanges venues as [`VenueRecord`]s, where amenities travel as a
//! single `", "`-separated string and images as a JSON array of base64 payloads
//! packed into a string. Both are decoded exactly once, when a record becomes a
//! [`Venue`], and malformed payloads degrade to empty collections.

use base64::{Engine, engine::general_purpose::STANDARD};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Separator used by the amenities wire string
pub const AMENITY_SEPARATOR: &str = ", ";

/// Free-text amenity tags of a venue, insertion ordered and de-duplicated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Amenities(IndexSet<String>);

impl Amenities {
    /// Parse the `", "`-separated wire form
    ///
    /// Entries are trimmed and empty entries dropped, so `""` and `", ,"`
    /// both yield no amenities.
    pub fn parse(raw: &str) -> Self {
        raw.split(AMENITY_SEPARATOR)
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(String::from)
            .collect()
    }

    /// Decode a loosely typed JSON value (string, array of strings, or anything else)
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::parse(s),
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(String::from)
                .collect(),
            _ => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        let tag = tag.trim();
        !tag.is_empty() && self.0.insert(tag.to_string())
    }

    /// Wire form, `None` when there is nothing to send
    pub fn to_wire(&self) -> Option<String> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.joined())
        }
    }

    /// All tags joined with the wire separator
    pub fn joined(&self) -> String {
        self.iter().collect::<Vec<_>>().join(AMENITY_SEPARATOR)
    }

    /// Case-folded concatenation used for service matching
    ///
    /// Built from the parsed tags, so raw spacing around separators is
    /// normalized to `", "`. Matching whole or partial tags is unaffected.
    pub fn folded(&self) -> String {
        self.joined().to_lowercase()
    }
}

impl<S: Into<String>> FromIterator<S> for Amenities {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut amenities = Self::default();
        for tag in iter {
            amenities.insert(tag);
        }
        amenities
    }
}

/// A single venue image, kept as its base64 payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueImage(String);

impl VenueImage {
    /// Encode raw image bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(STANDARD.encode(bytes))
    }

    pub fn from_base64(payload: impl Into<String>) -> Self {
        Self(payload.into())
    }

    pub fn as_base64(&self) -> &str {
        &self.0
    }

    /// Decoded bytes, `None` if the payload is not valid base64
    pub fn bytes(&self) -> Option<Vec<u8>> {
        STANDARD.decode(&self.0).ok()
    }

    /// Inline `data:` URL suitable for an `<img src>`
    pub fn data_url(&self) -> String {
        format!("data:image/jpeg;base64,{}", self.0)
    }
}

/// Ordered images of a venue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueImages(Vec<VenueImage>);

impl VenueImages {
    /// Decode the JSON-array-in-a-string wire form
    ///
    /// Anything other than a JSON array of strings yields no images.
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value @ Value::Array(_)) => Self::from_value(&value),
            _ => Self::default(),
        }
    }

    /// Decode a loosely typed JSON value (string-encoded array or a plain array)
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::parse(s),
            Value::Array(items) => Self(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(VenueImage::from_base64)
                    .collect(),
            ),
            _ => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn first(&self) -> Option<&VenueImage> {
        self.0.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VenueImage> {
        self.0.iter()
    }

    pub fn push(&mut self, image: VenueImage) {
        self.0.push(image);
    }

    pub fn extend(&mut self, images: impl IntoIterator<Item = VenueImage>) {
        self.0.extend(images);
    }

    /// Wire form, `None` when there are no images
    pub fn to_wire(&self) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        let payloads: Vec<&str> = self.0.iter().map(VenueImage::as_base64).collect();
        serde_json::to_string(&payloads).ok()
    }
}

impl FromIterator<VenueImage> for VenueImages {
    fn from_iter<I: IntoIterator<Item = VenueImage>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Venue as it travels over the API
///
/// Every field the listing does not strictly need is lenient: `description`,
/// `amenities` and `images` accept `null` or any JSON shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueRecord {
    pub id: i64,
    #[serde(default)]
    pub vendor_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub venue_type: String,
    pub city: String,
    #[serde(default)]
    pub address: String,
    pub capacity: i64,
    pub price_per_day: f64,
    #[serde(default)]
    pub amenities: Value,
    #[serde(default)]
    pub images: Value,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

fn default_active() -> bool {
    true
}

/// A bookable event space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "VenueRecord", into = "VenueRecord")]
pub struct Venue {
    pub id: i64,
    pub vendor_id: i64,
    pub name: String,
    pub description: String,
    pub venue_type: String,
    pub city: String,
    pub address: String,
    pub capacity: i64,
    pub price_per_day: f64,
    pub amenities: Amenities,
    pub images: VenueImages,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<VenueRecord> for Venue {
    fn from(record: VenueRecord) -> Self {
        Self {
            id: record.id,
            vendor_id: record.vendor_id,
            name: record.name,
            description: record.description.unwrap_or_default(),
            venue_type: record.venue_type,
            city: record.city,
            address: record.address,
            capacity: record.capacity,
            price_per_day: record.price_per_day,
            amenities: Amenities::from_value(&record.amenities),
            images: VenueImages::from_value(&record.images),
            is_active: record.is_active,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl From<Venue> for VenueRecord {
    fn from(venue: Venue) -> Self {
        Self {
            id: venue.id,
            vendor_id: venue.vendor_id,
            name: venue.name,
            description: Some(venue.description),
            venue_type: venue.venue_type,
            city: venue.city,
            address: venue.address,
            capacity: venue.capacity,
            price_per_day: venue.price_per_day,
            amenities: venue.amenities.to_wire().map_or(Value::Null, Value::String),
            images: venue.images.to_wire().map_or(Value::Null, Value::String),
            is_active: venue.is_active,
            created_at: venue.created_at,
            updated_at: venue.updated_at,
        }
    }
}

/// Fields a vendor supplies when creating or editing a venue
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VenueDraft {
    pub name: String,
    pub description: String,
    pub venue_type: String,
    pub city: String,
    pub address: String,
    pub capacity: i64,
    pub price_per_day: f64,
    pub amenities: Amenities,
}

impl Venue {
    /// Build a venue from a draft, owned by `vendor_id`
    pub fn from_draft(id: i64, vendor_id: i64, draft: VenueDraft, images: VenueImages) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id,
            vendor_id,
            name: draft.name,
            description: draft.description,
            venue_type: draft.venue_type,
            city: draft.city,
            address: draft.address,
            capacity: draft.capacity,
            price_per_day: draft.price_per_day,
            amenities: draft.amenities,
            images,
            is_active: true,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Apply an edit, keeping identity, ownership and existing images
    pub fn apply_draft(&mut self, draft: VenueDraft) {
        self.name = draft.name;
        self.description = draft.description;
        self.venue_type = draft.venue_type;
        self.city = draft.city;
        self.address = draft.address;
        self.capacity = draft.capacity;
        self.price_per_day = draft.price_per_day;
        self.amenities = draft.amenities;
        self.touch();
    }

    /// Update the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_amenities_parse_splits_on_comma_space() {
        let amenities = Amenities::parse("Catering, Parking, Bridal Room");
        assert_eq!(
            amenities.iter().collect::<Vec<_>>(),
            vec!["Catering", "Parking", "Bridal Room"]
        );
    }

    #[test]
    fn test_folded_normalizes_separator_spacing() {
        let amenities = Amenities::parse("Hall,  Garden");
        assert_eq!(amenities.len(), 2);
        assert_eq!(amenities.folded(), "hall, garden");
    }

    #[test]
    fn test_amenities_parse_empty_string() {
        assert!(Amenities::parse("").is_empty());
        assert!(Amenities::parse(" , ").is_empty());
    }

    #[test]
    fn test_amenities_parse_deduplicates() {
        let amenities = Amenities::parse("Parking, Parking, Catering");
        assert_eq!(amenities.len(), 2);
        assert_eq!(amenities.joined(), "Parking, Catering");
    }

    #[test]
    fn test_amenities_from_non_string_is_empty() {
        assert!(Amenities::from_value(&json!(42)).is_empty());
        assert!(Amenities::from_value(&json!(null)).is_empty());
        assert!(Amenities::from_value(&json!({"a": 1})).is_empty());
    }

    #[test]
    fn test_amenities_from_array() {
        let amenities = Amenities::from_value(&json!(["Parking", 3, " Valet "]));
        assert_eq!(amenities.joined(), "Parking, Valet");
    }

    #[test]
    fn test_images_parse_json_array() {
        let images = VenueImages::parse(r#"["aGVsbG8=", "d29ybGQ="]"#);
        assert_eq!(images.len(), 2);
        assert_eq!(images.first().unwrap().bytes().unwrap(), b"hello");
    }

    #[test]
    fn test_images_malformed_json_is_empty() {
        assert!(VenueImages::parse("not json").is_empty());
        assert!(VenueImages::parse(r#"{"x": 1}"#).is_empty());
        assert!(VenueImages::from_value(&json!(7)).is_empty());
    }

    #[test]
    fn test_image_data_url() {
        let image = VenueImage::from_bytes(b"hello");
        assert_eq!(image.data_url(), "data:image/jpeg;base64,aGVsbG8=");
    }

    #[test]
    fn test_venue_decodes_wire_record() {
        let venue: Venue = serde_json::from_value(json!({
            "id": 1,
            "name": "Royal Palm",
            "description": null,
            "venue_type": "Banquet Hall",
            "city": "Lahore",
            "address": "Canal Road",
            "capacity": 300,
            "price_per_day": 20000.0,
            "amenities": "Catering, Parking",
            "images": "[\"aGVsbG8=\"]",
            "is_active": true,
            "created_at": "2024-01-01T00:00:00"
        }))
        .expect("record should decode");

        assert_eq!(venue.description, "");
        assert!(venue.amenities.contains("Parking"));
        assert_eq!(venue.images.len(), 1);
    }

    #[test]
    fn test_venue_serializes_wire_shape() {
        let mut venue = Venue::from_draft(
            7,
            3,
            VenueDraft {
                name: "Garden Court".into(),
                venue_type: "Garden Venue".into(),
                city: "Karachi".into(),
                capacity: 150,
                price_per_day: 5000.0,
                amenities: Amenities::parse("Parking"),
                ..Default::default()
            },
            VenueImages::default(),
        );
        venue.images.push(VenueImage::from_bytes(b"hello"));

        let value = serde_json::to_value(&venue).unwrap();
        assert_eq!(value["amenities"], json!("Parking"));
        assert_eq!(value["images"], json!("[\"aGVsbG8=\"]"));
        assert_eq!(value["vendor_id"], json!(3));
    }

    #[test]
    fn test_empty_collections_serialize_as_null() {
        let venue = Venue::from_draft(1, 1, VenueDraft::default(), VenueImages::default());
        let value = serde_json::to_value(&venue).unwrap();
        assert!(value["amenities"].is_null());
        assert!(value["images"].is_null());
    }
}
