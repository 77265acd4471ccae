//! Marketplace form rules
//!
//! The minimums here are enforced when a venue is created or edited. The
//! filter engine never relies on them.

use super::filters::strip_non_digits;
use crate::core::error::{FieldValidationError, MarketplaceError, RequestError, ValidationError};
use crate::core::venue::VenueDraft;

pub const MIN_CAPACITY: i64 = 21;
pub const MIN_PRICE_PER_DAY: f64 = 1000.0;
pub const CNIC_DIGITS: usize = 13;
pub const MIN_PHONE_DIGITS: usize = 10;

pub const CAPACITY_MESSAGE: &str = "Guest capacity must be at least 21 guests";
pub const PRICE_MESSAGE: &str = "Price must be at least PKR 1000";
pub const CNIC_MESSAGE: &str = "CNIC number must be exactly 13 digits";
pub const PHONE_MESSAGE: &str = "Phone number must be at least 10 digits";

const MIB: usize = 1024 * 1024;

pub fn check_capacity(capacity: i64) -> Result<(), FieldValidationError> {
    if capacity < MIN_CAPACITY {
        return Err(field_error("capacity", CAPACITY_MESSAGE));
    }
    Ok(())
}

pub fn check_price(price_per_day: f64) -> Result<(), FieldValidationError> {
    if price_per_day.is_nan() || price_per_day < MIN_PRICE_PER_DAY {
        return Err(field_error("price_per_day", PRICE_MESSAGE));
    }
    Ok(())
}

/// Strip separators and require exactly thirteen digits
///
/// Returns the bare digits, which is the stored form.
pub fn normalize_cnic(input: &str) -> Result<String, FieldValidationError> {
    let cleaned: String = input.chars().filter(|c| *c != '-' && *c != ' ').collect();
    if cleaned.len() != CNIC_DIGITS || !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return Err(field_error("cnic_number", CNIC_MESSAGE));
    }
    Ok(cleaned)
}

/// Submission-time CNIC check on whatever the user typed
pub fn cnic_is_complete(input: &str) -> bool {
    strip_non_digits(input).len() == CNIC_DIGITS
}

pub fn check_phone(phone: &str) -> Result<(), FieldValidationError> {
    let cleaned: String = phone
        .chars()
        .filter(|c| !matches!(c, '-' | ' ' | '+'))
        .collect();
    if cleaned.chars().count() < MIN_PHONE_DIGITS {
        return Err(field_error("phone", PHONE_MESSAGE));
    }
    Ok(())
}

/// Validate every field of a venue draft, collecting all failures
pub fn check_venue_draft(draft: &VenueDraft) -> Result<(), MarketplaceError> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("name", &draft.name),
        ("venue_type", &draft.venue_type),
        ("city", &draft.city),
        ("address", &draft.address),
    ] {
        if value.trim().is_empty() {
            errors.push(field_error(field, &format!("'{}' is required", field)));
        }
    }
    errors.extend(check_capacity(draft.capacity).err());
    errors.extend(check_price(draft.price_per_day).err());

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::FieldErrors(errors).into())
    }
}

/// What an uploaded image is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    VenueImage,
    IdentityDocument,
}

impl UploadKind {
    fn describe(&self) -> &'static str {
        match self {
            UploadKind::VenueImage => "Image",
            UploadKind::IdentityDocument => "CNIC image",
        }
    }
}

/// Size ceilings per upload kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UploadLimits {
    pub venue_image_max_bytes: usize,
    pub identity_image_max_bytes: usize,
}

impl UploadLimits {
    /// Ceilings applied by the signup and venue forms before submitting
    pub fn client() -> Self {
        Self {
            venue_image_max_bytes: 10 * MIB,
            identity_image_max_bytes: 2 * MIB,
        }
    }

    /// Ceilings applied by the API on receipt
    pub fn server() -> Self {
        Self {
            venue_image_max_bytes: 10 * MIB,
            identity_image_max_bytes: 3 * MIB,
        }
    }

    pub fn max_bytes(&self, kind: UploadKind) -> usize {
        match kind {
            UploadKind::VenueImage => self.venue_image_max_bytes,
            UploadKind::IdentityDocument => self.identity_image_max_bytes,
        }
    }

    /// Reject non-image MIME types and oversized files
    ///
    /// A missing content type is accepted; the server cannot always know it.
    pub fn check(
        &self,
        kind: UploadKind,
        file_name: &str,
        content_type: Option<&str>,
        size: usize,
    ) -> Result<(), MarketplaceError> {
        if let Some(mime) = content_type {
            if !mime.starts_with("image/") {
                return Err(MarketplaceError::field(
                    file_name,
                    "Please upload only image files",
                ));
            }
        }

        let max = self.max_bytes(kind);
        if size > max {
            return Err(RequestError::PayloadTooLarge {
                message: format!(
                    "{} {} is too large. Maximum {}MB allowed.",
                    kind.describe(),
                    file_name,
                    max / MIB
                ),
            }
            .into());
        }
        Ok(())
    }
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self::server()
    }
}

fn field_error(field: &str, message: &str) -> FieldValidationError {
    FieldValidationError {
        field: field.to_string(),
        message: message.to_string(),
    }
}

impl From<FieldValidationError> for MarketplaceError {
    fn from(err: FieldValidationError) -> Self {
        MarketplaceError::Validation(ValidationError::FieldError {
            field: err.field,
            message: err.message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::venue::Amenities;

    fn draft(capacity: i64, price: f64) -> VenueDraft {
        VenueDraft {
            name: "Marquee".into(),
            description: String::new(),
            venue_type: "Wedding Hall".into(),
            city: "Lahore".into(),
            address: "Main Boulevard".into(),
            capacity,
            price_per_day: price,
            amenities: Amenities::default(),
        }
    }

    #[test]
    fn test_capacity_minimum() {
        assert!(check_capacity(20).is_err());
        assert!(check_capacity(21).is_ok());
        assert!(check_capacity(100_000).is_ok());
    }

    #[test]
    fn test_price_minimum() {
        assert_eq!(check_price(999.0).unwrap_err().message, PRICE_MESSAGE);
        assert!(check_price(1000.0).is_ok());
        assert!(check_price(f64::NAN).is_err());
    }

    #[test]
    fn test_normalize_cnic() {
        assert_eq!(normalize_cnic("35202-1234567-1").unwrap(), "3520212345671");
        assert!(normalize_cnic("35202-1234567").is_err());
        assert!(normalize_cnic("35202-123456a-1").is_err());
    }

    #[test]
    fn test_cnic_is_complete() {
        assert!(cnic_is_complete("35202-1234567-1"));
        assert!(!cnic_is_complete("35202-1234"));
    }

    #[test]
    fn test_phone_minimum_digits() {
        assert!(check_phone("+92 300-1234567").is_ok());
        assert!(check_phone("0300-123").is_err());
    }

    #[test]
    fn test_draft_collects_all_failures() {
        let err = check_venue_draft(&draft(10, 500.0)).unwrap_err();
        match err {
            MarketplaceError::Validation(ValidationError::FieldErrors(errors)) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["capacity", "price_per_day"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(check_venue_draft(&draft(21, 1000.0)).is_ok());
    }

    #[test]
    fn test_upload_rejects_non_images() {
        let limits = UploadLimits::client();
        let err = limits
            .check(UploadKind::VenueImage, "brochure.pdf", Some("application/pdf"), 10)
            .unwrap_err();
        assert_eq!(err.to_string(), "Please upload only image files");
    }

    #[test]
    fn test_upload_size_ceilings() {
        let client = UploadLimits::client();
        assert!(client
            .check(UploadKind::IdentityDocument, "front.jpg", Some("image/jpeg"), 2 * MIB)
            .is_ok());
        assert!(client
            .check(UploadKind::IdentityDocument, "front.jpg", Some("image/jpeg"), 2 * MIB + 1)
            .is_err());
        assert!(client
            .check(UploadKind::VenueImage, "hall.png", Some("image/png"), 10 * MIB)
            .is_ok());

        let server = UploadLimits::server();
        let err = server
            .check(UploadKind::IdentityDocument, "front.jpg", None, 3 * MIB + 1)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "CNIC image front.jpg is too large. Maximum 3MB allowed."
        );
    }
}
