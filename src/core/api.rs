//! Request and response bodies of the marketplace API
//!
//! Shared by the server handlers and the typed client so both sides agree on
//! the wire shapes.

use crate::core::filter::CapacityBracket;
use crate::core::validation::rules::PHONE_MESSAGE;
use crate::core::validation::{FieldRules, ValidatedPayload, filters, validators};
use crate::core::venue::VenueDraft;
use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_role() -> String {
    "user".to_string()
}

/// Customer signup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[serde(default = "default_role")]
    pub role: String,
}

impl ValidatedPayload for SignupRequest {
    fn rules() -> FieldRules {
        FieldRules::new()
            .filter("name", filters::trim())
            .filter("email", filters::trim())
            .filter("email", filters::lowercase())
            .filter("phone", filters::trim())
            .validate("phone", validators::min_digits(10, PHONE_MESSAGE))
    }
}

/// E-mail and password login, for customers and vendors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ValidatedPayload for LoginRequest {
    fn rules() -> FieldRules {
        FieldRules::new()
            .filter("email", filters::trim())
            .filter("email", filters::lowercase())
            .validate("email", validators::required())
            .validate("password", validators::required())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

impl ValidatedPayload for AdminLoginRequest {
    fn rules() -> FieldRules {
        FieldRules::new()
            .filter("username", filters::trim())
            .validate("username", validators::required())
            .validate("password", validators::required())
    }
}

/// Issued bearer token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
}

impl TokenResponse {
    pub fn bearer(access_token: String, user_type: Option<&str>) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            user_type: user_type.map(String::from),
        }
    }
}

/// Plain acknowledgement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            email: None,
        }
    }

    pub fn for_email(message: impl Into<String>, email: &str) -> Self {
        Self {
            message: message.into(),
            email: Some(email.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResendVerificationRequest {
    pub email: String,
}

impl ValidatedPayload for ResendVerificationRequest {
    fn rules() -> FieldRules {
        FieldRules::new()
            .filter("email", filters::trim())
            .filter("email", filters::lowercase())
            .validate("email", validators::required())
    }
}

/// Partial profile edit; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ValidatedPayload for ProfileUpdate {
    fn rules() -> FieldRules {
        FieldRules::new()
            .filter("name", filters::trim())
            .validate("name", validators::string_length(1, 100))
            .filter("phone", filters::trim())
            .validate("phone", validators::min_digits(10, PHONE_MESSAGE))
    }
}

/// Admin decision on a vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    pub vendor_id: i64,
    pub approved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalResponse {
    pub message: String,
    pub vendor_id: i64,
    pub vendor_name: String,
    pub is_active: bool,
}

/// An uploaded file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, content_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: Some(content_type.to_string()),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Vendor signup form (sent as multipart)
#[derive(Debug, Clone, PartialEq)]
pub struct VendorSignup {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub cnic_number: String,
    pub password: String,
    pub cnic_front_image: Option<Upload>,
    pub cnic_back_image: Option<Upload>,
}

/// Venue create/edit form (sent as multipart)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VenueForm {
    pub draft: VenueDraft,
    pub images: Vec<Upload>,
}

/// Choices offered by the listing and venue forms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub venue_types: Vec<String>,
    pub cities: Vec<String>,
    pub capacity_brackets: Vec<String>,
}

impl Catalog {
    pub fn new(venue_types: Vec<String>, cities: Vec<String>) -> Self {
        Self {
            venue_types,
            cities,
            capacity_brackets: CapacityBracket::ALL
                .iter()
                .map(|b| b.label().to_string())
                .collect(),
        }
    }
}
