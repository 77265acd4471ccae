//! Typed error handling for the marketplace API
//!
//! Every error knows its HTTP status and a stable machine-readable code, and
//! renders as `{"detail": "...", "code": "..."}`. The `detail` text is meant to
//! be shown to the user verbatim.
//!
//! # Error Categories
//!
//! - [`VenueError`]: venue lookups and ownership
//! - [`AccountError`]: signup, verification, login and vendor approval
//! - [`ValidationError`]: rejected input
//! - [`RequestError`]: authentication, authorization and malformed requests
//! - [`StorageError`]: the backing store
//!
//! # Example
//!
//! ```rust,ignore
//! async fn get_venue(id: i64) -> MarketplaceResult<Venue> {
//!     store.venue(id).await?.ok_or(VenueError::NotFound { id }.into())
//! }
//! ```

use crate::core::filter::UnknownBracket;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type of the marketplace API
#[derive(Debug)]
pub enum MarketplaceError {
    /// Venue lookups and ownership
    Venue(VenueError),

    /// Account lifecycle (users, vendors, admin)
    Account(AccountError),

    /// Rejected input
    Validation(ValidationError),

    /// Authentication and malformed requests
    Request(RequestError),

    /// Backing store failures
    Storage(StorageError),

    /// Should not happen in normal operation
    Internal(String),
}

impl fmt::Display for MarketplaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketplaceError::Venue(e) => write!(f, "{}", e),
            MarketplaceError::Account(e) => write!(f, "{}", e),
            MarketplaceError::Validation(e) => write!(f, "{}", e),
            MarketplaceError::Request(e) => write!(f, "{}", e),
            MarketplaceError::Storage(e) => write!(f, "{}", e),
            MarketplaceError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for MarketplaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MarketplaceError::Venue(e) => Some(e),
            MarketplaceError::Account(e) => Some(e),
            MarketplaceError::Validation(e) => Some(e),
            MarketplaceError::Request(e) => Some(e),
            MarketplaceError::Storage(e) => Some(e),
            MarketplaceError::Internal(_) => None,
        }
    }
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable message, shown verbatim by clients
    pub detail: String,
    /// Error code for programmatic handling
    pub code: String,
    /// Per-field messages for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldValidationError>>,
}

impl MarketplaceError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            MarketplaceError::Venue(e) => e.status_code(),
            MarketplaceError::Account(e) => e.status_code(),
            MarketplaceError::Validation(_) => StatusCode::BAD_REQUEST,
            MarketplaceError::Request(e) => e.status_code(),
            MarketplaceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            MarketplaceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            MarketplaceError::Venue(e) => e.error_code(),
            MarketplaceError::Account(e) => e.error_code(),
            MarketplaceError::Validation(_) => "VALIDATION_ERROR",
            MarketplaceError::Request(e) => e.error_code(),
            MarketplaceError::Storage(_) => "STORAGE_ERROR",
            MarketplaceError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        let errors = match self {
            MarketplaceError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(errors.clone())
            }
            _ => None,
        };

        ErrorResponse {
            detail: self.to_string(),
            code: self.error_code().to_string(),
            errors,
        }
    }

    /// Shorthand for a single-field validation failure
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        MarketplaceError::Validation(ValidationError::FieldError {
            field: field.to_string(),
            message: message.into(),
        })
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        MarketplaceError::Request(RequestError::Unauthorized {
            message: message.into(),
        })
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        MarketplaceError::Request(RequestError::Forbidden {
            message: message.into(),
        })
    }
}

impl IntoResponse for MarketplaceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Venue Errors
// =============================================================================

/// Errors related to venue operations
#[derive(Debug)]
pub enum VenueError {
    /// Venue missing, inactive, or owned by another vendor
    NotFound { id: i64 },
}

impl fmt::Display for VenueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VenueError::NotFound { .. } => write!(f, "Venue not found"),
        }
    }
}

impl std::error::Error for VenueError {}

impl VenueError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            VenueError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            VenueError::NotFound { .. } => "VENUE_NOT_FOUND",
        }
    }
}

impl From<VenueError> for MarketplaceError {
    fn from(err: VenueError) -> Self {
        MarketplaceError::Venue(err)
    }
}

// =============================================================================
// Account Errors
// =============================================================================

/// Errors related to the account lifecycle
#[derive(Debug)]
pub enum AccountError {
    /// A user account already uses this e-mail
    EmailTaken,

    /// A vendor account already uses this e-mail
    VendorEmailTaken,

    /// A vendor account already uses this CNIC
    CnicTaken,

    /// Unknown e-mail or wrong password
    InvalidCredentials,

    /// Account exists but its e-mail is not verified yet
    NotVerified,

    /// Account has been deactivated
    Deactivated,

    /// Vendor is verified but not approved by an admin
    PendingApproval,

    /// Vendor must be approved before publishing venues
    VendorNotApproved,

    /// Admin approval attempted on an unverified vendor
    VendorNotVerified { vendor_id: i64 },

    VendorNotFound { vendor_id: i64 },

    /// Verification token unknown (or already used)
    InvalidVerificationToken,

    VerificationTokenExpired,

    /// Resend requested for an address with no signup in flight
    NoPendingVerification,
}

impl fmt::Display for AccountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountError::EmailTaken => write!(f, "Email already registered"),
            AccountError::VendorEmailTaken => write!(f, "Email already registered as vendor"),
            AccountError::CnicTaken => write!(f, "CNIC number already registered"),
            AccountError::InvalidCredentials => write!(f, "Incorrect email or password"),
            AccountError::NotVerified => {
                write!(f, "Please verify your email address before logging in")
            }
            AccountError::Deactivated => write!(f, "Account is deactivated"),
            AccountError::PendingApproval => {
                write!(f, "Your vendor account is pending admin approval")
            }
            AccountError::VendorNotApproved => write!(
                f,
                "Your vendor account must be approved before adding venues"
            ),
            AccountError::VendorNotVerified { .. } => {
                write!(f, "Vendor must be verified before approval")
            }
            AccountError::VendorNotFound { .. } => write!(f, "Vendor not found"),
            AccountError::InvalidVerificationToken => {
                write!(f, "Invalid or expired verification token")
            }
            AccountError::VerificationTokenExpired => {
                write!(f, "Verification token has expired")
            }
            AccountError::NoPendingVerification => {
                write!(f, "No pending verification found for this email")
            }
        }
    }
}

impl std::error::Error for AccountError {}

impl AccountError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AccountError::EmailTaken => StatusCode::BAD_REQUEST,
            AccountError::VendorEmailTaken => StatusCode::BAD_REQUEST,
            AccountError::CnicTaken => StatusCode::BAD_REQUEST,
            AccountError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AccountError::NotVerified => StatusCode::UNAUTHORIZED,
            AccountError::Deactivated => StatusCode::UNAUTHORIZED,
            AccountError::PendingApproval => StatusCode::UNAUTHORIZED,
            AccountError::VendorNotApproved => StatusCode::FORBIDDEN,
            AccountError::VendorNotVerified { .. } => StatusCode::BAD_REQUEST,
            AccountError::VendorNotFound { .. } => StatusCode::NOT_FOUND,
            AccountError::InvalidVerificationToken => StatusCode::BAD_REQUEST,
            AccountError::VerificationTokenExpired => StatusCode::BAD_REQUEST,
            AccountError::NoPendingVerification => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AccountError::EmailTaken => "EMAIL_TAKEN",
            AccountError::VendorEmailTaken => "VENDOR_EMAIL_TAKEN",
            AccountError::CnicTaken => "CNIC_TAKEN",
            AccountError::InvalidCredentials => "INVALID_CREDENTIALS",
            AccountError::NotVerified => "NOT_VERIFIED",
            AccountError::Deactivated => "ACCOUNT_DEACTIVATED",
            AccountError::PendingApproval => "PENDING_APPROVAL",
            AccountError::VendorNotApproved => "VENDOR_NOT_APPROVED",
            AccountError::VendorNotVerified { .. } => "VENDOR_NOT_VERIFIED",
            AccountError::VendorNotFound { .. } => "VENDOR_NOT_FOUND",
            AccountError::InvalidVerificationToken => "INVALID_VERIFICATION_TOKEN",
            AccountError::VerificationTokenExpired => "VERIFICATION_TOKEN_EXPIRED",
            AccountError::NoPendingVerification => "NO_PENDING_VERIFICATION",
        }
    }
}

impl From<AccountError> for MarketplaceError {
    fn from(err: AccountError) -> Self {
        MarketplaceError::Account(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug)]
pub enum ValidationError {
    /// Single field validation error
    FieldError { field: String, message: String },

    /// Multiple field validation errors
    FieldErrors(Vec<FieldValidationError>),

    /// Invalid JSON format
    InvalidJson { message: String },

    /// Query-string parameter outside its allowed values
    InvalidQuery { message: String },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldError { message, .. } => write!(f, "{}", message),
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
                write!(f, "{}", msgs.join("; "))
            }
            ValidationError::InvalidJson { message } => write!(f, "Invalid JSON: {}", message),
            ValidationError::InvalidQuery { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for MarketplaceError {
    fn from(err: ValidationError) -> Self {
        MarketplaceError::Validation(err)
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug)]
pub enum RequestError {
    /// Invalid request body
    InvalidBody { message: String },

    /// Missing or unusable credentials
    Unauthorized { message: String },

    /// Authenticated but not allowed
    Forbidden { message: String },

    /// Upload exceeds a size ceiling
    PayloadTooLarge { message: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvalidBody { message } => {
                write!(f, "Invalid request body: {}", message)
            }
            RequestError::Unauthorized { message } => write!(f, "{}", message),
            RequestError::Forbidden { message } => write!(f, "{}", message),
            RequestError::PayloadTooLarge { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            RequestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RequestError::Forbidden { .. } => StatusCode::FORBIDDEN,
            // Matches the original API, which reports oversized uploads as 400.
            RequestError::PayloadTooLarge { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidBody { .. } => "INVALID_BODY",
            RequestError::Unauthorized { .. } => "UNAUTHORIZED",
            RequestError::Forbidden { .. } => "FORBIDDEN",
            RequestError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
        }
    }
}

impl From<RequestError> for MarketplaceError {
    fn from(err: RequestError) -> Self {
        MarketplaceError::Request(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to the backing store
#[derive(Debug)]
pub enum StorageError {
    /// A lock guarding in-memory state was poisoned
    LockPoisoned { message: String },

    /// Any other backend failure
    Backend { message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::LockPoisoned { message } => {
                write!(f, "Storage lock poisoned: {}", message)
            }
            StorageError::Backend { message } => write!(f, "Storage error: {}", message),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for MarketplaceError {
    fn from(err: StorageError) -> Self {
        MarketplaceError::Storage(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for MarketplaceError {
    fn from(err: serde_json::Error) -> Self {
        MarketplaceError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<UnknownBracket> for MarketplaceError {
    fn from(err: UnknownBracket) -> Self {
        MarketplaceError::Validation(ValidationError::InvalidQuery {
            message: err.to_string(),
        })
    }
}

impl From<validator::ValidationErrors> for MarketplaceError {
    fn from(errs: validator::ValidationErrors) -> Self {
        let mut errors: Vec<FieldValidationError> = errs
            .field_errors()
            .into_iter()
            .flat_map(|(field, list)| {
                list.iter().map(move |e| FieldValidationError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("'{}' is invalid", field)),
                })
            })
            .collect();
        errors.sort_by(|a, b| a.field.cmp(&b.field));
        MarketplaceError::Validation(ValidationError::FieldErrors(errors))
    }
}

impl From<axum::extract::multipart::MultipartError> for MarketplaceError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        MarketplaceError::Request(RequestError::InvalidBody {
            message: err.body_text(),
        })
    }
}

/// Store plumbing reports through anyhow
impl From<anyhow::Error> for MarketplaceError {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<StorageError>() {
            Ok(storage) => return MarketplaceError::Storage(storage),
            Err(other) => other,
        };
        match err.downcast::<AccountError>() {
            Ok(account) => MarketplaceError::Account(account),
            Err(other) => MarketplaceError::Internal(other.to_string()),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for marketplace operations
pub type MarketplaceResult<T> = Result<T, MarketplaceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_venue_not_found_display_and_status() {
        let err = MarketplaceError::from(VenueError::NotFound { id: 4 });
        assert_eq!(err.to_string(), "Venue not found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), "VENUE_NOT_FOUND");
    }

    #[test]
    fn test_account_errors_map_to_expected_status() {
        assert_eq!(
            AccountError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AccountError::VendorNotApproved.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AccountError::CnicTaken.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_field_errors_join_messages() {
        let err = ValidationError::FieldErrors(vec![
            FieldValidationError {
                field: "capacity".into(),
                message: "too small".into(),
            },
            FieldValidationError {
                field: "price_per_day".into(),
                message: "too cheap".into(),
            },
        ]);
        assert_eq!(err.to_string(), "too small; too cheap");
    }

    #[test]
    fn test_response_carries_field_errors() {
        let err = MarketplaceError::Validation(ValidationError::FieldErrors(vec![
            FieldValidationError {
                field: "capacity".into(),
                message: "too small".into(),
            },
        ]));
        let response = err.to_response();
        assert_eq!(response.detail, "too small");
        assert_eq!(response.errors.map(|e| e.len()), Some(1));
    }

    #[test]
    fn test_unknown_bracket_is_a_validation_error() {
        let err = MarketplaceError::from(UnknownBracket("huge".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("huge"));
    }

    #[test]
    fn test_anyhow_storage_error_is_preserved() {
        let err = MarketplaceError::from(anyhow::Error::new(StorageError::LockPoisoned {
            message: "venues".into(),
        }));
        assert!(matches!(err, MarketplaceError::Storage(_)));
    }
}
