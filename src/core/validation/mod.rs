//! Validation and filtering
//!
//! Closure-based field validators and filters for raw JSON payloads, plus the
//! typed marketplace rules (venue minimums, CNIC, phone, uploads).

pub mod config;
pub mod extractor;
pub mod filters;
pub mod rules;
pub mod validators;

pub use config::FieldRules;
pub use extractor::{Validated, ValidatedPayload};
pub use filters::format_cnic;
pub use rules::{UploadKind, UploadLimits};
