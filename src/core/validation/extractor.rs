//! Axum extractor for validated JSON payloads
//!
//! This module provides the `Validated<T>` extractor that filters and validates
//! request payloads before they reach handlers.

use super::config::FieldRules;
use crate::core::error::{MarketplaceError, ValidationError};
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Payloads that declare their field rules
pub trait ValidatedPayload: DeserializeOwned {
    fn rules() -> FieldRules;
}

/// Axum extractor that filters, validates, then deserializes a payload
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn update_me(
///     Validated(update): Validated<ProfileUpdate>,
/// ) -> MarketplaceResult<Json<UserProfile>> {
///     // update is already trimmed and checked
/// }
/// ```
pub struct Validated<T>(pub T);

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: ValidatedPayload + Send,
{
    type Rejection = MarketplaceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload): Json<Value> = Json::from_request(req, state).await.map_err(|e| {
            MarketplaceError::Validation(ValidationError::InvalidJson {
                message: e.body_text(),
            })
        })?;

        let filtered = T::rules()
            .validate_and_filter(payload)
            .map_err(|errors| MarketplaceError::Validation(ValidationError::FieldErrors(errors)))?;

        Ok(Validated(serde_json::from_value(filtered)?))
    }
}
