//! Bearer-token extractors
//!
//! Use these in protected handlers to validate the JWT and load the account it
//! names. Each extractor checks the token kind against its [`AuthPolicy`].

use crate::core::account::{User, Vendor};
use crate::core::auth::{AccountKind, AuthContext, AuthPolicy};
use crate::core::error::MarketplaceError;
use crate::server::host::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Resolve and check the request's auth context
fn authorize(
    parts: &mut Parts,
    state: &AppState,
    policy: AuthPolicy,
) -> Result<AuthContext, MarketplaceError> {
    if let Some(context) = parts.extensions.get::<AuthContext>() {
        return check(context.clone(), &policy);
    }

    let context = state.tokens.context_from_headers(&parts.headers)?;
    if matches!(context, AuthContext::Anonymous) {
        tracing::debug!(uri = %parts.uri, "missing bearer token");
        return Err(MarketplaceError::unauthorized("Not authenticated"));
    }

    parts.extensions.insert(context.clone());
    check(context, &policy)
}

fn check(context: AuthContext, policy: &AuthPolicy) -> Result<AuthContext, MarketplaceError> {
    if policy.check(&context) {
        Ok(context)
    } else {
        Err(MarketplaceError::unauthorized(policy.denial()))
    }
}

/// The signed-in customer
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = MarketplaceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let context = authorize(parts, state, AuthPolicy::Kind(AccountKind::User))?;
        let Some(user_id) = context.user_id() else {
            return Err(MarketplaceError::unauthorized("Could not validate credentials"));
        };

        state
            .store
            .user(user_id)
            .await?
            .map(CurrentUser)
            .ok_or_else(|| MarketplaceError::unauthorized("User not found"))
    }
}

/// The signed-in vendor, approved or not
#[derive(Debug, Clone)]
pub struct CurrentVendor(pub Vendor);

impl FromRequestParts<AppState> for CurrentVendor {
    type Rejection = MarketplaceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let context = authorize(parts, state, AuthPolicy::Kind(AccountKind::Vendor))?;
        let Some(vendor_id) = context.vendor_id() else {
            return Err(MarketplaceError::unauthorized("Could not validate credentials"));
        };

        state
            .store
            .vendor(vendor_id)
            .await?
            .map(CurrentVendor)
            .ok_or_else(|| MarketplaceError::unauthorized("Vendor not found"))
    }
}

/// The admin, identified by username
#[derive(Debug, Clone)]
pub struct CurrentAdmin(pub String);

impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = MarketplaceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match authorize(parts, state, AuthPolicy::Kind(AccountKind::Admin))? {
            AuthContext::Admin { username } if username == state.config.admin.username => {
                Ok(CurrentAdmin(username))
            }
            _ => Err(MarketplaceError::unauthorized("Admin access required")),
        }
    }
}
