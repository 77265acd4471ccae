//! Admin login, vendor review and dashboard counters

use crate::core::account::{AdminStats, User, Vendor};
use crate::core::api::{AdminLoginRequest, ApprovalRequest, ApprovalResponse, TokenResponse};
use crate::core::auth::AccountKind;
use crate::core::error::{AccountError, MarketplaceError, MarketplaceResult};
use crate::core::validation::Validated;
use crate::server::extractors::CurrentAdmin;
use crate::server::host::AppState;
use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{Value, json};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/login", post(login))
        .route("/admin/vendors", get(list_vendors))
        .route("/admin/vendors/pending", get(pending_vendors))
        .route("/admin/vendors/approved", get(approved_vendors))
        .route("/admin/vendors/approve", post(approve_vendor))
        .route("/admin/vendors/{id}", get(vendor_details))
        .route("/admin/users", get(list_users))
        .route("/admin/stats", get(stats))
        .route("/admin/pending/expired", delete(purge_expired))
}

async fn login(
    State(host): State<AppState>,
    Validated(credentials): Validated<AdminLoginRequest>,
) -> MarketplaceResult<Json<TokenResponse>> {
    let admin = &host.config.admin;
    if credentials.username != admin.username || credentials.password != admin.password {
        tracing::warn!(username = %credentials.username, "rejected admin login");
        return Err(MarketplaceError::unauthorized("Incorrect username or password"));
    }

    let token = host.tokens.issue(AccountKind::Admin, &admin.username)?;
    Ok(Json(TokenResponse::bearer(
        token,
        Some(AccountKind::Admin.as_str()),
    )))
}

async fn list_vendors(
    State(host): State<AppState>,
    _admin: CurrentAdmin,
) -> MarketplaceResult<Json<Vec<Vendor>>> {
    let vendors = host.store.list_vendors().await?;
    Ok(Json(vendors.iter().map(Vendor::summary).collect()))
}

async fn pending_vendors(
    State(host): State<AppState>,
    _admin: CurrentAdmin,
) -> MarketplaceResult<Json<Vec<Vendor>>> {
    let vendors = host.store.list_vendors().await?;
    Ok(Json(
        vendors
            .iter()
            .filter(|v| v.is_pending())
            .map(Vendor::summary)
            .collect(),
    ))
}

async fn approved_vendors(
    State(host): State<AppState>,
    _admin: CurrentAdmin,
) -> MarketplaceResult<Json<Vec<Vendor>>> {
    let vendors = host.store.list_vendors().await?;
    Ok(Json(
        vendors
            .iter()
            .filter(|v| v.is_approved())
            .map(Vendor::summary)
            .collect(),
    ))
}

/// Full vendor record, identity images included
async fn vendor_details(
    State(host): State<AppState>,
    _admin: CurrentAdmin,
    Path(vendor_id): Path<i64>,
) -> MarketplaceResult<Json<Vendor>> {
    host.store
        .vendor(vendor_id)
        .await?
        .map(Json)
        .ok_or_else(|| AccountError::VendorNotFound { vendor_id }.into())
}

async fn approve_vendor(
    State(host): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    Json(request): Json<ApprovalRequest>,
) -> MarketplaceResult<Json<ApprovalResponse>> {
    let vendor_id = request.vendor_id;
    let mut vendor = host
        .store
        .vendor(vendor_id)
        .await?
        .ok_or(AccountError::VendorNotFound { vendor_id })?;

    if !vendor.is_verified {
        return Err(AccountError::VendorNotVerified { vendor_id }.into());
    }

    vendor.is_active = request.approved;
    vendor.updated_at = Utc::now();
    let vendor = host
        .store
        .update_vendor(vendor)
        .await?
        .ok_or(AccountError::VendorNotFound { vendor_id })?;

    let action = if request.approved { "approved" } else { "rejected" };
    tracing::info!(vendor_id, %admin, "vendor {action}");

    Ok(Json(ApprovalResponse {
        message: format!("Vendor {} successfully", action),
        vendor_id: vendor.id,
        vendor_name: vendor.name,
        is_active: vendor.is_active,
    }))
}

async fn list_users(
    State(host): State<AppState>,
    _admin: CurrentAdmin,
) -> MarketplaceResult<Json<Vec<User>>> {
    Ok(Json(host.store.list_users().await?))
}

async fn stats(
    State(host): State<AppState>,
    _admin: CurrentAdmin,
) -> MarketplaceResult<Json<AdminStats>> {
    let vendors = host.store.list_vendors().await?;
    Ok(Json(AdminStats {
        total_users: host.store.count_users().await?,
        total_vendors: vendors.len(),
        pending_vendors: vendors.iter().filter(|v| v.is_pending()).count(),
        approved_vendors: vendors.iter().filter(|v| v.is_approved()).count(),
    }))
}

async fn purge_expired(
    State(host): State<AppState>,
    _admin: CurrentAdmin,
) -> MarketplaceResult<Json<Value>> {
    let removed = host.store.purge_expired(Utc::now()).await?;
    tracing::info!(removed, "purged expired verifications");
    Ok(Json(json!({ "removed": removed })))
}
