//! Vendor signup, login, profile and venue management

use super::auth::{VerifyParams, pending_matches, send_verification, take_pending};
use super::multipart::FormData;
use crate::core::account::{PendingAccount, PendingVerification, Vendor};
use crate::core::api::{LoginRequest, MessageResponse, ProfileUpdate, TokenResponse, Upload};
use crate::core::auth::{AccountKind, hash_password, verify_password};
use crate::core::error::{AccountError, MarketplaceError, MarketplaceResult, VenueError};
use crate::core::validation::rules::{check_phone, check_venue_draft, normalize_cnic};
use crate::core::validation::{UploadKind, UploadLimits, Validated};
use crate::core::venue::{Venue, VenueImage, VenueImages};
use crate::server::extractors::CurrentVendor;
use crate::server::host::{AppState, ServerHost};
use axum::extract::{Multipart, Path, Query, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use validator::ValidateEmail;

/// Identity images above this size are accepted but logged
const LARGE_IDENTITY_IMAGE_BYTES: usize = 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vendor/signup", post(signup))
        .route("/vendor/verify", get(verify))
        .route("/vendor/login", post(login))
        .route("/vendor/me", get(me))
        .route("/vendor/profile", put(update_profile))
        .route("/vendor/venues", get(list_venues).post(create_venue))
        .route(
            "/vendor/venues/{id}",
            get(get_venue).put(update_venue).delete(delete_venue),
        )
}

fn encode_identity_image(
    limits: &UploadLimits,
    upload: Option<&Upload>,
) -> MarketplaceResult<Option<String>> {
    let Some(upload) = upload else {
        return Ok(None);
    };
    limits.check(
        UploadKind::IdentityDocument,
        &upload.file_name,
        upload.content_type.as_deref(),
        upload.size(),
    )?;
    if upload.size() > LARGE_IDENTITY_IMAGE_BYTES {
        tracing::warn!(
            file = %upload.file_name,
            bytes = upload.size(),
            "large CNIC image"
        );
    }
    Ok(Some(STANDARD.encode(&upload.bytes)))
}

fn decode_venue_images(limits: &UploadLimits, uploads: &[Upload]) -> MarketplaceResult<VenueImages> {
    uploads
        .iter()
        .map(|upload| {
            limits.check(
                UploadKind::VenueImage,
                &upload.file_name,
                upload.content_type.as_deref(),
                upload.size(),
            )?;
            Ok(VenueImage::from_bytes(&upload.bytes))
        })
        .collect()
}

/// A venue owned by `vendor`, or 404
async fn owned_venue(host: &ServerHost, vendor: &Vendor, id: i64) -> MarketplaceResult<Venue> {
    host.store
        .venue(id)
        .await?
        .filter(|venue| venue.vendor_id == vendor.id)
        .ok_or_else(|| VenueError::NotFound { id }.into())
}

async fn signup(
    State(host): State<AppState>,
    multipart: Multipart,
) -> MarketplaceResult<Json<MessageResponse>> {
    let signup = FormData::read(multipart).await?.vendor_signup()?;

    let cnic_number = normalize_cnic(&signup.cnic_number)?;
    check_phone(&signup.phone)?;
    if !signup.email.validate_email() {
        return Err(MarketplaceError::field("email", "Invalid email address"));
    }

    if host.store.vendor_by_email(&signup.email).await?.is_some() {
        return Err(AccountError::VendorEmailTaken.into());
    }
    if host.store.vendor_by_cnic(&cnic_number).await?.is_some() {
        return Err(AccountError::CnicTaken.into());
    }

    let limits = host.upload_limits();
    let cnic_front_image = encode_identity_image(&limits, signup.cnic_front_image.as_ref())?;
    let cnic_back_image = encode_identity_image(&limits, signup.cnic_back_image.as_ref())?;

    let pending = PendingVerification::new(
        PendingAccount::Vendor {
            name: signup.name,
            email: signup.email.clone(),
            phone: signup.phone,
            cnic_number,
            cnic_front_image,
            cnic_back_image,
            password_hash: hash_password(&signup.password)?,
        },
        host.verification_ttl(),
    );
    host.store.save_pending(pending.clone()).await?;
    send_verification(&host, &pending).await;

    tracing::info!(email = %signup.email, "vendor signup pending verification");
    Ok(Json(MessageResponse::for_email(
        "Vendor registration submitted. Please check your email to verify your account. \
         Your account will be activated after admin approval.",
        &signup.email,
    )))
}

async fn verify(
    State(host): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> MarketplaceResult<Json<MessageResponse>> {
    let PendingAccount::Vendor {
        name,
        email,
        phone,
        cnic_number,
        cnic_front_image,
        cnic_back_image,
        password_hash,
    } = take_pending(&host, &params.token, true).await?
    else {
        return Err(AccountError::InvalidVerificationToken.into());
    };

    if host.store.vendor_by_email(&email).await?.is_some() {
        return Err(AccountError::VendorEmailTaken.into());
    }
    // Two pending signups may share a CNIC; the first one verified wins
    if host.store.vendor_by_cnic(&cnic_number).await?.is_some() {
        return Err(AccountError::CnicTaken.into());
    }

    let now = Utc::now();
    let vendor = host
        .store
        .insert_vendor(Vendor {
            id: 0,
            name,
            email,
            phone,
            cnic_number,
            cnic_front_image,
            cnic_back_image,
            password_hash,
            is_verified: true,
            is_active: false,
            created_at: now,
            updated_at: now,
        })
        .await?;

    tracing::info!(vendor_id = vendor.id, "vendor email verified, awaiting approval");
    Ok(Json(MessageResponse::for_email(
        "Email verified successfully. Your account is pending admin approval.",
        &vendor.email,
    )))
}

async fn login(
    State(host): State<AppState>,
    Validated(credentials): Validated<LoginRequest>,
) -> MarketplaceResult<Json<TokenResponse>> {
    let Some(vendor) = host.store.vendor_by_email(&credentials.email).await? else {
        if pending_matches(&host, &credentials.email, &credentials.password, true).await? {
            return Err(AccountError::NotVerified.into());
        }
        return Err(AccountError::InvalidCredentials.into());
    };

    if !verify_password(&credentials.password, &vendor.password_hash) {
        return Err(AccountError::InvalidCredentials.into());
    }
    if !vendor.is_verified {
        return Err(AccountError::NotVerified.into());
    }
    if !vendor.is_active {
        return Err(AccountError::PendingApproval.into());
    }

    let token = host
        .tokens
        .issue(AccountKind::Vendor, &vendor.id.to_string())?;
    Ok(Json(TokenResponse::bearer(
        token,
        Some(AccountKind::Vendor.as_str()),
    )))
}

async fn me(CurrentVendor(vendor): CurrentVendor) -> Json<Vendor> {
    Json(vendor)
}

async fn update_profile(
    State(host): State<AppState>,
    CurrentVendor(mut vendor): CurrentVendor,
    Validated(update): Validated<ProfileUpdate>,
) -> MarketplaceResult<Json<Vendor>> {
    if let Some(name) = update.name {
        vendor.name = name;
    }
    if let Some(phone) = update.phone {
        check_phone(&phone)?;
        vendor.phone = phone;
    }
    vendor.updated_at = Utc::now();

    let vendor = host
        .store
        .update_vendor(vendor)
        .await?
        .ok_or_else(|| MarketplaceError::unauthorized("Vendor not found"))?;
    Ok(Json(vendor))
}

async fn list_venues(
    State(host): State<AppState>,
    CurrentVendor(vendor): CurrentVendor,
) -> MarketplaceResult<Json<Vec<Venue>>> {
    Ok(Json(host.store.venues_by_vendor(vendor.id).await?))
}

async fn get_venue(
    State(host): State<AppState>,
    CurrentVendor(vendor): CurrentVendor,
    Path(id): Path<i64>,
) -> MarketplaceResult<Json<Venue>> {
    Ok(Json(owned_venue(&host, &vendor, id).await?))
}

async fn create_venue(
    State(host): State<AppState>,
    CurrentVendor(vendor): CurrentVendor,
    multipart: Multipart,
) -> MarketplaceResult<Json<Venue>> {
    if !vendor.is_active {
        return Err(AccountError::VendorNotApproved.into());
    }

    let form = FormData::read(multipart).await?.venue_form()?;
    check_venue_draft(&form.draft)?;
    let images = decode_venue_images(&host.upload_limits(), &form.images)?;

    let venue = host
        .store
        .insert_venue(Venue::from_draft(0, vendor.id, form.draft, images))
        .await?;

    tracing::info!(venue_id = venue.id, vendor_id = vendor.id, "venue created");
    Ok(Json(venue))
}

async fn update_venue(
    State(host): State<AppState>,
    CurrentVendor(vendor): CurrentVendor,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> MarketplaceResult<Json<Venue>> {
    if !vendor.is_active {
        return Err(MarketplaceError::forbidden(
            "Your vendor account must be approved before updating venues",
        ));
    }

    let mut venue = owned_venue(&host, &vendor, id).await?;
    let form = FormData::read(multipart).await?.venue_form()?;
    check_venue_draft(&form.draft)?;
    let images = decode_venue_images(&host.upload_limits(), &form.images)?;

    venue.apply_draft(form.draft);
    venue.images.extend(images.iter().cloned());

    let venue = host
        .store
        .update_venue(venue)
        .await?
        .ok_or(VenueError::NotFound { id })?;
    Ok(Json(venue))
}

async fn delete_venue(
    State(host): State<AppState>,
    CurrentVendor(vendor): CurrentVendor,
    Path(id): Path<i64>,
) -> MarketplaceResult<Json<MessageResponse>> {
    owned_venue(&host, &vendor, id).await?;
    if !host.store.delete_venue(id).await? {
        return Err(VenueError::NotFound { id }.into());
    }

    tracing::info!(venue_id = id, vendor_id = vendor.id, "venue deleted");
    Ok(Json(MessageResponse::new("Venue deleted successfully")))
}
