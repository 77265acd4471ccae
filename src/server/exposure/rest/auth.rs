//! Customer signup, e-mail verification, login and profile

use crate::core::account::{PendingAccount, PendingVerification, User};
use crate::core::api::{
    LoginRequest, MessageResponse, ProfileUpdate, ResendVerificationRequest, SignupRequest,
    TokenResponse,
};
use crate::core::auth::{AccountKind, hash_password, verify_password};
use crate::core::error::{AccountError, MarketplaceError, MarketplaceResult};
use crate::core::validation::Validated;
use crate::server::extractors::CurrentUser;
use crate::server::host::{AppState, ServerHost};
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/verify", get(verify))
        .route("/auth/resend-verification", post(resend_verification))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me).put(update_me))
}

#[derive(Debug, Deserialize)]
pub(super) struct VerifyParams {
    pub token: String,
}

/// Render and send the verification mail for a pending signup
///
/// Delivery failures are logged; the signup itself still succeeds.
pub(super) async fn send_verification(host: &ServerHost, pending: &PendingVerification) {
    let account = &pending.account;
    let mail = match host.templates.verification(
        account.email(),
        account.name(),
        &pending.token,
        account.is_vendor(),
    ) {
        Ok(mail) => mail,
        Err(e) => {
            tracing::error!("failed to render verification mail: {e:#}");
            return;
        }
    };

    if let Err(e) = host.mailer.send(&mail).await {
        tracing::warn!(to = %mail.to, "could not send verification email: {e:#}");
    }
}

/// Look up a verification token of the expected kind and consume it
///
/// Expired tokens are removed and reported as such.
pub(super) async fn take_pending(
    host: &ServerHost,
    token: &str,
    vendor: bool,
) -> MarketplaceResult<PendingAccount> {
    let pending = host
        .store
        .pending_by_token(token)
        .await?
        .filter(|p| p.account.is_vendor() == vendor)
        .ok_or(AccountError::InvalidVerificationToken)?;

    host.store.remove_pending(token).await?;
    if pending.is_expired() {
        return Err(AccountError::VerificationTokenExpired.into());
    }
    Ok(pending.account)
}

/// Credentials belong to a signup that was never verified
pub(super) async fn pending_matches(
    host: &ServerHost,
    email: &str,
    password: &str,
    vendor: bool,
) -> MarketplaceResult<bool> {
    let Some(pending) = host.store.pending_by_email(email, vendor).await? else {
        return Ok(false);
    };
    let hash = match &pending.account {
        PendingAccount::User { password_hash, .. }
        | PendingAccount::Vendor { password_hash, .. } => password_hash,
    };
    Ok(verify_password(password, hash))
}

async fn signup(
    State(host): State<AppState>,
    Validated(request): Validated<SignupRequest>,
) -> MarketplaceResult<Json<MessageResponse>> {
    request.validate()?;

    if host.store.user_by_email(&request.email).await?.is_some() {
        return Err(AccountError::EmailTaken.into());
    }

    let pending = PendingVerification::new(
        PendingAccount::User {
            name: request.name,
            email: request.email.clone(),
            phone: request.phone,
            password_hash: hash_password(&request.password)?,
            role: request.role,
        },
        host.verification_ttl(),
    );
    host.store.save_pending(pending.clone()).await?;
    send_verification(&host, &pending).await;

    tracing::info!(email = %request.email, "user signup pending verification");
    Ok(Json(MessageResponse::for_email(
        "Verification email sent. Please check your email to complete registration.",
        &request.email,
    )))
}

async fn verify(
    State(host): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> MarketplaceResult<Json<MessageResponse>> {
    let PendingAccount::User {
        name,
        email,
        phone,
        password_hash,
        role,
    } = take_pending(&host, &params.token, false).await?
    else {
        return Err(AccountError::InvalidVerificationToken.into());
    };

    let now = Utc::now();
    match host.store.user_by_email(&email).await? {
        // Signed up again while an earlier link was still out
        Some(mut existing) => {
            existing.is_verified = true;
            existing.is_active = true;
            existing.updated_at = now;
            host.store.update_user(existing).await?;
        }
        None => {
            host.store
                .insert_user(User {
                    id: 0,
                    name: name.clone(),
                    email: email.clone(),
                    phone,
                    password_hash,
                    role,
                    is_active: true,
                    is_verified: true,
                    created_at: now,
                    updated_at: now,
                })
                .await?;
        }
    }

    match host.templates.welcome(&email, &name) {
        Ok(mail) => {
            if let Err(e) = host.mailer.send(&mail).await {
                tracing::warn!(to = %email, "could not send welcome email: {e:#}");
            }
        }
        Err(e) => tracing::error!("failed to render welcome mail: {e:#}"),
    }

    tracing::info!(email = %email, "user email verified");
    Ok(Json(MessageResponse::for_email(
        "Email verified successfully. You can now log in.",
        &email,
    )))
}

async fn resend_verification(
    State(host): State<AppState>,
    Validated(request): Validated<ResendVerificationRequest>,
) -> MarketplaceResult<Json<MessageResponse>> {
    if let Some(user) = host.store.user_by_email(&request.email).await? {
        if user.is_verified {
            return Err(MarketplaceError::field("email", "Email already verified"));
        }
    }

    let Some(mut pending) = host.store.pending_by_email(&request.email, false).await? else {
        return Err(MarketplaceError::Account(AccountError::NoPendingVerification));
    };

    pending.renew(host.verification_ttl());
    host.store.save_pending(pending.clone()).await?;
    send_verification(&host, &pending).await;

    Ok(Json(MessageResponse::new(
        "Verification email sent successfully",
    )))
}

async fn login(
    State(host): State<AppState>,
    Validated(credentials): Validated<LoginRequest>,
) -> MarketplaceResult<Json<TokenResponse>> {
    let Some(user) = host.store.user_by_email(&credentials.email).await? else {
        if pending_matches(&host, &credentials.email, &credentials.password, false).await? {
            return Err(AccountError::NotVerified.into());
        }
        return Err(AccountError::InvalidCredentials.into());
    };

    if !verify_password(&credentials.password, &user.password_hash) {
        return Err(AccountError::InvalidCredentials.into());
    }
    if !user.is_active {
        return Err(AccountError::Deactivated.into());
    }
    if !user.is_verified {
        return Err(AccountError::NotVerified.into());
    }

    let token = host.tokens.issue(AccountKind::User, &user.id.to_string())?;
    Ok(Json(TokenResponse::bearer(token, None)))
}

/// Tokens are stateless; the client discards its copy
async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse::new("Successfully logged out"))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

async fn update_me(
    State(host): State<AppState>,
    CurrentUser(mut user): CurrentUser,
    Validated(update): Validated<ProfileUpdate>,
) -> MarketplaceResult<Json<User>> {
    if let Some(name) = update.name {
        user.name = name;
    }
    if let Some(phone) = update.phone {
        user.phone = Some(phone);
    }
    user.updated_at = Utc::now();

    let user = host
        .store
        .update_user(user)
        .await?
        .ok_or_else(|| MarketplaceError::unauthorized("User not found"))?;
    Ok(Json(user))
}
