//! Typed HTTP client for the marketplace API
//!
//! Every request carries `Authorization: Bearer <token>` while the session
//! holds a token. Successful logins store the token in the session and
//! logout clears it, so any listener on the session's token store sees the
//! change.
//!
//! # Example
//!
//! ```ignore
//! let client = ApiClient::new("http://localhost:8000")?;
//! client.login("ayesha@example.com", "secret").await?;
//!
//! let criteria = VenueCriteria::default().with_city("Lahore");
//! let venues = client.list_venues(&criteria).await?;
//! ```

pub mod error;

pub use error::{ClientError, ClientResult};

use crate::core::account::{AdminStats, User, Vendor};
use crate::core::api::{
    AdminLoginRequest, ApprovalRequest, ApprovalResponse, Catalog, LoginRequest,
    MessageResponse, ProfileUpdate, ResendVerificationRequest, SignupRequest, TokenResponse,
    Upload, VendorSignup, VenueForm,
};
use crate::core::auth::AccountKind;
use crate::core::filter::VenueCriteria;
use crate::core::query::VenueQuery;
use crate::core::session::Session;
use crate::core::venue::Venue;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Client with a fresh in-memory session
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_session(base_url, Session::in_memory())
    }

    /// Client sharing an existing session
    pub fn with_session(base_url: impl Into<String>, session: Session) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, mut request: RequestBuilder) -> ClientResult<T> {
        if let Some(bearer) = self.session.bearer() {
            request = request.header(reqwest::header::AUTHORIZATION, bearer);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            tracing::debug!(status = status.as_u16(), "request failed: {}", body);
            return Err(ClientError::from_body(status.as_u16(), &body));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.http.get(self.url(path))).await
    }

    async fn post_json<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send(self.http.post(self.url(path)).json(body)).await
    }

    async fn put_json<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send(self.http.put(self.url(path)).json(body)).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.http.delete(self.url(path))).await
    }

    fn sign_in(&self, response: TokenResponse, kind: AccountKind) -> TokenResponse {
        self.session.sign_in(response.access_token.clone(), kind);
        response
    }

    // === Public ===

    pub async fn health(&self) -> ClientResult<Value> {
        self.get("/health").await
    }

    /// Active venues matching `criteria`, in listing order
    pub async fn list_venues(&self, criteria: &VenueCriteria) -> ClientResult<Vec<Venue>> {
        let query = VenueQuery::from_criteria(criteria);
        self.send(self.http.get(self.url("/venues")).query(&query))
            .await
    }

    pub async fn venue(&self, id: i64) -> ClientResult<Venue> {
        self.get(&format!("/venues/{}", id)).await
    }

    pub async fn catalog(&self) -> ClientResult<Catalog> {
        self.get("/catalog").await
    }

    // === Customer accounts ===

    pub async fn signup(&self, request: &SignupRequest) -> ClientResult<MessageResponse> {
        self.post_json("/auth/signup", request).await
    }

    pub async fn verify_email(&self, token: &str) -> ClientResult<MessageResponse> {
        self.send(
            self.http
                .get(self.url("/auth/verify"))
                .query(&[("token", token)]),
        )
        .await
    }

    pub async fn resend_verification(&self, email: &str) -> ClientResult<MessageResponse> {
        let request = ResendVerificationRequest {
            email: email.to_string(),
        };
        self.post_json("/auth/resend-verification", &request).await
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<TokenResponse> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.post_json("/auth/login", &request).await?;
        Ok(self.sign_in(response, AccountKind::User))
    }

    /// Ends the session locally even when the server cannot be reached
    pub async fn logout(&self) -> ClientResult<MessageResponse> {
        let result = self
            .send(self.http.post(self.url("/auth/logout")))
            .await;
        self.session.sign_out();
        result
    }

    pub async fn me(&self) -> ClientResult<User> {
        self.get("/auth/me").await
    }

    pub async fn update_me(&self, update: &ProfileUpdate) -> ClientResult<User> {
        self.put_json("/auth/me", update).await
    }

    // === Vendor portal ===

    pub async fn vendor_signup(&self, signup: &VendorSignup) -> ClientResult<MessageResponse> {
        let mut form = Form::new()
            .text("name", signup.name.clone())
            .text("email", signup.email.clone())
            .text("phone", signup.phone.clone())
            .text("cnic_number", signup.cnic_number.clone())
            .text("password", signup.password.clone());
        if let Some(front) = &signup.cnic_front_image {
            form = form.part("cnic_front_image", file_part(front)?);
        }
        if let Some(back) = &signup.cnic_back_image {
            form = form.part("cnic_back_image", file_part(back)?);
        }

        self.send(self.http.post(self.url("/vendor/signup")).multipart(form))
            .await
    }

    pub async fn verify_vendor(&self, token: &str) -> ClientResult<MessageResponse> {
        self.send(
            self.http
                .get(self.url("/vendor/verify"))
                .query(&[("token", token)]),
        )
        .await
    }

    pub async fn vendor_login(&self, email: &str, password: &str) -> ClientResult<TokenResponse> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.post_json("/vendor/login", &request).await?;
        Ok(self.sign_in(response, AccountKind::Vendor))
    }

    pub async fn vendor_me(&self) -> ClientResult<Vendor> {
        self.get("/vendor/me").await
    }

    pub async fn update_vendor_profile(&self, update: &ProfileUpdate) -> ClientResult<Vendor> {
        self.put_json("/vendor/profile", update).await
    }

    pub async fn my_venues(&self) -> ClientResult<Vec<Venue>> {
        self.get("/vendor/venues").await
    }

    pub async fn my_venue(&self, id: i64) -> ClientResult<Venue> {
        self.get(&format!("/vendor/venues/{}", id)).await
    }

    pub async fn create_venue(&self, form: &VenueForm) -> ClientResult<Venue> {
        let form = venue_form(form)?;
        self.send(self.http.post(self.url("/vendor/venues")).multipart(form))
            .await
    }

    /// Replace the venue's fields; images in `form` are appended
    pub async fn update_venue(&self, id: i64, form: &VenueForm) -> ClientResult<Venue> {
        let form = venue_form(form)?;
        self.send(
            self.http
                .put(self.url(&format!("/vendor/venues/{}", id)))
                .multipart(form),
        )
        .await
    }

    pub async fn delete_venue(&self, id: i64) -> ClientResult<MessageResponse> {
        self.delete(&format!("/vendor/venues/{}", id)).await
    }

    // === Admin ===

    pub async fn admin_login(&self, username: &str, password: &str) -> ClientResult<TokenResponse> {
        let request = AdminLoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self.post_json("/admin/login", &request).await?;
        Ok(self.sign_in(response, AccountKind::Admin))
    }

    pub async fn admin_vendors(&self) -> ClientResult<Vec<Vendor>> {
        self.get("/admin/vendors").await
    }

    pub async fn pending_vendors(&self) -> ClientResult<Vec<Vendor>> {
        self.get("/admin/vendors/pending").await
    }

    pub async fn approved_vendors(&self) -> ClientResult<Vec<Vendor>> {
        self.get("/admin/vendors/approved").await
    }

    pub async fn admin_vendor(&self, id: i64) -> ClientResult<Vendor> {
        self.get(&format!("/admin/vendors/{}", id)).await
    }

    pub async fn approve_vendor(
        &self,
        vendor_id: i64,
        approved: bool,
    ) -> ClientResult<ApprovalResponse> {
        let request = ApprovalRequest {
            vendor_id,
            approved,
        };
        self.post_json("/admin/vendors/approve", &request).await
    }

    pub async fn admin_stats(&self) -> ClientResult<AdminStats> {
        self.get("/admin/stats").await
    }

    pub async fn admin_users(&self) -> ClientResult<Vec<User>> {
        self.get("/admin/users").await
    }

    /// Number of expired pending signups removed
    pub async fn purge_expired(&self) -> ClientResult<usize> {
        #[derive(Deserialize)]
        struct Purged {
            removed: usize,
        }

        let purged: Purged = self.delete("/admin/pending/expired").await?;
        Ok(purged.removed)
    }
}

fn file_part(upload: &Upload) -> ClientResult<Part> {
    let part = Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone());
    match &upload.content_type {
        Some(content_type) => part
            .mime_str(content_type)
            .map_err(|e| ClientError::Upload(e.to_string())),
        None => Ok(part),
    }
}

fn venue_form(form: &VenueForm) -> ClientResult<Form> {
    let draft = &form.draft;
    let mut multipart = Form::new()
        .text("name", draft.name.clone())
        .text("description", draft.description.clone())
        .text("venue_type", draft.venue_type.clone())
        .text("city", draft.city.clone())
        .text("address", draft.address.clone())
        .text("capacity", draft.capacity.to_string())
        .text("price_per_day", draft.price_per_day.to_string())
        .text("amenities", draft.amenities.joined());

    for image in &form.images {
        multipart = multipart.part("images", file_part(image)?);
    }
    Ok(multipart)
}
