//! REST round-trips through the full router
//!
//! Verification mails go to a `MemoryMailer`, from which the tests pull the
//! verification token the way a user would follow the link.

use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use serde_json::{Value, json};
use shadiejo::core::api::Catalog;
use shadiejo::core::mailer::extract_token;
use shadiejo::prelude::*;
use std::sync::Arc;

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

struct Harness {
    server: TestServer,
    mailer: MemoryMailer,
    store: Arc<dyn MarketplaceStore>,
}

fn harness() -> Harness {
    let mailer = MemoryMailer::new();
    let store: Arc<dyn MarketplaceStore> = Arc::new(InMemoryMarketplaceStore::new());

    let app = ServerBuilder::new()
        .with_config(MarketplaceConfig::for_testing())
        .with_shared_store(store.clone())
        .with_mailer(mailer.clone())
        .build()
        .expect("Failed to build app");

    Harness {
        server: TestServer::try_new(app).expect("Failed to create test server"),
        mailer,
        store,
    }
}

fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    (
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    )
}

impl Harness {
    fn token_mailed_to(&self, email: &str) -> String {
        let mail = self.mailer.last_to(email).expect("no mail sent");
        extract_token(&mail.body)
            .expect("mail has no token")
            .to_string()
    }

    async fn signup_user(&self, email: &str, password: &str) {
        self.server
            .post("/auth/signup")
            .json(&json!({
                "name": "Ayesha Khan",
                "email": email,
                "phone": "0300-1234567",
                "password": password
            }))
            .await
            .assert_status_ok();
    }

    async fn verified_user_token(&self, email: &str) -> String {
        self.signup_user(email, "secret123").await;
        let token = self.token_mailed_to(email);
        self.server
            .get("/auth/verify")
            .add_query_param("token", &token)
            .await
            .assert_status_ok();

        let response = self
            .server
            .post("/auth/login")
            .json(&json!({"email": email, "password": "secret123"}))
            .await;
        response.assert_status_ok();
        response.json::<Value>()["access_token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    async fn admin_token(&self) -> String {
        let response = self
            .server
            .post("/admin/login")
            .json(&json!({"username": "admin", "password": "admin"}))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["user_type"], "admin");
        body["access_token"].as_str().unwrap().to_string()
    }

    async fn signup_vendor(&self, email: &str, cnic: &str) -> axum_test::TestResponse {
        let form = MultipartForm::new()
            .add_text("name", "Noor Events")
            .add_text("email", email)
            .add_text("phone", "03001234567")
            .add_text("cnic_number", cnic)
            .add_text("password", "vendorpass")
            .add_part(
                "cnic_front_image",
                Part::bytes(PNG.to_vec())
                    .file_name("front.png")
                    .mime_type("image/png"),
            );
        self.server.post("/vendor/signup").multipart(form).await
    }

    /// Signup, verification, admin approval and login
    async fn approved_vendor_token(&self, email: &str, cnic: &str) -> (i64, String) {
        self.signup_vendor(email, cnic).await.assert_status_ok();
        let token = self.token_mailed_to(email);
        self.server
            .get("/vendor/verify")
            .add_query_param("token", &token)
            .await
            .assert_status_ok();

        let vendor = self
            .store
            .vendor_by_email(email)
            .await
            .unwrap()
            .expect("vendor should exist");

        let (name, value) = bearer(&self.admin_token().await);
        self.server
            .post("/admin/vendors/approve")
            .add_header(name, value)
            .json(&json!({"vendor_id": vendor.id, "approved": true}))
            .await
            .assert_status_ok();

        let response = self
            .server
            .post("/vendor/login")
            .json(&json!({"email": email, "password": "vendorpass"}))
            .await;
        response.assert_status_ok();
        let token = response.json::<Value>()["access_token"]
            .as_str()
            .unwrap()
            .to_string();
        (vendor.id, token)
    }

    async fn create_venue(&self, token: &str, form: MultipartForm) -> axum_test::TestResponse {
        let (name, value) = bearer(token);
        self.server
            .post("/vendor/venues")
            .add_header(name, value)
            .multipart(form)
            .await
    }
}

fn venue_form(name: &str, city: &str, capacity: &str, price: &str, amenities: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("name", name)
        .add_text("description", "Open-air Garden Estate")
        .add_text("venue_type", "Banquet Hall")
        .add_text("city", city)
        .add_text("address", "Main Boulevard")
        .add_text("capacity", capacity)
        .add_text("price_per_day", price)
        .add_text("amenities", amenities)
}

// =============================================================================
// Health
// =============================================================================

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoints() {
        let h = harness();
        for path in ["/", "/health", "/healthz"] {
            let response = h.server.get(path).await;
            response.assert_status_ok();
            let body: Value = response.json();
            assert_eq!(body["status"], "healthy");
            assert_eq!(body["message"], "Shadiejo API is running");
        }
    }

    #[tokio::test]
    async fn test_catalog_lists_brackets() {
        let h = harness();
        let catalog: Catalog = h.server.get("/catalog").await.json();
        assert_eq!(
            catalog.capacity_brackets,
            vec!["100-250", "250-500", "500-1000", "1000+"]
        );
        assert!(catalog.cities.contains(&"Lahore".to_string()));
    }
}

// =============================================================================
// Public listing
// =============================================================================

mod listing_tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_listing() {
        let h = harness();
        let venues: Vec<Value> = h.server.get("/venues").await.json();
        assert!(venues.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_venue_is_404() {
        let h = harness();
        let response = h.server.get("/venues/42").await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["detail"], "Venue not found");
    }

    #[tokio::test]
    async fn test_unknown_bracket_is_400() {
        let h = harness();
        let response = h
            .server
            .get("/venues")
            .add_query_param("capacity", "2000+")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["detail"],
            "Unknown capacity bracket '2000+'"
        );
    }

    #[tokio::test]
    async fn test_non_numeric_price_is_400() {
        let h = harness();
        let response = h
            .server
            .get("/venues")
            .add_query_param("max_price", "cheap")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_listing_filters_and_keeps_order() {
        let h = harness();
        let (_, token) = h.approved_vendor_token("v@example.com", "35202-1234567-1").await;

        for (name, city, capacity, price, amenities) in [
            ("Royal Palm", "Lahore", "300", "20000", "Catering, Parking"),
            ("Sea View", "Karachi", "150", "5000", "Parking"),
            ("Pearl Hall", "Lahore", "1001", "90000", "Catering"),
        ] {
            h.create_venue(&token, venue_form(name, city, capacity, price, amenities))
                .await
                .assert_status_ok();
        }

        let all: Vec<Venue> = h.server.get("/venues").await.json();
        let names: Vec<&str> = all.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Royal Palm", "Sea View", "Pearl Hall"]);

        let filtered: Vec<Venue> = h
            .server
            .get("/venues")
            .add_query_param("city", "Lahore")
            .add_query_param("capacity", "250-500")
            .add_query_param("services", "catering")
            .await
            .json();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Royal Palm");

        let big: Vec<Venue> = h
            .server
            .get("/venues")
            .add_query_param("capacity", "1000+")
            .await
            .json();
        assert_eq!(big.len(), 1);
        assert_eq!(big[0].name, "Pearl Hall");

        let garden: Vec<Venue> = h
            .server
            .get("/venues")
            .add_query_param("search", "GARDEN")
            .add_query_param("city", "All")
            .await
            .json();
        assert_eq!(garden.len(), 3);
    }
}

// =============================================================================
// Customer accounts
// =============================================================================

mod user_tests {
    use super::*;

    #[tokio::test]
    async fn test_signup_sends_verification_mail() {
        let h = harness();
        h.signup_user("Ayesha@Example.com", "secret123").await;

        let mail = h.mailer.last_to("ayesha@example.com").expect("mail sent");
        assert_eq!(mail.subject, "Welcome to Shadiejo - Verify Your Email");
        assert!(mail.body.contains("/auth/verify?token="));
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected() {
        let h = harness();
        let response = h
            .server
            .post("/auth/signup")
            .json(&json!({"name": "A", "email": "not-an-email", "password": "x"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["detail"], "Invalid email address");
    }

    #[tokio::test]
    async fn test_short_phone_is_rejected() {
        let h = harness();
        let response = h
            .server
            .post("/auth/signup")
            .json(&json!({
                "name": "A",
                "email": "a@example.com",
                "phone": "12345",
                "password": "x"
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["detail"],
            "Phone number must be at least 10 digits"
        );
    }

    #[tokio::test]
    async fn test_login_before_verification() {
        let h = harness();
        h.signup_user("pending@example.com", "secret123").await;

        let response = h
            .server
            .post("/auth/login")
            .json(&json!({"email": "pending@example.com", "password": "secret123"}))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.json::<Value>()["detail"],
            "Please verify your email address before logging in"
        );
    }

    #[tokio::test]
    async fn test_full_user_flow() {
        let h = harness();
        let token = h.verified_user_token("ayesha@example.com").await;

        let welcome = h.mailer.last_to("ayesha@example.com").unwrap();
        assert_eq!(welcome.subject, "Welcome to Shadiejo!");

        let (name, value) = bearer(&token);
        let me: Value = h.server.get("/auth/me").add_header(name, value).await.json();
        assert_eq!(me["email"], "ayesha@example.com");
        assert_eq!(me["is_verified"], true);
        assert!(me.get("password_hash").is_none());

        let (name, value) = bearer(&token);
        let updated: Value = h
            .server
            .put("/auth/me")
            .add_header(name, value)
            .json(&json!({"name": "  Ayesha K  "}))
            .await
            .json();
        assert_eq!(updated["name"], "Ayesha K");
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let h = harness();
        h.verified_user_token("ayesha@example.com").await;

        let response = h
            .server
            .post("/auth/login")
            .json(&json!({"email": "ayesha@example.com", "password": "nope"}))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.json::<Value>()["detail"],
            "Incorrect email or password"
        );
    }

    #[tokio::test]
    async fn test_duplicate_signup_after_verification() {
        let h = harness();
        h.verified_user_token("ayesha@example.com").await;

        let response = h
            .server
            .post("/auth/signup")
            .json(&json!({"name": "Again", "email": "ayesha@example.com", "password": "x"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["detail"], "Email already registered");
    }

    #[tokio::test]
    async fn test_verification_token_is_single_use() {
        let h = harness();
        h.signup_user("once@example.com", "secret123").await;
        let token = h.token_mailed_to("once@example.com");

        h.server
            .get("/auth/verify")
            .add_query_param("token", &token)
            .await
            .assert_status_ok();
        h.server
            .get("/auth/verify")
            .add_query_param("token", &token)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_resend_replaces_token() {
        let h = harness();
        h.signup_user("late@example.com", "secret123").await;
        let first = h.token_mailed_to("late@example.com");

        h.server
            .post("/auth/resend-verification")
            .json(&json!({"email": "late@example.com"}))
            .await
            .assert_status_ok();
        let second = h.token_mailed_to("late@example.com");
        assert_ne!(first, second);

        h.server
            .get("/auth/verify")
            .add_query_param("token", &first)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        h.server
            .get("/auth/verify")
            .add_query_param("token", &second)
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_resend_without_signup_is_404() {
        let h = harness();
        let response = h
            .server
            .post("/auth/resend-verification")
            .json(&json!({"email": "ghost@example.com"}))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_me_requires_token() {
        let h = harness();
        let response = h.server.get("/auth/me").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<Value>()["detail"], "Not authenticated");

        let response = h
            .server
            .get("/auth/me")
            .add_header(
                header::AUTHORIZATION,
                HeaderValue::from_static("Token abc"),
            )
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.json::<Value>()["detail"],
            "Invalid Authorization format"
        );
    }

    #[tokio::test]
    async fn test_logout() {
        let h = harness();
        let body: Value = h.server.post("/auth/logout").await.json();
        assert_eq!(body["message"], "Successfully logged out");
    }
}

// =============================================================================
// Vendor portal
// =============================================================================

mod vendor_tests {
    use super::*;

    #[tokio::test]
    async fn test_bad_cnic_is_rejected() {
        let h = harness();
        let response = h.signup_vendor("v@example.com", "12345-678").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["detail"],
            "CNIC number must be exactly 13 digits"
        );
    }

    #[tokio::test]
    async fn test_non_image_identity_document_is_rejected() {
        let h = harness();
        let form = MultipartForm::new()
            .add_text("name", "Noor Events")
            .add_text("email", "v@example.com")
            .add_text("phone", "03001234567")
            .add_text("cnic_number", "3520212345671")
            .add_text("password", "vendorpass")
            .add_part(
                "cnic_front_image",
                Part::bytes(b"%PDF".to_vec())
                    .file_name("front.pdf")
                    .mime_type("application/pdf"),
            );
        let response = h.server.post("/vendor/signup").multipart(form).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["detail"],
            "Please upload only image files"
        );
    }

    #[tokio::test]
    async fn test_vendor_waits_for_approval() {
        let h = harness();
        h.signup_vendor("v@example.com", "35202-1234567-1")
            .await
            .assert_status_ok();
        let token = h.token_mailed_to("v@example.com");
        assert!(
            h.mailer
                .last_to("v@example.com")
                .unwrap()
                .body
                .contains("/vendor/verify?token=")
        );

        h.server
            .get("/vendor/verify")
            .add_query_param("token", &token)
            .await
            .assert_status_ok();

        let response = h
            .server
            .post("/vendor/login")
            .json(&json!({"email": "v@example.com", "password": "vendorpass"}))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.json::<Value>()["detail"],
            "Your vendor account is pending admin approval"
        );

        let vendor = h.store.vendor_by_email("v@example.com").await.unwrap().unwrap();
        assert_eq!(vendor.cnic_number, "3520212345671");
        assert!(vendor.cnic_front_image.is_some());
        assert!(vendor.is_verified && !vendor.is_active);
    }

    #[tokio::test]
    async fn test_duplicate_cnic_is_rejected() {
        let h = harness();
        h.approved_vendor_token("a@example.com", "35202-1234567-1").await;

        let response = h.signup_vendor("b@example.com", "3520212345671").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["detail"],
            "CNIC number already registered"
        );
    }

    #[tokio::test]
    async fn test_pending_signups_cannot_share_a_cnic() {
        let h = harness();
        h.signup_vendor("a@example.com", "3520212345671")
            .await
            .assert_status_ok();
        h.signup_vendor("b@example.com", "35202-1234567-1")
            .await
            .assert_status_ok();

        let first = h.token_mailed_to("a@example.com");
        let second = h.token_mailed_to("b@example.com");
        h.server
            .get("/vendor/verify")
            .add_query_param("token", &first)
            .await
            .assert_status_ok();

        let response = h
            .server
            .get("/vendor/verify")
            .add_query_param("token", &second)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["detail"], "CNIC number already registered");
        assert_eq!(body["code"], "CNIC_TAKEN");

        let vendors = h.store.list_vendors().await.unwrap();
        assert_eq!(vendors.len(), 1);
        assert_eq!(vendors[0].email, "a@example.com");
    }

    #[tokio::test]
    async fn test_venue_minimums_are_enforced() {
        let h = harness();
        let (_, token) = h.approved_vendor_token("v@example.com", "35202-1234567-1").await;

        let response = h
            .create_venue(&token, venue_form("Tiny", "Lahore", "20", "999", ""))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(
            body["detail"],
            "Guest capacity must be at least 21 guests; Price must be at least PKR 1000"
        );
        assert_eq!(body["errors"][0]["field"], "capacity");
    }

    #[tokio::test]
    async fn test_venue_lifecycle() {
        let h = harness();
        let (vendor_id, token) = h.approved_vendor_token("v@example.com", "35202-1234567-1").await;

        let form = venue_form("Royal Palm", "Lahore", "300", "20000", "Catering, Parking")
            .add_part(
                "images",
                Part::bytes(PNG.to_vec())
                    .file_name("hall.png")
                    .mime_type("image/png"),
            );
        let response = h.create_venue(&token, form).await;
        response.assert_status_ok();
        let created: Venue = response.json();
        assert_eq!(created.vendor_id, vendor_id);
        assert_eq!(created.images.len(), 1);
        assert_eq!(created.images.first().unwrap().bytes().unwrap(), PNG);
        assert!(created.amenities.contains("Parking"));

        let public: Venue = h.server.get(&format!("/venues/{}", created.id)).await.json();
        assert_eq!(public.name, "Royal Palm");

        let edit = venue_form("Royal Palm II", "Lahore", "350", "25000", "Catering")
            .add_part(
                "images",
                Part::bytes(PNG.to_vec())
                    .file_name("stage.png")
                    .mime_type("image/png"),
            );
        let (name, value) = bearer(&token);
        let updated: Venue = h
            .server
            .put(&format!("/vendor/venues/{}", created.id))
            .add_header(name, value)
            .multipart(edit)
            .await
            .json();
        assert_eq!(updated.name, "Royal Palm II");
        assert_eq!(updated.capacity, 350);
        assert_eq!(updated.images.len(), 2);
        assert!(!updated.amenities.contains("Parking"));

        let (name, value) = bearer(&token);
        let mine: Vec<Venue> = h.server.get("/vendor/venues").add_header(name, value).await.json();
        assert_eq!(mine.len(), 1);

        let (name, value) = bearer(&token);
        let deleted: Value = h
            .server
            .delete(&format!("/vendor/venues/{}", created.id))
            .add_header(name, value)
            .await
            .json();
        assert_eq!(deleted["message"], "Venue deleted successfully");

        h.server
            .get(&format!("/venues/{}", created.id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_vendors_only_see_their_own_venues() {
        let h = harness();
        let (_, first) = h.approved_vendor_token("a@example.com", "35202-1234567-1").await;
        let (_, second) = h.approved_vendor_token("b@example.com", "35202-7654321-1").await;

        let created: Venue = h
            .create_venue(&first, venue_form("Mine", "Lahore", "300", "20000", ""))
            .await
            .json();

        let (name, value) = bearer(&second);
        h.server
            .get(&format!("/vendor/venues/{}", created.id))
            .add_header(name, value)
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let (name, value) = bearer(&second);
        h.server
            .delete(&format!("/vendor/venues/{}", created.id))
            .add_header(name, value)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rejected_vendor_cannot_add_venues() {
        let h = harness();
        let (vendor_id, token) = h.approved_vendor_token("v@example.com", "35202-1234567-1").await;

        let (name, value) = bearer(&h.admin_token().await);
        let body: Value = h
            .server
            .post("/admin/vendors/approve")
            .add_header(name, value)
            .json(&json!({"vendor_id": vendor_id, "approved": false}))
            .await
            .json();
        assert_eq!(body["message"], "Vendor rejected successfully");
        assert_eq!(body["is_active"], false);

        let response = h
            .create_venue(&token, venue_form("Late", "Lahore", "300", "20000", ""))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(
            response.json::<Value>()["detail"],
            "Your vendor account must be approved before adding venues"
        );
    }

    #[tokio::test]
    async fn test_user_token_is_not_a_vendor_token() {
        let h = harness();
        let token = h.verified_user_token("ayesha@example.com").await;

        let (name, value) = bearer(&token);
        let response = h.server.get("/vendor/me").add_header(name, value).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.json::<Value>()["detail"],
            "Invalid token type for vendor access"
        );
    }
}

// =============================================================================
// Admin
// =============================================================================

mod admin_tests {
    use super::*;

    #[tokio::test]
    async fn test_wrong_admin_credentials() {
        let h = harness();
        let response = h
            .server
            .post("/admin/login")
            .json(&json!({"username": "admin", "password": "guess"}))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.json::<Value>()["detail"],
            "Incorrect username or password"
        );
    }

    #[tokio::test]
    async fn test_admin_routes_reject_other_tokens() {
        let h = harness();
        let token = h.verified_user_token("ayesha@example.com").await;

        let (name, value) = bearer(&token);
        let response = h.server.get("/admin/stats").add_header(name, value).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<Value>()["detail"], "Admin access required");
    }

    #[tokio::test]
    async fn test_review_queue_and_stats() {
        let h = harness();
        h.verified_user_token("ayesha@example.com").await;
        h.approved_vendor_token("a@example.com", "35202-1234567-1").await;

        h.signup_vendor("b@example.com", "35202-7654321-1")
            .await
            .assert_status_ok();
        let token = h.token_mailed_to("b@example.com");
        h.server
            .get("/vendor/verify")
            .add_query_param("token", &token)
            .await
            .assert_status_ok();

        let admin = h.admin_token().await;

        let (name, value) = bearer(&admin);
        let stats: AdminStats = h.server.get("/admin/stats").add_header(name, value).await.json();
        assert_eq!(
            stats,
            AdminStats {
                total_users: 1,
                total_vendors: 2,
                pending_vendors: 1,
                approved_vendors: 1,
            }
        );

        let (name, value) = bearer(&admin);
        let pending: Vec<Value> = h
            .server
            .get("/admin/vendors/pending")
            .add_header(name, value)
            .await
            .json();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0]["email"], "b@example.com");
        assert!(pending[0].get("cnic_front_image").is_none());

        let id = pending[0]["id"].as_i64().unwrap();
        let (name, value) = bearer(&admin);
        let details: Value = h
            .server
            .get(&format!("/admin/vendors/{}", id))
            .add_header(name, value)
            .await
            .json();
        assert!(details["cnic_front_image"].is_string());

        let (name, value) = bearer(&admin);
        let users: Vec<Value> = h.server.get("/admin/users").add_header(name, value).await.json();
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn test_approve_unknown_vendor_is_404() {
        let h = harness();
        let (name, value) = bearer(&h.admin_token().await);
        let response = h
            .server
            .post("/admin/vendors/approve")
            .add_header(name, value)
            .json(&json!({"vendor_id": 99, "approved": true}))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["detail"], "Vendor not found");
    }

    #[tokio::test]
    async fn test_purge_expired_verifications() {
        let h = harness();
        h.signup_user("fresh@example.com", "secret123").await;

        let (name, value) = bearer(&h.admin_token().await);
        let body: Value = h
            .server
            .delete("/admin/pending/expired")
            .add_header(name, value)
            .await
            .json();
        assert_eq!(body["removed"], 0);
        assert!(
            h.store
                .pending_by_email("fresh@example.com", false)
                .await
                .unwrap()
                .is_some()
        );
    }
}
