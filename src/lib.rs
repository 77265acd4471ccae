//! # Shadiejo
//!
//! A wedding-venue marketplace: couples browse and filter venues, vendors
//! publish them, and an admin approves vendors before their venues go live.
//!
//! ## Features
//!
//! - **Venue filter engine**: pure, order-preserving filtering by free text,
//!   city, capacity bracket, maximum price, venue type and required services
//! - **Typed venue records**: amenities and images decoded once at the
//!   boundary, with malformed data degrading to empty
//! - **Validation rules**: venue minimums, CNIC formatting, phone numbers and
//!   upload limits, plus closure-based validators for raw JSON payloads
//! - **Sessions**: an injectable token store with change notifications
//! - **REST server**: axum routers for the public listing, customer and
//!   vendor accounts, the vendor portal and admin review
//! - **Typed client**: a reqwest client that carries the session's bearer
//!   token
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shadiejo::prelude::*;
//!
//! let venues: Vec<Venue> = load_snapshot();
//! let criteria = VenueCriteria::default()
//!     .with_city("Lahore")
//!     .with_capacity(CapacityBracket::From250To500)
//!     .with_service("Catering");
//!
//! for venue in filter_venues(&venues, &criteria) {
//!     println!("{} ({})", venue.name, venue.city);
//! }
//! ```

pub mod client;
pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Filter engine ===
    pub use crate::core::{
        browse::VenueBrowser,
        filter::{CapacityBracket, Criterion, VenueCriteria, filter_refs, filter_venues},
        query::VenueQuery,
        venue::{Amenities, Venue, VenueDraft, VenueImage, VenueImages, VenueRecord},
    };

    // === Accounts and sessions ===
    pub use crate::core::{
        account::{AdminStats, PendingAccount, PendingVerification, User, Vendor},
        auth::{AccountKind, AuthContext, AuthPolicy, TokenIssuer},
        session::{InMemoryTokenStore, Session, TokenStore},
    };

    // === Validation ===
    pub use crate::core::validation::{
        FieldRules, UploadKind, UploadLimits, Validated, ValidatedPayload, format_cnic,
    };

    // === Errors ===
    pub use crate::core::error::{MarketplaceError, MarketplaceResult};

    // === Storage and mail ===
    pub use crate::core::mailer::{LogMailer, Mailer, MemoryMailer, OutgoingMail};
    pub use crate::core::store::MarketplaceStore;
    pub use crate::storage::InMemoryMarketplaceStore;

    // === Config ===
    pub use crate::config::MarketplaceConfig;

    // === Server and client ===
    pub use crate::client::{ApiClient, ClientError, ClientResult};
    pub use crate::server::{AppState, ServerBuilder, ServerHost};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};

    // === Axum ===
    pub use axum::{
        Router,
        extract::{Path, State},
        routing::{delete, get, post, put},
    };
}
