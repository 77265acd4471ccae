//! Storage trait for the marketplace
//!
//! Ids are assigned by the store on insert; any id on the value passed to an
//! `insert_*` method is ignored. Listings come back in insertion order.

use crate::core::account::{PendingVerification, User, Vendor};
use crate::core::venue::Venue;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait MarketplaceStore: Send + Sync {
    // === Venues ===

    async fn insert_venue(&self, venue: Venue) -> Result<Venue>;

    async fn venue(&self, id: i64) -> Result<Option<Venue>>;

    async fn list_venues(&self) -> Result<Vec<Venue>>;

    async fn venues_by_vendor(&self, vendor_id: i64) -> Result<Vec<Venue>>;

    /// Replace a stored venue; `None` when it no longer exists
    async fn update_venue(&self, venue: Venue) -> Result<Option<Venue>>;

    /// Returns whether a venue was removed
    async fn delete_venue(&self, id: i64) -> Result<bool>;

    // === Users ===

    async fn insert_user(&self, user: User) -> Result<User>;

    async fn user(&self, id: i64) -> Result<Option<User>>;

    async fn user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn update_user(&self, user: User) -> Result<Option<User>>;

    async fn list_users(&self) -> Result<Vec<User>>;

    async fn count_users(&self) -> Result<usize>;

    // === Vendors ===

    /// Fails with [`AccountError::VendorEmailTaken`] or
    /// [`AccountError::CnicTaken`] when another vendor holds the e-mail or CNIC
    ///
    /// [`AccountError::VendorEmailTaken`]: crate::core::error::AccountError::VendorEmailTaken
    /// [`AccountError::CnicTaken`]: crate::core::error::AccountError::CnicTaken
    async fn insert_vendor(&self, vendor: Vendor) -> Result<Vendor>;

    async fn vendor(&self, id: i64) -> Result<Option<Vendor>>;

    async fn vendor_by_email(&self, email: &str) -> Result<Option<Vendor>>;

    async fn vendor_by_cnic(&self, cnic_number: &str) -> Result<Option<Vendor>>;

    async fn list_vendors(&self) -> Result<Vec<Vendor>>;

    async fn update_vendor(&self, vendor: Vendor) -> Result<Option<Vendor>>;

    // === Pending verifications ===

    /// Store a pending signup, replacing any earlier one for the same e-mail
    /// and account kind
    async fn save_pending(&self, pending: PendingVerification) -> Result<()>;

    async fn pending_by_token(&self, token: &str) -> Result<Option<PendingVerification>>;

    async fn pending_by_email(
        &self,
        email: &str,
        vendor: bool,
    ) -> Result<Option<PendingVerification>>;

    async fn remove_pending(&self, token: &str) -> Result<Option<PendingVerification>>;

    /// Drop every pending signup that expired before `now`
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize>;
}
