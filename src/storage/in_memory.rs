//! In-memory marketplace store for development and tests
//!
//! Data lives for the lifetime of the process only.

use crate::core::account::{PendingVerification, User, Vendor};
use crate::core::error::{AccountError, StorageError};
use crate::core::store::MarketplaceStore;
use crate::core::venue::Venue;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Tables {
    venues: IndexMap<i64, Venue>,
    users: IndexMap<i64, User>,
    vendors: IndexMap<i64, Vendor>,
    pending: HashMap<String, PendingVerification>,
    next_venue_id: i64,
    next_user_id: i64,
    next_vendor_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// In-memory store implementation
///
/// Uses a single RwLock so id counters and tables always move together.
#[derive(Clone, Default)]
pub struct InMemoryMarketplaceStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryMarketplaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|e| {
            StorageError::LockPoisoned {
                message: format!("Failed to acquire read lock: {}", e),
            }
            .into()
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|e| {
            StorageError::LockPoisoned {
                message: format!("Failed to acquire write lock: {}", e),
            }
            .into()
        })
    }
}

#[async_trait]
impl MarketplaceStore for InMemoryMarketplaceStore {
    async fn insert_venue(&self, mut venue: Venue) -> Result<Venue> {
        let mut tables = self.write()?;
        venue.id = next_id(&mut tables.next_venue_id);
        tables.venues.insert(venue.id, venue.clone());
        Ok(venue)
    }

    async fn venue(&self, id: i64) -> Result<Option<Venue>> {
        Ok(self.read()?.venues.get(&id).cloned())
    }

    async fn list_venues(&self) -> Result<Vec<Venue>> {
        Ok(self.read()?.venues.values().cloned().collect())
    }

    async fn venues_by_vendor(&self, vendor_id: i64) -> Result<Vec<Venue>> {
        Ok(self
            .read()?
            .venues
            .values()
            .filter(|venue| venue.vendor_id == vendor_id)
            .cloned()
            .collect())
    }

    async fn update_venue(&self, venue: Venue) -> Result<Option<Venue>> {
        let mut tables = self.write()?;
        let Some(slot) = tables.venues.get_mut(&venue.id) else {
            return Ok(None);
        };
        *slot = venue.clone();
        Ok(Some(venue))
    }

    async fn delete_venue(&self, id: i64) -> Result<bool> {
        // shift_remove keeps the remaining venues in insertion order
        Ok(self.write()?.venues.shift_remove(&id).is_some())
    }

    async fn insert_user(&self, mut user: User) -> Result<User> {
        let mut tables = self.write()?;
        user.id = next_id(&mut tables.next_user_id);
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn user(&self, id: i64) -> Result<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn update_user(&self, user: User) -> Result<Option<User>> {
        let mut tables = self.write()?;
        let Some(slot) = tables.users.get_mut(&user.id) else {
            return Ok(None);
        };
        *slot = user.clone();
        Ok(Some(user))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.read()?.users.values().cloned().collect())
    }

    async fn count_users(&self) -> Result<usize> {
        Ok(self.read()?.users.len())
    }

    async fn insert_vendor(&self, mut vendor: Vendor) -> Result<Vendor> {
        let mut tables = self.write()?;
        for existing in tables.vendors.values() {
            if existing.email == vendor.email {
                return Err(AccountError::VendorEmailTaken.into());
            }
            if existing.cnic_number == vendor.cnic_number {
                return Err(AccountError::CnicTaken.into());
            }
        }
        vendor.id = next_id(&mut tables.next_vendor_id);
        tables.vendors.insert(vendor.id, vendor.clone());
        Ok(vendor)
    }

    async fn vendor(&self, id: i64) -> Result<Option<Vendor>> {
        Ok(self.read()?.vendors.get(&id).cloned())
    }

    async fn vendor_by_email(&self, email: &str) -> Result<Option<Vendor>> {
        Ok(self
            .read()?
            .vendors
            .values()
            .find(|vendor| vendor.email == email)
            .cloned())
    }

    async fn vendor_by_cnic(&self, cnic_number: &str) -> Result<Option<Vendor>> {
        Ok(self
            .read()?
            .vendors
            .values()
            .find(|vendor| vendor.cnic_number == cnic_number)
            .cloned())
    }

    async fn list_vendors(&self) -> Result<Vec<Vendor>> {
        Ok(self.read()?.vendors.values().cloned().collect())
    }

    async fn update_vendor(&self, vendor: Vendor) -> Result<Option<Vendor>> {
        let mut tables = self.write()?;
        let Some(slot) = tables.vendors.get_mut(&vendor.id) else {
            return Ok(None);
        };
        *slot = vendor.clone();
        Ok(Some(vendor))
    }

    async fn save_pending(&self, pending: PendingVerification) -> Result<()> {
        let mut tables = self.write()?;
        let email = pending.account.email().to_string();
        let vendor = pending.account.is_vendor();
        tables
            .pending
            .retain(|_, p| !(p.account.email() == email && p.account.is_vendor() == vendor));
        tables.pending.insert(pending.token.clone(), pending);
        Ok(())
    }

    async fn pending_by_token(&self, token: &str) -> Result<Option<PendingVerification>> {
        Ok(self.read()?.pending.get(token).cloned())
    }

    async fn pending_by_email(
        &self,
        email: &str,
        vendor: bool,
    ) -> Result<Option<PendingVerification>> {
        Ok(self
            .read()?
            .pending
            .values()
            .find(|p| p.account.email() == email && p.account.is_vendor() == vendor)
            .cloned())
    }

    async fn remove_pending(&self, token: &str) -> Result<Option<PendingVerification>> {
        Ok(self.write()?.pending.remove(token))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut tables = self.write()?;
        let before = tables.pending.len();
        tables.pending.retain(|_, p| !p.is_expired_at(now));
        Ok(before - tables.pending.len())
    }
}
