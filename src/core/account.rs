//! Accounts: customers, vendors and pending e-mail verifications

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A customer account
///
/// Only created once the e-mail address has been verified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A venue owner
///
/// Verified vendors start inactive; an admin activates (approves) them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub cnic_number: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cnic_front_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cnic_back_image: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vendor {
    /// Verified and waiting for an admin decision
    pub fn is_pending(&self) -> bool {
        self.is_verified && !self.is_active
    }

    pub fn is_approved(&self) -> bool {
        self.is_verified && self.is_active
    }

    /// Copy without the identity-document images, for listings
    pub fn summary(&self) -> Vendor {
        Vendor {
            cnic_front_image: None,
            cnic_back_image: None,
            ..self.clone()
        }
    }
}

/// Signup data held until the e-mail link is followed
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAccount {
    User {
        name: String,
        email: String,
        phone: Option<String>,
        password_hash: String,
        role: String,
    },
    Vendor {
        name: String,
        email: String,
        phone: String,
        cnic_number: String,
        cnic_front_image: Option<String>,
        cnic_back_image: Option<String>,
        password_hash: String,
    },
}

impl PendingAccount {
    pub fn email(&self) -> &str {
        match self {
            PendingAccount::User { email, .. } | PendingAccount::Vendor { email, .. } => email,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PendingAccount::User { name, .. } | PendingAccount::Vendor { name, .. } => name,
        }
    }

    pub fn is_vendor(&self) -> bool {
        matches!(self, PendingAccount::Vendor { .. })
    }
}

/// A signup waiting for e-mail verification
#[derive(Debug, Clone, PartialEq)]
pub struct PendingVerification {
    pub token: String,
    pub account: PendingAccount,
    pub expires_at: DateTime<Utc>,
}

impl PendingVerification {
    /// New pending record with a fresh random token
    pub fn new(account: PendingAccount, ttl: Duration) -> Self {
        Self {
            token: uuid::Uuid::new_v4().simple().to_string(),
            account,
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Issue a new token and push the expiry out again
    pub fn renew(&mut self, ttl: Duration) {
        self.token = uuid::Uuid::new_v4().simple().to_string();
        self.expires_at = Utc::now() + ttl;
    }
}

/// Dashboard counters for the admin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminStats {
    pub total_users: usize,
    pub total_vendors: usize,
    pub pending_vendors: usize,
    pub approved_vendors: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vendor(is_verified: bool, is_active: bool) -> Vendor {
        Vendor {
            id: 1,
            name: "Noor Events".into(),
            email: "noor@example.com".into(),
            phone: "03001234567".into(),
            cnic_number: "3520212345671".into(),
            cnic_front_image: Some("AAAA".into()),
            cnic_back_image: None,
            password_hash: "hash".into(),
            is_active,
            is_verified,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_vendor_approval_states() {
        assert!(vendor(true, false).is_pending());
        assert!(vendor(true, true).is_approved());
        assert!(!vendor(false, false).is_pending());
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let json = serde_json::to_value(vendor(true, true)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["cnic_front_image"], "AAAA");
        assert!(json.get("cnic_back_image").is_none());
    }

    #[test]
    fn test_summary_drops_images() {
        let summary = vendor(true, true).summary();
        assert!(summary.cnic_front_image.is_none());
    }

    #[test]
    fn test_pending_expiry() {
        let pending = PendingVerification::new(
            PendingAccount::User {
                name: "Ayesha".into(),
                email: "ayesha@example.com".into(),
                phone: None,
                password_hash: "hash".into(),
                role: "user".into(),
            },
            Duration::hours(24),
        );
        assert_eq!(pending.token.len(), 32);
        assert!(!pending.is_expired());
        assert!(pending.is_expired_at(Utc::now() + Duration::hours(25)));
    }

    #[test]
    fn test_renew_changes_token() {
        let mut pending = PendingVerification::new(
            PendingAccount::User {
                name: "A".into(),
                email: "a@example.com".into(),
                phone: None,
                password_hash: "h".into(),
                role: "user".into(),
            },
            Duration::seconds(-1),
        );
        let old = pending.token.clone();
        assert!(pending.is_expired());
        pending.renew(Duration::hours(1));
        assert_ne!(pending.token, old);
        assert!(!pending.is_expired());
    }
}
