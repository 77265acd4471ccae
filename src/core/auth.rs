//! Authentication and authorization
//!
//! Bearer tokens are HS256 JWTs carrying the account id and its kind:
//! - User accounts (customers browsing and booking)
//! - Vendor accounts (venue owners, admin approved)
//! - The admin account (vendor approval)

use crate::core::error::{MarketplaceError, MarketplaceResult};
use axum::http::HeaderMap;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of account a token was issued to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    User,
    Vendor,
    Admin,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::User => "user",
            AccountKind::Vendor => "vendor",
            AccountKind::Admin => "admin",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(AccountKind::User),
            "vendor" => Ok(AccountKind::Vendor),
            "admin" => Ok(AccountKind::Admin),
            other => Err(format!("unknown account kind '{}'", other)),
        }
    }
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id (the admin username for admin tokens)
    pub sub: String,
    pub kind: AccountKind,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authorization context extracted from a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    User { user_id: i64 },
    Vendor { vendor_id: i64 },
    Admin { username: String },
    /// No (valid) bearer token
    Anonymous,
}

impl AuthContext {
    pub fn kind(&self) -> Option<AccountKind> {
        match self {
            AuthContext::User { .. } => Some(AccountKind::User),
            AuthContext::Vendor { .. } => Some(AccountKind::Vendor),
            AuthContext::Admin { .. } => Some(AccountKind::Admin),
            AuthContext::Anonymous => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, AuthContext::Admin { .. })
    }

    pub fn user_id(&self) -> Option<i64> {
        match self {
            AuthContext::User { user_id } => Some(*user_id),
            _ => None,
        }
    }

    pub fn vendor_id(&self) -> Option<i64> {
        match self {
            AuthContext::Vendor { vendor_id } => Some(*vendor_id),
            _ => None,
        }
    }

    fn from_claims(claims: Claims) -> MarketplaceResult<Self> {
        let invalid = || MarketplaceError::unauthorized("Could not validate credentials");
        Ok(match claims.kind {
            AccountKind::User => AuthContext::User {
                user_id: claims.sub.parse().map_err(|_| invalid())?,
            },
            AccountKind::Vendor => AuthContext::Vendor {
                vendor_id: claims.sub.parse().map_err(|_| invalid())?,
            },
            AccountKind::Admin => AuthContext::Admin {
                username: claims.sub,
            },
        })
    }
}

/// Authorization policy for an operation
#[derive(Debug, Clone)]
pub enum AuthPolicy {
    /// Public access (no auth required)
    Public,

    /// Any authenticated account
    Authenticated,

    /// Only tokens of this kind
    Kind(AccountKind),

    /// Combination of policies (OR)
    Or(Vec<AuthPolicy>),
}

impl AuthPolicy {
    /// Check if auth context satisfies this policy
    pub fn check(&self, context: &AuthContext) -> bool {
        match self {
            AuthPolicy::Public => true,
            AuthPolicy::Authenticated => !matches!(context, AuthContext::Anonymous),
            AuthPolicy::Kind(kind) => context.kind() == Some(*kind),
            AuthPolicy::Or(policies) => policies.iter().any(|p| p.check(context)),
        }
    }

    /// Message returned when a context fails this policy
    pub fn denial(&self) -> &'static str {
        match self {
            AuthPolicy::Kind(AccountKind::Admin) => "Admin access required",
            AuthPolicy::Kind(AccountKind::Vendor) => "Invalid token type for vendor access",
            _ => "Could not validate credentials",
        }
    }
}

/// Issues and verifies bearer tokens
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: chrono::Duration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer").field("ttl", &self.ttl).finish()
    }
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: chrono::Duration::minutes(ttl_minutes),
        }
    }

    /// Create a token for an account
    pub fn issue(&self, kind: AccountKind, subject: &str) -> MarketplaceResult<String> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            kind,
            exp: (now + self.ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| MarketplaceError::Internal(format!("token encoding failed: {e}")))
    }

    /// Decode and check a token's signature and expiry
    pub fn verify(&self, token: &str) -> MarketplaceResult<Claims> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("JWT validation failed: {e}");
                MarketplaceError::unauthorized("Could not validate credentials")
            })
    }

    /// Resolve the context of a request from its `Authorization` header
    ///
    /// A missing header is anonymous; a present but invalid one is an error.
    pub fn context_from_headers(&self, headers: &HeaderMap) -> MarketplaceResult<AuthContext> {
        let Some(value) = headers.get(axum::http::header::AUTHORIZATION) else {
            return Ok(AuthContext::Anonymous);
        };

        let token = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| MarketplaceError::unauthorized("Invalid Authorization format"))?;

        AuthContext::from_claims(self.verify(token)?)
    }
}

/// Hash a password with argon2 and a random salt
pub fn hash_password(password: &str) -> MarketplaceResult<String> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| MarketplaceError::Internal(format!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
