//! Configuration loading and management

use crate::core::validation::UploadLimits;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind (e.g., "127.0.0.1:8000")
    pub bind: String,

    /// Base URL used in links sent to users
    pub public_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
            public_url: "http://localhost:8000".to_string(),
        }
    }
}

/// Token settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,

    /// Lifetime of access tokens
    pub token_ttl_minutes: i64,

    /// Lifetime of e-mail verification links
    pub verification_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            token_ttl_minutes: 30,
            verification_ttl_hours: 24,
        }
    }
}

/// Credentials of the single admin account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin".to_string(),
        }
    }
}

/// Choices offered by the venue forms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub venue_types: Vec<String>,
    pub cities: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            venue_types: [
                "Wedding Hall",
                "Garden Venue",
                "Conference Center",
                "Banquet Hall",
                "Outdoor Venue",
                "Resort",
                "Hotel Venue",
                "Restaurant",
                "Other",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            cities: ["Islamabad", "Lahore", "Karachi"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Complete configuration of the marketplace server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketplaceConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub admin: AdminConfig,
    pub uploads: UploadLimits,
    pub catalog: CatalogConfig,
}

impl MarketplaceConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Merge another configuration into this one
    ///
    /// Scalars from `other` win when they differ from the defaults; catalog
    /// lists are unioned, keeping first-seen order.
    pub fn merge(mut self, other: MarketplaceConfig) -> Self {
        let defaults = MarketplaceConfig::default();

        macro_rules! take {
            ($($section:ident . $field:ident),* $(,)?) => {
                $(
                    if other.$section.$field != defaults.$section.$field {
                        self.$section.$field = other.$section.$field;
                    }
                )*
            };
        }

        take!(
            server.bind,
            server.public_url,
            auth.jwt_secret,
            auth.token_ttl_minutes,
            auth.verification_ttl_hours,
            admin.username,
            admin.password,
            uploads.venue_image_max_bytes,
            uploads.identity_image_max_bytes,
        );

        for venue_type in other.catalog.venue_types {
            if !self.catalog.venue_types.contains(&venue_type) {
                self.catalog.venue_types.push(venue_type);
            }
        }
        for city in other.catalog.cities {
            if !self.catalog.cities.contains(&city) {
                self.catalog.cities.push(city);
            }
        }

        self
    }

    /// Settings for tests: short-lived but otherwise default
    pub fn for_testing() -> Self {
        let mut config = Self::default();
        config.auth.jwt_secret = "test-secret".to_string();
        config
    }
}
