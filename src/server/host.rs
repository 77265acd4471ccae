//! Server host holding the shared marketplace state
//!
//! Handlers receive an `Arc<ServerHost>` as their axum state. The host is the
//! single source of truth for the store, the configuration and the services
//! built from it (token issuer, mail templates, mailer).

use crate::config::MarketplaceConfig;
use crate::core::auth::TokenIssuer;
use crate::core::mailer::{MailTemplates, Mailer};
use crate::core::store::MarketplaceStore;
use crate::core::validation::UploadLimits;
use anyhow::Result;
use std::sync::Arc;

/// State shared by every handler
pub type AppState = Arc<ServerHost>;

pub struct ServerHost {
    pub config: Arc<MarketplaceConfig>,

    pub store: Arc<dyn MarketplaceStore>,

    pub tokens: TokenIssuer,

    pub mailer: Arc<dyn Mailer>,

    pub templates: MailTemplates,
}

impl ServerHost {
    /// Build the host from builder components
    pub fn from_builder_components(
        config: MarketplaceConfig,
        store: Arc<dyn MarketplaceStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self> {
        let tokens = TokenIssuer::new(&config.auth.jwt_secret, config.auth.token_ttl_minutes);
        let templates = MailTemplates::new(
            &config.server.public_url,
            config.auth.verification_ttl_hours,
        )?;

        Ok(Self {
            config: Arc::new(config),
            store,
            tokens,
            mailer,
            templates,
        })
    }

    pub fn upload_limits(&self) -> UploadLimits {
        self.config.uploads
    }

    pub fn verification_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.config.auth.verification_ttl_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::AccountKind;
    use crate::core::mailer::LogMailer;
    use crate::storage::InMemoryMarketplaceStore;

    fn make_host(config: MarketplaceConfig) -> ServerHost {
        ServerHost::from_builder_components(
            config,
            Arc::new(InMemoryMarketplaceStore::new()),
            Arc::new(LogMailer),
        )
        .expect("should build host")
    }

    #[test]
    fn test_tokens_use_configured_secret() {
        let host = make_host(MarketplaceConfig::for_testing());
        let token = host.tokens.issue(AccountKind::User, "1").unwrap();

        let other = TokenIssuer::new("test-secret", 30);
        assert!(other.verify(&token).is_ok());
    }

    #[test]
    fn test_limits_and_ttl_come_from_config() {
        let mut config = MarketplaceConfig::for_testing();
        config.uploads.identity_image_max_bytes = 1024;
        config.auth.verification_ttl_hours = 2;

        let host = make_host(config);
        assert_eq!(host.upload_limits().identity_image_max_bytes, 1024);
        assert_eq!(host.verification_ttl(), chrono::Duration::hours(2));
    }
}
