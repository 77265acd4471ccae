//! Verification mail
//!
//! Mail bodies are rendered from built-in `tera` templates. Delivery goes
//! through the [`Mailer`] trait; [`LogMailer`] writes each message to the log,
//! which is enough for development and for deployments that read the link
//! from the server output.

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, OnceLock, RwLock};
use tera::{Context, Tera};

pub const VERIFICATION_SUBJECT: &str = "Welcome to Shadiejo - Verify Your Email";
pub const WELCOME_SUBJECT: &str = "Welcome to Shadiejo!";

const VERIFICATION_TEMPLATE: &str = "\
Hello {{ name }},

Thank you for signing up with Shadiejo{% if vendor %} as a venue owner{% endif %}.
Please verify your email address by opening the link below:

{{ link }}

This link expires in {{ ttl_hours }} hours.
{% if vendor %}
Once verified, your account will be reviewed by our team before you can list venues.
{% endif %}
If you did not create an account, you can ignore this email.

The Shadiejo Team
";

const WELCOME_TEMPLATE: &str = "\
Hello {{ name }},

Your email address has been verified and your Shadiejo account is ready.

The Shadiejo Team
";

/// A message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<()>;
}

/// Writes every message to the log instead of delivering it
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        tracing::info!(to = %mail.to, subject = %mail.subject, "\n{}", mail.body);
        Ok(())
    }
}

/// Keeps sent messages in memory so callers can inspect them
#[derive(Debug, Clone, Default)]
pub struct MemoryMailer {
    sent: Arc<RwLock<Vec<OutgoingMail>>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.read().map(|sent| sent.clone()).unwrap_or_default()
    }

    pub fn last_to(&self, to: &str) -> Option<OutgoingMail> {
        self.sent().into_iter().rev().find(|mail| mail.to == to)
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        self.sent
            .write()
            .map_err(|e| anyhow::anyhow!("Failed to acquire write lock: {}", e))?
            .push(mail.clone());
        Ok(())
    }
}

/// Renders the marketplace's mail bodies
#[derive(Debug, Clone)]
pub struct MailTemplates {
    tera: Tera,
    public_url: String,
    ttl_hours: i64,
}

impl MailTemplates {
    pub fn new(public_url: &str, ttl_hours: i64) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("verification.txt", VERIFICATION_TEMPLATE),
            ("welcome.txt", WELCOME_TEMPLATE),
        ])
        .context("invalid built-in mail template")?;

        Ok(Self {
            tera,
            public_url: public_url.trim_end_matches('/').to_string(),
            ttl_hours,
        })
    }

    /// Link the recipient follows to confirm their address
    pub fn verification_link(&self, token: &str, vendor: bool) -> String {
        let prefix = if vendor { "vendor" } else { "auth" };
        format!("{}/{}/verify?token={}", self.public_url, prefix, token)
    }

    pub fn verification(
        &self,
        to: &str,
        name: &str,
        token: &str,
        vendor: bool,
    ) -> Result<OutgoingMail> {
        let mut context = Context::new();
        context.insert("name", name);
        context.insert("link", &self.verification_link(token, vendor));
        context.insert("ttl_hours", &self.ttl_hours);
        context.insert("vendor", &vendor);

        Ok(OutgoingMail {
            to: to.to_string(),
            subject: VERIFICATION_SUBJECT.to_string(),
            body: self.tera.render("verification.txt", &context)?,
        })
    }

    pub fn welcome(&self, to: &str, name: &str) -> Result<OutgoingMail> {
        let mut context = Context::new();
        context.insert("name", name);

        Ok(OutgoingMail {
            to: to.to_string(),
            subject: WELCOME_SUBJECT.to_string(),
            body: self.tera.render("welcome.txt", &context)?,
        })
    }
}

/// Pull the verification token back out of a rendered mail body
pub fn extract_token(body: &str) -> Option<&str> {
    static TOKEN_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    let regex = TOKEN_REGEX
        .get_or_init(|| Regex::new(r"token=([A-Za-z0-9]+)").ok())
        .as_ref()?;
    regex
        .captures(body)
        .and_then(|captures| captures.get(1))
        .map(|token| token.as_str())
}
