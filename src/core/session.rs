//! Session state shared between the API client and its callers
//!
//! The bearer token lives behind the [`TokenStore`] trait so the client can be
//! handed whatever storage the embedding application uses. Every change (set
//! or clear) is observable through a `tokio::sync::watch` channel.
//!
//! # Usage
//!
//! ```rust,ignore
//! let session = Session::in_memory();
//! let mut changes = session.store().on_change();
//!
//! session.sign_in("eyJ...", AccountKind::Vendor);
//! changes.changed().await?;
//! assert!(changes.borrow().is_some());
//! ```

use crate::core::auth::AccountKind;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// Storage for the current bearer token
pub trait TokenStore: Send + Sync {
    fn get_token(&self) -> Option<String>;

    fn set_token(&self, token: String);

    fn clear_token(&self);

    /// Receiver that is notified after every set or clear
    ///
    /// Changes made before this call are not replayed; the current value is
    /// available through `borrow()`.
    fn on_change(&self) -> watch::Receiver<Option<String>>;
}

/// Token store kept in process memory
///
/// Cheap to clone; clones share the same token.
#[derive(Debug, Clone)]
pub struct InMemoryTokenStore {
    sender: Arc<watch::Sender<Option<String>>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Store pre-seeded with a token
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.set_token(token.into());
        store
    }
}

impl Default for InMemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn get_token(&self) -> Option<String> {
        self.sender.borrow().clone()
    }

    fn set_token(&self, token: String) {
        // send_replace succeeds even with no live receivers
        self.sender.send_replace(Some(token));
    }

    fn clear_token(&self) {
        self.sender.send_replace(None);
    }

    fn on_change(&self) -> watch::Receiver<Option<String>> {
        self.sender.subscribe()
    }
}

/// The signed-in state of one client
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
    kind: Arc<watch::Sender<Option<AccountKind>>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("signed_in", &self.is_signed_in())
            .field("kind", &self.kind())
            .finish()
    }
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let (kind, _) = watch::channel(None);
        Self {
            store,
            kind: Arc::new(kind),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryTokenStore::new()))
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Record a successful login
    pub fn sign_in(&self, token: impl Into<String>, kind: AccountKind) {
        self.kind.send_replace(Some(kind));
        self.store.set_token(token.into());
    }

    pub fn sign_out(&self) {
        self.kind.send_replace(None);
        self.store.clear_token();
    }

    pub fn is_signed_in(&self) -> bool {
        self.store.get_token().is_some()
    }

    /// Account kind of the last login, if the token is still present
    pub fn kind(&self) -> Option<AccountKind> {
        if !self.is_signed_in() {
            return None;
        }
        *self.kind.borrow()
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> Option<String> {
        self.store.get_token().map(|token| format!("Bearer {}", token))
    }

    /// Token changes as a stream, starting with the current value
    pub fn changes(&self) -> WatchStream<Option<String>> {
        WatchStream::new(self.store.on_change())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::in_memory()
    }
}
