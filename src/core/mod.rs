//! Core marketplace types: venues, the filter engine, accounts, sessions,
//! validation and the storage/mail seams

pub mod account;
pub mod api;
pub mod auth;
pub mod browse;
pub mod error;
pub mod filter;
pub mod mailer;
pub mod query;
pub mod session;
pub mod store;
pub mod validation;
pub mod venue;

pub use account::{AdminStats, PendingAccount, PendingVerification, User, Vendor};
pub use auth::{AccountKind, AuthContext, AuthPolicy, Claims, TokenIssuer};
pub use browse::VenueBrowser;
pub use error::{MarketplaceError, MarketplaceResult};
pub use filter::{CapacityBracket, Criterion, VenueCriteria, filter_refs, filter_venues};
pub use mailer::{LogMailer, Mailer, MemoryMailer, OutgoingMail};
pub use query::VenueQuery;
pub use session::{InMemoryTokenStore, Session, TokenStore};
pub use store::MarketplaceStore;
pub use venue::{Amenities, Venue, VenueDraft, VenueImage, VenueImages, VenueRecord};
