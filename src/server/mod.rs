//! HTTP server for the marketplace
//!
//! `ServerBuilder` assembles a `ServerHost` (config, store, mailer, token
//! issuer) and exposes it through the REST routers.

pub mod builder;
pub mod exposure;
pub mod extractors;
pub mod host;

pub use builder::ServerBuilder;
pub use exposure::RestExposure;
pub use host::{AppState, ServerHost};
