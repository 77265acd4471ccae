//! API exposure modules
//!
//! An exposure consumes a `ServerHost` and produces a Router for its protocol.
//! The marketplace is served over REST only.

pub mod rest;

pub use rest::RestExposure;
