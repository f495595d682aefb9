//! Blocking client for the OpenXML registrar API.
//!
//! [`ApiClient`] performs one synchronous HTTP POST per call: it
//! renders a [`Request`](zonepull_protocol::Request), sends it, and
//! parses the body into a [`Reply`](zonepull_protocol::Reply).
//! [`ZoneApi`] layers the typed operations the export tooling issues
//! (domain/zone listings with pagination, record retrieval, domain
//! info) on top of that single primitive.
//!
//! There is no connection reuse semantics, retrying or request
//! pipelining: a timeout or network error surfaces once, and envelope
//! instances are not shared across calls.

pub mod client;
pub mod config;
pub mod error;
pub mod ops;

pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::{ClientError, ClientResult};
pub use ops::{FAULT_UNKNOWN_DOMAIN, PageWindow, ZoneApi};
