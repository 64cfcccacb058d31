//! Upstream API subsystem.
//!
//! # Data Flow
//! ```text
//! UpstreamConfig (base URL, version, model) + Credential
//!     → target.rs (compose request URL once per call)
//!     → client.rs (single POST, JSON decode)
//!     → UpstreamResponse { status, body } | ExchangeError
//! ```
//!
//! # Security Constraints
//! - The API key only ever lives in `Credential` and the outbound URL
//! - Never log the outbound URL with the key attached

pub mod client;
pub mod credential;
pub mod target;

pub use client::{ExchangeError, HttpUpstream, UpstreamClient, UpstreamResponse};
pub use credential::Credential;
pub use target::{TargetError, UpstreamTarget};
