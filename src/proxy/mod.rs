//! Chat proxy subsystem.
//!
//! # Data Flow
//! ```text
//! POST /api/chat (JSON body)
//!     → handler.rs: credential present?
//!         no  → ProxyError::ConfigurationMissing (500, no network call)
//!         yes → one UpstreamClient::post_json call
//!             Ok(status, body) → relayed unchanged
//!             Err(e)           → ProxyError::ExchangeFailed (500, generic message)
//! ```

pub mod error;
pub mod handler;

pub use error::ProxyError;
pub use handler::ProxyHandler;
