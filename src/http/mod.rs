//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, request span)
//!     → POST /api/chat → proxy::ProxyHandler
//!     → any other path → static files (ServeDir)
//!     → response.rs (JSON error envelope on failure)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use response::{error_envelope, ErrorEnvelope};
pub use server::{AppState, HttpServer, ServerError, CHAT_PATH};
