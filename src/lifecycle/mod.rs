//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Init logging → Build handler → Bind listener → Serve
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger → axum stops accepting → in-flight requests drain → Exit
//! ```
//!
//! Draining has no deadline. Upstream calls carry no timeout either, so a
//! hung upstream call holds shutdown open until the peer closes the
//! connection or the process is killed.

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
