//! HTTP boundary: the analysis form, its JSON endpoint, the standalone
//! premium button, artifact downloads and a health probe.
//!
//! `build_router()` returns a `Router` that can be mounted on any axum
//! server; `server::start_server` runs it on a TCP listener.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::build_router;
pub use server::{start_server, WebServer};
