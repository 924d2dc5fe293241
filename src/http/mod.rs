//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum serve loop, tower-http layers, graceful shutdown)
//!     → request.rs (request id)
//!     → Engine::handle (middleware lookup, body buffering)
//!     → context.rs (handler chain, typed store, writers)
//!     → response.rs (recorded status/headers/body → axum Response)
//!     → Send to client
//! ```

pub mod context;
pub mod handler;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use context::Context;
pub use handler::{handler, HandlerFunc};
pub use request::X_REQUEST_ID;
pub use response::H;
