//! Giga: a small HTTP web framework.
//!
//! Register handlers against `:param` / `*wildcard` patterns, organize them in
//! prefix groups carrying middleware, and serve with graceful shutdown.

pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::GigaConfig;
pub use engine::{Engine, RouterGroup};
pub use error::{ContextError, EngineError};
pub use http::{handler, middleware, Context, HandlerFunc, H};
pub use lifecycle::Shutdown;
