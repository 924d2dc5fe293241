//! Error types for the engine.

use std::net::SocketAddr;

use thiserror::Error;

pub use crate::config::loader::ConfigError;
pub use crate::routing::pattern::PatternError;

/// Failures reading from the per-request context store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// No value of the requested type was stored by an earlier middleware.
    #[error("no `{type_name}` in request context")]
    Missing { type_name: &'static str },
}

/// Server lifecycle failures.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid listen address `{addr}`: {source}")]
    Address {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
