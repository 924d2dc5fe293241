//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → resolve the shutdown future passed to Engine::serve
//!
//! Shutdown (shutdown.rs):
//!     trigger() → every subscriber's wait() completes
//!
//! In-flight (inflight.rs):
//!     Engine::handle → track() guard per request → count drops on completion
//!
//! Server drain:
//!     Signal received → stop accepting → wait for in-flight (bounded) → exit
//! ```
//!
//! # Design Decisions
//! - Shutdown has a timeout: after the deadline the server returns even if
//!   requests are still running
//! - Requests are never cancelled by the drain itself

pub mod inflight;
pub mod shutdown;
pub mod signals;

pub use inflight::{InFlight, InFlightGuard};
pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
