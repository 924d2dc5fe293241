//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GigaConfig (validated, immutable)
//!     → app/server sections handed to Engine and Engine::run
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; routes are code, not config
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{AppConfig, GigaConfig, LogFormat, ObservabilityConfig, ServerConfig};
pub use validation::ValidationError;
