//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits > 0)
//! - Check that addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GigaConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GigaConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} `{value}` is not a valid socket address")]
    Address { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

pub fn validate_config(config: &GigaConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.app.name.trim().is_empty() {
        errors.push(ValidationError::Empty { field: "app.name" });
    }
    check_addr(&mut errors, "app.addr", &config.app.addr);

    if config.server.shutdown_timeout_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "server.shutdown_timeout_secs",
        });
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "server.request_timeout_secs",
        });
    }
    if config.server.max_body_bytes == 0 {
        errors.push(ValidationError::Zero {
            field: "server.max_body_bytes",
        });
    }

    if config.observability.metrics_enabled {
        check_addr(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_addr(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::Address {
            field,
            value: value.to_string(),
        });
    }
}
