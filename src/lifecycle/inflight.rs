//! In-flight request tracking.
//!
//! # Responsibilities
//! - Count requests currently inside `Engine::handle`
//! - Give every request a sequential id for logs
//! - Let the shutdown path report how many requests a timed-out drain left behind

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::observability::metrics;

/// Shared counter of active requests.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    active: Arc<AtomicU64>,
    served: Arc<AtomicU64>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new request. The returned guard decrements on drop.
    pub fn track(&self) -> InFlightGuard {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        let id = self.served.fetch_add(1, Ordering::Relaxed) + 1;
        metrics::set_in_flight(active);
        InFlightGuard {
            active: Arc::clone(&self.active),
            id,
        }
    }

    pub fn active_count(&self) -> u64 {
        self.active.load(Ordering::SeqCst)
    }
}

/// Guard held for the lifetime of one request.
#[derive(Debug)]
pub struct InFlightGuard {
    active: Arc<AtomicU64>,
    id: u64,
}

impl InFlightGuard {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let remaining = self.active.fetch_sub(1, Ordering::SeqCst) - 1;
        metrics::set_in_flight(remaining);
        tracing::trace!(request = self.id, remaining, "Request finished");
    }
}
