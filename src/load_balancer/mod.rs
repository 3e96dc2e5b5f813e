//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Request for backend_group
//!     → pool.rs (snapshot alive backend URLs)
//!     → affinity resolver (honor a still-alive sticky backend?)
//!     → otherwise round_robin.rs (rotate through healthy backends)
//!     → Selection { backend, source }
//!
//! Response
//!     → pool.rs stick() marks balancer-chosen backends for next time
//! ```
//!
//! # Design Decisions
//! - Selection is stateless apart from the round-robin counter
//! - Affinity is an optional capability held by the pool, not baked into algorithms
//! - Unhealthy backends are excluded from both affinity and selection
//! - Malformed affinity never fails a request; it falls back to selection

pub mod backend;
pub mod pool;
pub mod round_robin;

use std::sync::Arc;

use crate::load_balancer::backend::Backend;

/// A backend selection algorithm.
pub trait LoadBalancer: Send + Sync + std::fmt::Debug {
    /// Pick the next healthy backend, or None if there is none.
    fn next_server(&self, backends: &[Arc<Backend>]) -> Option<Arc<Backend>>;
}

pub use pool::{BackendManager, Selection, SelectionSource};
