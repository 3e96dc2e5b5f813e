//! Session affinity for HTTP load balancers.
//!
//! A request can ask to return to a backend it was sent to before, through a
//! header, a query parameter or (on safe methods) a cookie, all sharing one
//! carrier name. [`StickySession`] validates that request against the
//! currently alive backends and marks responses chosen by normal selection;
//! [`BackendManager`] wires it in front of round-robin selection.
//!
//! ```text
//! request ─▶ BackendManager::select ─▶ StickySession::resolve ─┬─ Honor ──▶ sticky backend
//!                                                              └─ else ───▶ RoundRobin
//! response ◀─ BackendManager::stick ◀─ StickySession::mark (balancer choices only)
//! ```

pub mod affinity;
pub mod config;
pub mod load_balancer;
pub mod observability;

pub use affinity::{Affinity, AffinityDecision, AffinityError, StickySession};
pub use config::BalancerConfig;
pub use load_balancer::BackendManager;
