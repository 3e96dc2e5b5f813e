//! Metrics collection.
//!
//! # Metrics
//! - `sticky_affinity_decisions_total` (counter): affinity outcomes by
//!   `outcome` = hit | miss | stale | malformed | skipped
//!
//! # Design Decisions
//! - Low-overhead metric updates through the `metrics` facade
//! - No-ops until the host process installs a recorder

/// Counter name for affinity decisions.
pub const AFFINITY_DECISIONS: &str = "sticky_affinity_decisions_total";

/// Record one affinity decision.
pub fn record_affinity_decision(outcome: &'static str) {
    metrics::counter!(AFFINITY_DECISIONS, "outcome" => outcome).increment(1);
}
