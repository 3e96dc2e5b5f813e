//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single backend server by its URL
//! - Hold the liveness state reported by the external health checker
//!
//! The URL doubles as the affinity identifier, so it is parsed once here and
//! compared as-is by the resolver.

use std::sync::atomic::{AtomicU8, Ordering};

use url::Url;

/// Health State enum.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Unknown = 0,
    Healthy = 1,
    Unhealthy = 2,
}

impl From<u8> for HealthState {
    fn from(val: u8) -> Self {
        match val {
            1 => HealthState::Healthy,
            2 => HealthState::Unhealthy,
            _ => HealthState::Unknown,
        }
    }
}

/// A single backend server.
#[derive(Debug)]
pub struct Backend {
    /// Unique name from configuration.
    pub name: String,
    /// Absolute URL, also the affinity identifier.
    pub url: Url,
    state: AtomicU8,
}

impl Backend {
    /// Create a new backend in the `Unknown` state.
    pub fn new(name: impl Into<String>, url: Url) -> Self {
        Self {
            name: name.into(),
            url,
            state: AtomicU8::new(HealthState::Unknown as u8),
        }
    }

    pub fn state(&self) -> HealthState {
        HealthState::from(self.state.load(Ordering::Relaxed))
    }

    /// Return true if backend is considered alive (Healthy or Unknown).
    pub fn is_healthy(&self) -> bool {
        self.state() != HealthState::Unhealthy
    }

    pub fn mark_up(&self) {
        self.set_state(HealthState::Healthy);
    }

    pub fn mark_down(&self) {
        self.set_state(HealthState::Unhealthy);
    }

    fn set_state(&self, state: HealthState) {
        let prev = HealthState::from(self.state.swap(state as u8, Ordering::Relaxed));
        if prev != state {
            tracing::info!(backend = %self.name, url = %self.url, from = ?prev, to = ?state, "Backend state changed");
        }
    }
}
