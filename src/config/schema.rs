//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the balancer.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::affinity::{CookieOptions, MarkerMode};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BalancerConfig {
    /// Backend server definitions.
    pub backends: Vec<BackendConfig>,

    /// Session affinity settings.
    pub sticky_session: StickySessionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Backend server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Unique backend identifier.
    pub name: String,

    /// Backend group this server belongs to.
    pub group: String,

    /// Absolute backend URL (e.g., "http://127.0.0.1:3000"). This is also
    /// the value carried by the affinity marker.
    pub url: String,
}

/// Session affinity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StickySessionConfig {
    /// Enable session affinity.
    pub enabled: bool,

    /// Header, query parameter and cookie name carrying the backend URL.
    pub carrier_name: String,

    /// Response marker: "header" or "cookie".
    pub marker: MarkerMode,

    /// Only attempt affinity for clients holding an `app_session_id`.
    pub require_app_session: bool,

    /// Affinity cookie shape, used when `marker = "cookie"`.
    pub cookie: CookieOptions,
}

impl Default for StickySessionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            carrier_name: "_backend".to_string(),
            marker: MarkerMode::Header,
            require_app_session: false,
            cookie: CookieOptions::default(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
