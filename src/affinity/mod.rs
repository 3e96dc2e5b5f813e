//! Session affinity ("sticky sessions").
//!
//! # Data Flow
//! ```text
//! Incoming request + alive backend URLs
//!     → resolver.rs (header → query → cookie on safe methods)
//!     → parse as absolute URL, check membership
//!     → AffinityDecision: Honor / NotFound / Stale / Malformed
//!
//! Backend chosen by normal selection
//!     → marker.rs (response header, or Set-Cookie per CookieOptions)
//!
//! session.rs answers "does the client hold an app session" on its own,
//! using the fixed `app_session_id` indicator.
//! ```
//!
//! # Design Decisions
//! - One carrier name drives all three request carriers and the marker
//! - Immutable after construction; share via `Arc`
//! - No I/O, no interior state: every operation is a function of its inputs
//! - Absent or stale affinity is a normal outcome, never an error

pub mod carrier;
pub mod error;
pub mod marker;
pub mod options;
pub mod resolver;
pub mod session;

use axum::http::{HeaderName, Request, Response};
use url::Url;

use crate::config::StickySessionConfig;

pub use carrier::Carrier;
pub use error::{AffinityError, StickySessionError};
pub use options::{CookieOptions, MarkerMode, SameSitePolicy};
pub use resolver::AffinityDecision;
pub use session::{has_application_session, APP_SESSION_HEADER, APP_SESSION_ID};

/// The capability a router consults before and after its own selection.
pub trait Affinity: Send + Sync + std::fmt::Debug {
    /// Find a still-alive backend the request asks to stick to.
    fn resolve<B>(&self, req: &Request<B>, backends: &[Url]) -> AffinityDecision;

    /// Record `backend` on the response so the client carries it back.
    fn mark<B>(&self, res: &mut Response<B>, backend: &Url);
}

/// Sticky session settings: carrier name, marker mode and cookie shape.
#[derive(Debug, Clone)]
pub struct StickySession {
    carrier_name: String,
    header_name: HeaderName,
    marker: MarkerMode,
    options: CookieOptions,
}

impl StickySession {
    /// Create a header-marking sticky session with default cookie options.
    pub fn new(carrier_name: impl Into<String>) -> Result<Self, StickySessionError> {
        Self::with_options(carrier_name, CookieOptions::default())
    }

    /// Create a sticky session whose cookie is shaped by `options`.
    pub fn with_options(
        carrier_name: impl Into<String>,
        options: CookieOptions,
    ) -> Result<Self, StickySessionError> {
        let carrier_name = carrier_name.into();
        if carrier_name.is_empty() {
            return Err(StickySessionError::EmptyCarrierName);
        }
        let header_name = HeaderName::from_bytes(carrier_name.as_bytes())
            .map_err(|_| StickySessionError::InvalidCarrierName(carrier_name.clone()))?;

        Ok(Self {
            carrier_name,
            header_name,
            marker: MarkerMode::default(),
            options,
        })
    }

    /// Switch between header and cookie marking.
    pub fn with_marker(mut self, marker: MarkerMode) -> Self {
        self.marker = marker;
        self
    }

    pub fn from_config(config: &StickySessionConfig) -> Result<Self, StickySessionError> {
        Ok(Self::with_options(config.carrier_name.clone(), config.cookie.clone())?
            .with_marker(config.marker))
    }

    pub fn carrier_name(&self) -> &str {
        &self.carrier_name
    }

    pub fn header_name(&self) -> &HeaderName {
        &self.header_name
    }

    pub fn marker(&self) -> MarkerMode {
        self.marker
    }

    pub fn options(&self) -> &CookieOptions {
        &self.options
    }
}

impl Affinity for StickySession {
    fn resolve<B>(&self, req: &Request<B>, backends: &[Url]) -> AffinityDecision {
        StickySession::resolve(self, req, backends)
    }

    fn mark<B>(&self, res: &mut Response<B>, backend: &Url) {
        StickySession::mark(self, res, backend)
    }
}
