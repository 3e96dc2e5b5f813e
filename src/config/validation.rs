//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Backend URLs must be absolute, names unique
//! - Sticky session settings must produce a usable carrier and cookie
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BalancerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;
use url::Url;

use crate::affinity::{MarkerMode, SameSitePolicy, StickySession};
use crate::config::schema::BalancerConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("backend {name:?} has invalid url {url:?}: {source}")]
    InvalidBackendUrl {
        name: String,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("duplicate backend name {0:?}")]
    DuplicateBackend(String),

    #[error("sticky_session.carrier_name: {0}")]
    InvalidCarrierName(String),

    #[error("sticky_session.cookie.path {0:?} must start with '/'")]
    InvalidCookiePath(String),

    #[error("sticky_session.cookie.same_site = \"none\" requires secure = true")]
    InsecureSameSiteNone,
}

pub fn validate_config(config: &BalancerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for backend in &config.backends {
        if !seen.insert(backend.name.as_str()) {
            errors.push(ValidationError::DuplicateBackend(backend.name.clone()));
        }
        if let Err(source) = Url::parse(&backend.url) {
            errors.push(ValidationError::InvalidBackendUrl {
                name: backend.name.clone(),
                url: backend.url.clone(),
                source,
            });
        }
    }

    let sticky = &config.sticky_session;
    if sticky.enabled {
        if let Err(e) = StickySession::new(sticky.carrier_name.clone()) {
            errors.push(ValidationError::InvalidCarrierName(e.to_string()));
        }

        if sticky.marker == MarkerMode::Cookie {
            if let Some(path) = sticky.cookie.path.as_deref() {
                if !path.is_empty() && !path.starts_with('/') {
                    errors.push(ValidationError::InvalidCookiePath(path.to_string()));
                }
            }
            if sticky.cookie.same_site == Some(SameSitePolicy::None) && !sticky.cookie.secure {
                errors.push(ValidationError::InsecureSameSiteNone);
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
