//! Affinity error definitions.

use thiserror::Error;

use crate::affinity::carrier::Carrier;

/// Errors surfaced while resolving an affinity value.
///
/// Absent or stale affinity is not an error; it is reported through
/// [`AffinityDecision`](crate::affinity::AffinityDecision).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AffinityError {
    /// A carrier held a non-empty value that is not an absolute URL.
    #[error("malformed affinity value {value:?} in {carrier}: {source}")]
    MalformedCarrierValue {
        carrier: Carrier,
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors raised while building a [`StickySession`](crate::affinity::StickySession).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StickySessionError {
    #[error("carrier name must not be empty")]
    EmptyCarrierName,

    /// The name must be usable as a header, query key and cookie name alike.
    #[error("carrier name {0:?} is not a valid HTTP token")]
    InvalidCarrierName(String),
}
