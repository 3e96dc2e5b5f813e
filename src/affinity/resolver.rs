//! Affinity resolution.
//!
//! # Responsibilities
//! - Locate a candidate value: header, then query, then cookie (safe methods only)
//! - Parse it as an absolute URL
//! - Honor it only if it names a backend in the caller's alive set
//!
//! # Design Decisions
//! - First non-empty carrier wins; a parse failure there ends resolution
//! - Cookies are ignored on unsafe methods to avoid replaying state changes
//! - Membership is exact URL equality; an empty set never matches

use axum::http::Request;
use url::Url;

use crate::affinity::carrier::{self, Carrier};
use crate::affinity::error::AffinityError;
use crate::affinity::StickySession;

/// Outcome of resolving a request against the alive backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AffinityDecision {
    /// The request names an alive backend.
    Honor(Url),
    /// No carrier held a value.
    NotFound,
    /// The request names a backend that is no longer alive.
    Stale { requested: Url },
    /// The winning carrier held something that is not a URL.
    Malformed(AffinityError),
}

impl AffinityDecision {
    /// The validated backend, if any.
    pub fn backend(&self) -> Option<&Url> {
        match self {
            AffinityDecision::Honor(url) => Some(url),
            _ => None,
        }
    }

    pub fn found(&self) -> bool {
        matches!(self, AffinityDecision::Honor(_))
    }

    pub fn error(&self) -> Option<&AffinityError> {
        match self {
            AffinityDecision::Malformed(err) => Some(err),
            _ => None,
        }
    }

    /// Collapse into `Ok(Some(backend))`, `Ok(None)` or the parse error.
    pub fn into_result(self) -> Result<Option<Url>, AffinityError> {
        match self {
            AffinityDecision::Honor(url) => Ok(Some(url)),
            AffinityDecision::NotFound | AffinityDecision::Stale { .. } => Ok(None),
            AffinityDecision::Malformed(err) => Err(err),
        }
    }
}

impl StickySession {
    /// Resolve the request's affinity value against `backends`.
    pub fn resolve<B>(&self, req: &Request<B>, backends: &[Url]) -> AffinityDecision {
        let Some((carrier, raw)) = self.candidate(req) else {
            return AffinityDecision::NotFound;
        };

        let requested = match Url::parse(&raw) {
            Ok(url) => url,
            Err(source) => {
                tracing::debug!(carrier = %carrier, value = %raw, error = %source, "Malformed affinity value");
                return AffinityDecision::Malformed(AffinityError::MalformedCarrierValue {
                    carrier,
                    value: raw,
                    source,
                });
            }
        };

        if backends.contains(&requested) {
            tracing::trace!(carrier = %carrier, backend = %requested, "Affinity honored");
            AffinityDecision::Honor(requested)
        } else {
            tracing::debug!(carrier = %carrier, backend = %requested, "Affinity backend not alive");
            AffinityDecision::Stale { requested }
        }
    }

    /// First non-empty raw value in precedence order.
    fn candidate<B>(&self, req: &Request<B>) -> Option<(Carrier, String)> {
        if let Some(value) = carrier::header(req.headers(), &self.header_name) {
            if !value.is_empty() {
                return Some((Carrier::Header, value.into_owned()));
            }
        }

        if let Some(value) = carrier::query(req.uri(), &self.carrier_name) {
            if !value.is_empty() {
                return Some((Carrier::Query, value));
            }
        }

        if req.method().is_safe() {
            if let Some(value) = carrier::cookie(req.headers(), &self.carrier_name) {
                if !value.is_empty() {
                    return Some((Carrier::Cookie, value));
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::COOKIE, Method};

    const CARRIER: &str = "_backend";

    fn session() -> StickySession {
        StickySession::new(CARRIER).unwrap()
    }

    fn urls(list: &[&str]) -> Vec<Url> {
        list.iter().map(|u| Url::parse(u).unwrap()).collect()
    }

    fn url(u: &str) -> Url {
        Url::parse(u).unwrap()
    }

    #[test]
    fn test_nothing_present() {
        let req = Request::builder().uri("/app?other=1").body(()).unwrap();
        let decision = session().resolve(&req, &urls(&["http://b1"]));

        assert_eq!(decision, AffinityDecision::NotFound);
        assert!(!decision.found());
        assert!(decision.error().is_none());
    }

    #[test]
    fn test_header_hit() {
        let req = Request::builder()
            .header(CARRIER, "http://b2")
            .body(())
            .unwrap();
        let decision = session().resolve(&req, &urls(&["http://b1", "http://b2"]));

        assert!(decision.found());
        assert_eq!(decision.backend(), Some(&url("http://b2")));
        assert!(decision.error().is_none());
    }

    #[test]
    fn test_header_stale() {
        let req = Request::builder()
            .header(CARRIER, "http://b3")
            .body(())
            .unwrap();
        let decision = session().resolve(&req, &urls(&["http://b1"]));

        assert_eq!(decision, AffinityDecision::Stale { requested: url("http://b3") });
        assert_eq!(decision.backend(), None);
        assert!(decision.error().is_none());
        assert_eq!(decision.into_result(), Ok(None));
    }

    #[test]
    fn test_empty_backend_set_never_matches() {
        let req = Request::builder()
            .header(CARRIER, "http://b1")
            .body(())
            .unwrap();
        let decision = session().resolve(&req, &[]);

        assert!(!decision.found());
        assert!(decision.error().is_none());
    }

    #[test]
    fn test_header_wins_over_query_and_cookie() {
        let req = Request::builder()
            .uri("/?_backend=http://b2")
            .header(CARRIER, "http://b1")
            .header(COOKIE, "_backend=http://b3")
            .body(())
            .unwrap();
        let decision = session().resolve(&req, &urls(&["http://b1", "http://b2", "http://b3"]));

        assert_eq!(decision.backend(), Some(&url("http://b1")));
    }

    #[test]
    fn test_stale_header_does_not_fall_through() {
        let req = Request::builder()
            .uri("/?_backend=http://b2")
            .header(CARRIER, "http://gone")
            .body(())
            .unwrap();
        let decision = session().resolve(&req, &urls(&["http://b2"]));

        assert!(!decision.found());
    }

    #[test]
    fn test_malformed_header_is_terminal() {
        let req = Request::builder()
            .uri("/?_backend=http://b1")
            .header(CARRIER, "http://[b1")
            .header(COOKIE, "_backend=http://b1")
            .body(())
            .unwrap();
        let decision = session().resolve(&req, &urls(&["http://b1"]));

        assert!(!decision.found());
        assert_eq!(decision.backend(), None);
        match decision.error() {
            Some(AffinityError::MalformedCarrierValue { carrier, value, .. }) => {
                assert_eq!(*carrier, Carrier::Header);
                assert_eq!(value, "http://[b1");
            }
            other => panic!("expected malformed header, got {:?}", other),
        }
    }

    #[test]
    fn test_control_character_is_malformed() {
        let req = Request::builder()
            .uri("/?_backend=http://%00bad")
            .body(())
            .unwrap();
        let decision = session().resolve(&req, &urls(&["http://b1"]));

        assert!(!decision.found());
        assert!(matches!(
            decision.error(),
            Some(AffinityError::MalformedCarrierValue { carrier: Carrier::Query, .. })
        ));
    }

    #[test]
    fn test_relative_value_is_malformed() {
        let req = Request::builder()
            .header(CARRIER, "b1")
            .body(())
            .unwrap();
        let decision = session().resolve(&req, &urls(&["http://b1"]));

        assert!(decision.error().is_some());
    }

    #[test]
    fn test_empty_header_falls_through_to_query() {
        let req = Request::builder()
            .uri("/path?_backend=http%3A%2F%2Fb2%2F")
            .header(CARRIER, "")
            .body(())
            .unwrap();
        let decision = session().resolve(&req, &urls(&["http://b1", "http://b2"]));

        assert_eq!(decision.backend(), Some(&url("http://b2")));
    }

    #[test]
    fn test_query_wins_over_cookie() {
        let req = Request::builder()
            .uri("/?_backend=http://b1")
            .header(COOKIE, "_backend=http://b2")
            .body(())
            .unwrap();
        let decision = session().resolve(&req, &urls(&["http://b1", "http://b2"]));

        assert_eq!(decision.backend(), Some(&url("http://b1")));
    }

    #[test]
    fn test_cookie_only_on_safe_methods() {
        let backends = urls(&["http://b1"]);

        let get = Request::builder()
            .method(Method::GET)
            .header(COOKIE, "_backend=http://b1")
            .body(())
            .unwrap();
        assert_eq!(session().resolve(&get, &backends), AffinityDecision::Honor(url("http://b1")));

        let head = Request::builder()
            .method(Method::HEAD)
            .header(COOKIE, "_backend=http://b1")
            .body(())
            .unwrap();
        assert!(session().resolve(&head, &backends).found());

        let post = Request::builder()
            .method(Method::POST)
            .header(COOKIE, "_backend=http://b1")
            .body(())
            .unwrap();
        assert_eq!(session().resolve(&post, &backends), AffinityDecision::NotFound);
    }

    #[test]
    fn test_quoted_cookie_is_honored() {
        let req = Request::builder()
            .header(COOKIE, "_backend=\"http://b1/\"")
            .body(())
            .unwrap();
        let decision = session().resolve(&req, &urls(&["http://b1"]));

        assert_eq!(decision, AffinityDecision::Honor(url("http://b1")));
    }

    #[test]
    fn test_malformed_cookie_ignored_on_post() {
        let req = Request::builder()
            .method(Method::POST)
            .header(COOKIE, "_backend=http://[b1")
            .body(())
            .unwrap();
        let decision = session().resolve(&req, &urls(&["http://b1"]));

        assert_eq!(decision, AffinityDecision::NotFound);
    }

    #[test]
    fn test_header_name_is_case_insensitive() {
        let req = Request::builder()
            .header("_BACKEND", "http://b1")
            .body(())
            .unwrap();
        assert!(session().resolve(&req, &urls(&["http://b1"])).found());
    }

    #[test]
    fn test_normalized_url_equality() {
        let req = Request::builder()
            .header(CARRIER, "HTTP://B1:80/")
            .body(())
            .unwrap();
        let decision = session().resolve(&req, &urls(&["http://b1"]));

        assert_eq!(decision.backend(), Some(&url("http://b1/")));
    }
}
