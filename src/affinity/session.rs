//! Application session confirmation.
//!
//! Independent of the affinity carrier: looks for the application's own
//! session indicator so a router can skip affinity for clients without one.

use axum::http::{HeaderName, Request};

use crate::affinity::carrier;

/// Name of the application session indicator.
pub const APP_SESSION_ID: &str = "app_session_id";

/// [`APP_SESSION_ID`] as a header name.
pub const APP_SESSION_HEADER: HeaderName = HeaderName::from_static(APP_SESSION_ID);

/// Returns true if the request carries the application session indicator.
///
/// Header and query values must be non-empty. The cookie only counts on safe
/// methods, but any value (even empty) counts as present.
pub fn has_application_session<B>(req: &Request<B>) -> bool {
    if carrier::header(req.headers(), &APP_SESSION_HEADER).is_some_and(|v| !v.is_empty()) {
        return true;
    }

    if carrier::query(req.uri(), APP_SESSION_ID).is_some_and(|v| !v.is_empty()) {
        return true;
    }

    req.method().is_safe() && carrier::cookie(req.headers(), APP_SESSION_ID).is_some()
}
