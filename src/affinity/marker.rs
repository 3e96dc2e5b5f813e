//! Affinity marking on responses.

use axum::http::{header::SET_COOKIE, HeaderValue, Response};
use url::Url;

use crate::affinity::options::MarkerMode;
use crate::affinity::StickySession;

impl StickySession {
    /// Write `backend` into the response under the carrier name.
    ///
    /// Header mode replaces any existing carrier header; cookie mode appends a
    /// `Set-Cookie` and leaves other cookies alone.
    pub fn mark<B>(&self, res: &mut Response<B>, backend: &Url) {
        match self.marker {
            MarkerMode::Header => match HeaderValue::from_str(backend.as_str()) {
                Ok(value) => {
                    res.headers_mut().insert(self.header_name.clone(), value);
                }
                Err(e) => {
                    tracing::warn!(backend = %backend, error = %e, "Affinity header is not a valid header value");
                }
            },
            MarkerMode::Cookie => {
                let cookie = self.options.build_cookie(&self.carrier_name, backend.as_str());
                match HeaderValue::from_str(&cookie.to_string()) {
                    Ok(value) => {
                        res.headers_mut().append(SET_COOKIE, value);
                    }
                    Err(e) => {
                        tracing::warn!(backend = %backend, error = %e, "Affinity cookie is not a valid header value");
                    }
                }
            }
        }
    }
}
