//! Request-side carrier lookups.
//!
//! Each helper returns the first value for a name in one carrier. Callers
//! decide what "present" means: the resolver ignores empty values, session
//! confirmation accepts an empty cookie.

use std::borrow::Cow;
use std::fmt;

use axum::http::{header::COOKIE, HeaderMap, HeaderName, Uri};
use cookie::Cookie;

/// A request location that can carry an affinity value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Carrier {
    Header,
    Query,
    Cookie,
}

impl Carrier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Carrier::Header => "header",
            Carrier::Query => "query",
            Carrier::Cookie => "cookie",
        }
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First value of the header, lossily decoded.
pub(crate) fn header<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<Cow<'a, str>> {
    headers
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()))
}

/// First value of the query parameter, form-url-decoded.
pub(crate) fn query(uri: &Uri, name: &str) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// First cookie with the given name across every `Cookie` header.
///
/// Unparseable cookie pairs are skipped. Surrounding double quotes are
/// stripped from the value.
pub(crate) fn cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value_trimmed().to_owned())
}
