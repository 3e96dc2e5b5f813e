//! Affinity marker options.

use cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

/// Path used when the options leave it unset.
pub const DEFAULT_COOKIE_PATH: &str = "/";

/// How the chosen backend is written back to the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerMode {
    /// Response header named after the carrier.
    #[default]
    Header,
    /// `Set-Cookie` shaped by [`CookieOptions`].
    Cookie,
}

/// `SameSite` attribute of the affinity cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSitePolicy {
    Strict,
    Lax,
    None,
}

impl From<SameSitePolicy> for SameSite {
    fn from(policy: SameSitePolicy) -> Self {
        match policy {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::Lax => SameSite::Lax,
            SameSitePolicy::None => SameSite::None,
        }
    }
}

/// Shape of the affinity cookie.
///
/// Unset fields leave the matching attribute out of the cookie, except
/// `path` which falls back to [`DEFAULT_COOKIE_PATH`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CookieOptions {
    pub http_only: bool,
    pub secure: bool,
    pub path: Option<String>,
    pub domain: Option<String>,

    /// Absolute expiry, RFC 3339 in config files.
    #[serde(with = "time::serde::rfc3339::option")]
    pub expires: Option<OffsetDateTime>,

    /// Seconds. Negative values expire the cookie immediately, zero omits it.
    pub max_age: Option<i64>,

    pub same_site: Option<SameSitePolicy>,
}

impl CookieOptions {
    /// Effective cookie path.
    pub fn path(&self) -> &str {
        self.path
            .as_deref()
            .filter(|path| !path.is_empty())
            .unwrap_or(DEFAULT_COOKIE_PATH)
    }

    /// Build the cookie carrying `value` under `name`.
    pub fn build_cookie(&self, name: &str, value: &str) -> Cookie<'static> {
        let mut builder = Cookie::build((name.to_owned(), value.to_owned()))
            .path(self.path().to_owned())
            .secure(self.secure)
            .http_only(self.http_only);

        if let Some(domain) = self.domain.as_deref().filter(|d| !d.is_empty()) {
            builder = builder.domain(domain.to_owned());
        }
        if let Some(expires) = self.expires {
            builder = builder.expires(expires);
        }
        match self.max_age {
            Some(secs) if secs > 0 => builder = builder.max_age(Duration::seconds(secs)),
            Some(secs) if secs < 0 => builder = builder.max_age(Duration::ZERO),
            _ => {}
        }
        if let Some(policy) = self.same_site {
            builder = builder.same_site(policy.into());
        }

        builder.build()
    }
}
