//! Redirect target validation for verification endpoints.
//!
//! Magic-link verification bounces the browser to a companion frontend via
//! a caller-supplied `redirect` query parameter. Only operator-configured
//! origins are honored; anything else falls back to a fixed default so the
//! endpoint cannot be used as an open redirect in phishing mail.

use url::Url;

/// Validates caller-supplied redirect URLs against an origin allow-list.
#[derive(Debug, Clone)]
pub struct RedirectValidator {
    allowed: Vec<Url>,
    default: String,
}

impl RedirectValidator {
    /// `allowed_origins` entries are parsed as URLs; only their
    /// scheme/host/port matter. Unparseable entries are dropped with a
    /// warning. `default` is returned for any candidate that fails the
    /// check and is trusted as configured.
    pub fn new(allowed_origins: &[String], default: String) -> Self {
        let allowed = allowed_origins
            .iter()
            .filter_map(|origin| match Url::parse(origin) {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!(origin = %origin, error = %e, "Ignoring unparseable allowed origin");
                    None
                }
            })
            .collect();

        Self { allowed, default }
    }

    /// Return `candidate` verbatim (path and query preserved) if its
    /// origin is allow-listed, otherwise the configured default.
    pub fn sanitize(&self, candidate: &str) -> String {
        match Url::parse(candidate) {
            Ok(url) if self.is_allowed(&url) => candidate.to_string(),
            _ => self.default.clone(),
        }
    }

    fn is_allowed(&self, url: &Url) -> bool {
        self.allowed.iter().any(|allowed| {
            allowed.scheme() == url.scheme()
                && allowed.host_str() == url.host_str()
                && allowed.port_or_known_default() == url.port_or_known_default()
        })
    }
}
