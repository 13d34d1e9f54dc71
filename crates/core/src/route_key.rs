//! The opaque route-key token passed from the edge router to the artifact
//! proxy.
//!
//! A route key is a *reference*, not a capability: the proxy must re-resolve
//! it through the route table instead of trusting anything embedded in the
//! request. Parsing rejects any token that is not `route:`-prefixed, which
//! closes the spoofing vector where a client hands the proxy a raw storage
//! key or arbitrary URL.

use std::fmt;

use crate::error::CoreError;

/// Scheme prefix every route key carries.
pub const ROUTE_KEY_PREFIX: &str = "route:";

/// A validated `route:{hostname}:{path}` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteKey {
    hostname: String,
    path: String,
}

impl RouteKey {
    /// Build a route key from a hostname and a request path.
    pub fn new(hostname: &str, path: &str) -> Self {
        let path = if path.is_empty() { "/" } else { path };
        Self {
            hostname: hostname.to_string(),
            path: path.to_string(),
        }
    }

    /// Parse and validate an opaque token.
    ///
    /// Rejects tokens without the `route:` prefix, with an empty hostname,
    /// or whose path does not start with `/`.
    pub fn parse(token: &str) -> Result<Self, CoreError> {
        let rest = token.strip_prefix(ROUTE_KEY_PREFIX).ok_or_else(|| {
            CoreError::Validation(format!(
                "Route key must start with '{ROUTE_KEY_PREFIX}'"
            ))
        })?;

        let (hostname, path) = rest
            .split_once(':')
            .ok_or_else(|| CoreError::Validation("Route key is missing a path part".into()))?;

        if hostname.is_empty() {
            return Err(CoreError::Validation("Route key hostname is empty".into()));
        }
        if !path.starts_with('/') {
            return Err(CoreError::Validation(
                "Route key path must start with '/'".into(),
            ));
        }

        Ok(Self {
            hostname: hostname.to_string(),
            path: path.to_string(),
        })
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ROUTE_KEY_PREFIX}{}:{}", self.hostname, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_display_and_parse() {
        let key = RouteKey::new("foo.example.com", "/pricing");
        assert_eq!(key.to_string(), "route:foo.example.com:/pricing");

        let parsed = RouteKey::parse(&key.to_string()).unwrap();
        assert_eq!(parsed, key);
        assert_eq!(parsed.hostname(), "foo.example.com");
        assert_eq!(parsed.path(), "/pricing");
    }

    #[test]
    fn empty_path_defaults_to_root() {
        let key = RouteKey::new("foo.example.com", "");
        assert_eq!(key.path(), "/");
    }

    #[test]
    fn rejects_missing_prefix() {
        // A raw storage key must never be accepted as a route key.
        let err = RouteKey::parse("pages/1/170-abc/index.html").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn rejects_missing_path() {
        assert!(RouteKey::parse("route:foo.example.com").is_err());
    }

    #[test]
    fn rejects_empty_hostname() {
        assert!(RouteKey::parse("route::/").is_err());
    }

    #[test]
    fn rejects_relative_path() {
        assert!(RouteKey::parse("route:foo.example.com:pricing").is_err());
    }
}
