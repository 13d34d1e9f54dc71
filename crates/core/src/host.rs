//! Hostname classification for the edge router.
//!
//! Custom-page traffic arrives on subdomains of the platform's base domain
//! (`{slug}.{base_domain}`). The apex and `www` names are reserved for the
//! application itself and always pass through untouched.

/// Reserved leftmost labels that never resolve to a published page.
const RESERVED_LABELS: &[&str] = &["www"];

/// Classification outcome for an inbound `Host` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostClass {
    /// Apex, `www`, or a host outside the platform's domain pattern.
    Passthrough,
    /// A custom page hostname; carries the full hostname (port stripped).
    CustomPage { hostname: String },
}

/// Classify a raw `Host` header value against the platform base domain.
pub fn classify_host(raw_host: &str, base_domain: &str) -> HostClass {
    let hostname = strip_port(raw_host).to_ascii_lowercase();

    // Apex serves the application itself.
    if hostname == base_domain {
        return HostClass::Passthrough;
    }

    let Some(label) = hostname.strip_suffix(base_domain).and_then(|prefix| {
        // Must be "{label}." ahead of the base domain, with a single label.
        let label = prefix.strip_suffix('.')?;
        (!label.is_empty() && !label.contains('.')).then_some(label)
    }) else {
        return HostClass::Passthrough;
    };

    if RESERVED_LABELS.contains(&label) {
        return HostClass::Passthrough;
    }

    HostClass::CustomPage { hostname }
}

/// Derive the page slug from a custom hostname's leftmost label.
pub fn slug_from_hostname(hostname: &str) -> &str {
    hostname.split('.').next().unwrap_or(hostname)
}

fn strip_port(host: &str) -> &str {
    host.rsplit_once(':')
        .map(|(h, port)| {
            if port.chars().all(|c| c.is_ascii_digit()) {
                h
            } else {
                host
            }
        })
        .unwrap_or(host)
}
