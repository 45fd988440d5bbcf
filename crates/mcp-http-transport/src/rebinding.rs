//! DNS-rebinding guard: `Host`/`Origin` header validation against allow-lists.
//!
//! A pattern is either a literal (`localhost:8080`, `https://example.com`) or
//! carries a `*` in the port position (`localhost:*`, `https://example.com:*`)
//! matching any numeric port. No other wildcard shapes are supported.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsRebindingSettings {
    pub enabled: bool,
    #[serde(default)]
    pub allowed_hosts: Vec<String>,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for DnsRebindingSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            allowed_hosts: Vec::new(),
            allowed_origins: Vec::new(),
        }
    }
}

impl DnsRebindingSettings {
    pub fn host_allowed(&self, host: &str) -> bool {
        self.allowed_hosts.iter().any(|p| pattern_matches(p, host))
    }

    pub fn origin_allowed(&self, origin: &str) -> bool {
        self.allowed_origins
            .iter()
            .any(|p| pattern_matches(p, origin))
    }
}

/// Matches `candidate` against `pattern`. A trailing `:*` in the pattern's
/// port position matches any sequence of ASCII digits there; everything else
/// must match literally.
fn pattern_matches(pattern: &str, candidate: &str) -> bool {
    match pattern.strip_suffix(":*") {
        Some(prefix) => match candidate.rsplit_once(':') {
            Some((candidate_prefix, port)) => {
                candidate_prefix == prefix && !port.is_empty() && port.chars().all(|c| c.is_ascii_digit())
            }
            None => false,
        },
        None => pattern == candidate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_pattern_matches_exactly() {
        let settings = DnsRebindingSettings {
            enabled: true,
            allowed_hosts: vec!["localhost:8080".to_string()],
            allowed_origins: vec![],
        };
        assert!(settings.host_allowed("localhost:8080"));
        assert!(!settings.host_allowed("localhost:8081"));
    }

    #[test]
    fn wildcard_port_matches_any_numeric_port() {
        let settings = DnsRebindingSettings {
            enabled: true,
            allowed_hosts: vec!["localhost:*".to_string()],
            allowed_origins: vec!["https://example.com:*".to_string()],
        };
        assert!(settings.host_allowed("localhost:3000"));
        assert!(settings.host_allowed("localhost:80"));
        assert!(!settings.host_allowed("evil.example:80"));
        assert!(settings.origin_allowed("https://example.com:443"));
    }

    #[test]
    fn wildcard_port_rejects_non_numeric_or_missing_port() {
        assert!(!pattern_matches("localhost:*", "localhost"));
        assert!(!pattern_matches("localhost:*", "localhost:abc"));
    }

    #[test]
    fn disabled_settings_default_to_no_allowed_entries() {
        let settings = DnsRebindingSettings::default();
        assert!(!settings.enabled);
        assert!(!settings.host_allowed("localhost:8080"));
    }
}
