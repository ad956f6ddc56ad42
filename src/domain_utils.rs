use anyhow::{anyhow, Context, Result};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// A URL split into the parts the heuristics look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    /// Input with a scheme guaranteed (`http://` prepended when missing)
    pub normalized: String,
    pub scheme: String,
    /// Network location as written: `user:pass@host:port`, lower-cased
    pub authority: String,
    pub host: String,
    /// Lower-cased path component
    pub path: String,
}

fn scheme_regex() -> &'static Regex {
    static SCHEME: OnceLock<Regex> = OnceLock::new();
    SCHEME.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").expect("scheme pattern is valid")
    })
}

fn ipv4_regex() -> &'static Regex {
    static IPV4: OnceLock<Regex> = OnceLock::new();
    IPV4.get_or_init(|| {
        Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}").expect("IPv4 pattern is valid")
    })
}

impl ParsedUrl {
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized = normalize_url(raw);
        let url = Url::parse(&normalized)
            .with_context(|| format!("Invalid URL '{}'", raw.trim()))?;
        let host = url
            .host_str()
            .ok_or_else(|| anyhow!("URL '{}' has no host", raw.trim()))?
            .to_lowercase();

        let mut authority = String::new();
        if !url.username().is_empty() || url.password().is_some() {
            authority.push_str(url.username());
            if let Some(password) = url.password() {
                authority.push(':');
                authority.push_str(password);
            }
            authority.push('@');
        }
        authority.push_str(&host);
        if let Some(port) = url.port() {
            authority.push_str(&format!(":{port}"));
        }

        Ok(Self {
            scheme: url.scheme().to_string(),
            authority: authority.to_lowercase(),
            path: url.path().to_lowercase(),
            host,
            normalized,
        })
    }

    /// Dotted-quad anywhere in the network location
    pub fn has_ip_literal_host(&self) -> bool {
        ipv4_regex().is_match(&self.authority)
    }

    pub fn is_secure(&self) -> bool {
        self.scheme == "https"
    }

    /// Length in characters of the normalized URL
    pub fn len(&self) -> usize {
        self.normalized.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

/// Prepend `http://` when the input carries no `scheme://` prefix.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if scheme_regex().is_match(trimmed) {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

/// Check if domain matches any in list (exact or subdomain)
pub fn matches_domain_list(domain: &str, domain_list: &[String]) -> bool {
    let domain_lower = domain.to_lowercase();

    domain_list.iter().any(|pattern| {
        let pattern_lower = pattern.to_lowercase();
        domain_lower == pattern_lower || domain_lower.ends_with(&format!(".{}", pattern_lower))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("example.com/login"), "http://example.com/login");
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
        assert_eq!(normalize_url("  HTTP://Example.com "), "HTTP://Example.com");
        assert_eq!(normalize_url("https-login.com"), "http://https-login.com");
    }

    #[test]
    fn test_parse_keeps_userinfo_in_authority() {
        let parsed = ParsedUrl::parse("http://secure-login.example.com@203.0.113.5/verify").unwrap();
        assert_eq!(parsed.host, "203.0.113.5");
        assert_eq!(parsed.authority, "secure-login.example.com@203.0.113.5");
        assert_eq!(parsed.path, "/verify");
        assert_eq!(parsed.scheme, "http");
        assert!(parsed.has_ip_literal_host());
        assert!(!parsed.is_secure());
    }

    #[test]
    fn test_parse_without_scheme() {
        let parsed = ParsedUrl::parse("Example.COM:8080/Account").unwrap();
        assert_eq!(parsed.normalized, "http://Example.COM:8080/Account");
        assert_eq!(parsed.authority, "example.com:8080");
        assert_eq!(parsed.path, "/account");
        assert!(!parsed.has_ip_literal_host());
    }

    #[test]
    fn test_parse_failure_is_an_error() {
        assert!(ParsedUrl::parse("").is_err());
        assert!(ParsedUrl::parse("http://").is_err());
        assert!(ParsedUrl::parse("http://exa mple.com").is_err());
    }

    #[test]
    fn test_matches_domain_list() {
        let domains = vec!["bit.ly".to_string(), "t.co".to_string()];

        assert!(matches_domain_list("bit.ly", &domains));
        assert!(matches_domain_list("www.bit.ly", &domains));
        assert!(matches_domain_list("T.CO", &domains));
        assert!(!matches_domain_list("mart.com", &domains));
        assert!(!matches_domain_list("notbit.ly", &domains));
    }
}
