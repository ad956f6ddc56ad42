use super::Finding;
use crate::config::UrlRulesConfig;
use crate::domain_utils::{matches_domain_list, ParsedUrl};

/// Token and structure checks over a parsed URL. Checks are independent;
/// the order they run in is the order reasons are reported in.
pub struct UrlRuleMatcher {
    config: UrlRulesConfig,
}

impl Default for UrlRuleMatcher {
    fn default() -> Self {
        Self::new(UrlRulesConfig::default())
    }
}

impl UrlRuleMatcher {
    pub fn new(mut config: UrlRulesConfig) -> Self {
        config.suspicious_keywords = config
            .suspicious_keywords
            .iter()
            .map(|k| k.to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { config }
    }

    pub fn is_shortener(&self, url: &ParsedUrl) -> bool {
        matches_domain_list(&url.host, &self.config.shortener_domains)
    }

    pub fn evaluate(&self, url: &ParsedUrl) -> Vec<Finding> {
        let config = &self.config;
        let mut findings = Vec::new();

        if url.has_ip_literal_host() {
            findings.push(Finding::new(config.ip_literal.weight, &config.ip_literal.reason));
        }

        if self.is_shortener(url) {
            findings.push(Finding::new(config.shortener.weight, &config.shortener.reason));
        }

        // "secure-https-bank.com" style hosts
        if url.authority.contains("https") && !url.authority.starts_with("https") {
            findings.push(Finding::new(
                config.https_token.weight,
                &config.https_token.reason,
            ));
        }

        if url.len() > config.max_length {
            findings.push(Finding::new(config.long_url.weight, &config.long_url.reason));
        }

        if url.normalized.contains('@') {
            findings.push(Finding::new(config.at_sign.weight, &config.at_sign.reason));
        }

        let keywords: Vec<&str> = config
            .suspicious_keywords
            .iter()
            .filter(|k| url.authority.contains(k.as_str()) || url.path.contains(k.as_str()))
            .map(|k| k.as_str())
            .collect();
        if !keywords.is_empty() {
            findings.push(Finding::with_matches(
                config.keywords.weight,
                &config.keywords.reason,
                &keywords,
            ));
        }

        for finding in &findings {
            log::debug!("URL rule fired for {}: {}", url.normalized, finding.reason);
        }
        findings
    }
}
