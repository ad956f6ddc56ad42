use super::{flag, FeatureVector};
use crate::config::UrlRulesConfig;
use crate::domain_utils::{matches_domain_list, ParsedUrl};
use anyhow::Result;

/// URLs shorter than this encode as legitimate length.
pub const SHORT_URL_LENGTH: usize = 54;
/// URLs longer than this encode as phishing-like length; in between is undecided.
pub const LONG_URL_LENGTH: usize = 75;
/// A `//` found after this offset is treated as an injected redirect.
pub const DOUBLE_SLASH_OFFSET: usize = 7;
/// Stand-in for the domain-age feature. No registry lookup is made, so every
/// domain encodes as old enough.
pub const DOMAIN_AGE_PLACEHOLDER: i8 = 1;

pub struct UrlFeatureExtractor {
    shortener_domains: Vec<String>,
}

impl Default for UrlFeatureExtractor {
    fn default() -> Self {
        Self::new(&UrlRulesConfig::default())
    }
}

impl UrlFeatureExtractor {
    pub fn new(config: &UrlRulesConfig) -> Self {
        Self {
            shortener_domains: config.shortener_domains.clone(),
        }
    }

    pub fn extract(&self, url: &ParsedUrl) -> FeatureVector {
        let length = url.len();
        let length_feature = if length < SHORT_URL_LENGTH {
            1
        } else if length <= LONG_URL_LENGTH {
            0
        } else {
            -1
        };

        let late_double_slash = url
            .normalized
            .rfind("//")
            .is_some_and(|pos| pos > DOUBLE_SLASH_OFFSET);

        FeatureVector([
            flag(url.has_ip_literal_host()),
            length_feature,
            flag(matches_domain_list(&url.host, &self.shortener_domains)),
            flag(url.normalized.contains('@')),
            flag(late_double_slash),
            flag(url.authority.contains('-')),
            flag(!url.is_secure()),
            DOMAIN_AGE_PLACEHOLDER,
            flag(url.authority.contains("https")),
        ])
    }
}

/// Normalize, parse and encode a raw URL with the default shortener list.
pub fn extract_url_features(raw: &str) -> Result<FeatureVector> {
    let url = ParsedUrl::parse(raw)?;
    Ok(UrlFeatureExtractor::default().extract(&url))
}
