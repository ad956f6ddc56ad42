pub mod url_features;

use serde::{Deserialize, Serialize};

pub use url_features::{extract_url_features, UrlFeatureExtractor};

/// Number of positions in a [`FeatureVector`].
pub const FEATURE_COUNT: usize = 9;

/// Structural URL signals, one signed value per position.
///
/// Positions, in order: IP-literal host, URL length, shortener, `@` present,
/// late `//`, hyphen in host, secure scheme, domain age, `https` in host.
/// `1` reads as legitimate, `-1` as phishing-like and `0` as undecided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureVector(pub [i8; FEATURE_COUNT]);

impl FeatureVector {
    pub fn values(&self) -> &[i8; FEATURE_COUNT] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = i8> + '_ {
        self.0.iter().copied()
    }
}

/// Map a boolean "looks risky" signal onto the signed encoding.
pub(crate) fn flag(risky: bool) -> i8 {
    if risky {
        -1
    } else {
        1
    }
}
