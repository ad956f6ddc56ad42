pub mod models;

use crate::config::{EmailModelRule, UrlModelRule};
use crate::detection::Finding;
use crate::features::FeatureVector;
use anyhow::Result;
use std::sync::Arc;

pub use models::{LinearUrlModel, TermWeightModel};

/// Discrete class returned by a classifier.
pub type Outcome = i64;

/// A pre-trained classifier consumed as an opaque capability.
///
/// Implementations are loaded once and then only read, so `predict` must be
/// safe to call from several threads at the same time.
pub trait Classifier<I: ?Sized>: Send + Sync {
    fn predict(&self, input: &I) -> Result<Outcome>;
}

pub type TextClassifier = Arc<dyn Classifier<str>>;
pub type UrlClassifier = Arc<dyn Classifier<FeatureVector>>;

/// Turns a text classifier's verdict into a weighted finding.
pub struct EmailModelSignal {
    rule: EmailModelRule,
}

impl EmailModelSignal {
    pub fn new(rule: EmailModelRule) -> Self {
        Self { rule }
    }

    /// A failing model is an optional signal going missing, not an analysis
    /// failure: the error is logged and nothing is added.
    pub fn evaluate(&self, classifier: &dyn Classifier<str>, text: &str) -> Option<Finding> {
        match classifier.predict(text) {
            Ok(outcome) if outcome == self.rule.spam_outcome => {
                log::debug!("Email model flagged message (outcome {outcome})");
                Some(Finding::new(self.rule.weight, &self.rule.reason))
            }
            Ok(outcome) => {
                log::debug!("Email model passed message (outcome {outcome})");
                None
            }
            Err(e) => {
                log::warn!("Email model prediction failed, continuing without it: {e}");
                None
            }
        }
    }
}

/// Turns a URL classifier's verdict into a weighted finding. Any outcome other
/// than the configured benign value counts as phishing.
pub struct UrlModelSignal {
    rule: UrlModelRule,
}

impl UrlModelSignal {
    pub fn new(rule: UrlModelRule) -> Self {
        Self { rule }
    }

    pub fn evaluate(
        &self,
        classifier: &dyn Classifier<FeatureVector>,
        features: &FeatureVector,
    ) -> Option<Finding> {
        match classifier.predict(features) {
            Ok(outcome) if outcome == self.rule.benign_outcome => {
                log::debug!("URL model passed {:?} (outcome {outcome})", features);
                None
            }
            Ok(outcome) => {
                log::debug!("URL model flagged {:?} (outcome {outcome})", features);
                Some(Finding::new(self.rule.weight, &self.rule.reason))
            }
            Err(e) => {
                log::warn!("URL model prediction failed: {e}");
                None
            }
        }
    }
}
