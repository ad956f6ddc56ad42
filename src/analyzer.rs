use crate::analysis::{AnalysisResult, LabelScale, ScoreCard};
use crate::config::Config;
use crate::detection::email_rules::EmailRuleMatcher;
use crate::detection::url_rules::UrlRuleMatcher;
use crate::domain_utils::ParsedUrl;
use crate::features::{FeatureVector, UrlFeatureExtractor};
use crate::machine_learning::{
    Classifier, EmailModelSignal, TextClassifier, UrlClassifier, UrlModelSignal,
};

/// Reason reported when the URL model was never loaded.
pub const MODEL_UNAVAILABLE_REASON: &str = "System error: URL model could not be loaded";

/// Scores message text. Runs on heuristics alone when no classifier is given.
pub struct EmailAnalyzer {
    rules: EmailRuleMatcher,
    model_signal: EmailModelSignal,
    classifier: Option<TextClassifier>,
}

impl EmailAnalyzer {
    pub fn new(config: &Config, classifier: Option<TextClassifier>) -> Self {
        Self {
            rules: EmailRuleMatcher::new(&config.email),
            model_signal: EmailModelSignal::new(config.email.model.clone()),
            classifier,
        }
    }

    pub fn analyze(&self, text: &str) -> AnalysisResult {
        self.analyze_with(self.classifier.as_deref(), text)
    }

    pub fn analyze_with(
        &self,
        classifier: Option<&dyn Classifier<str>>,
        text: &str,
    ) -> AnalysisResult {
        let mut card = ScoreCard::new();
        card.extend(self.rules.evaluate(text));

        if let Some(classifier) = classifier {
            card.extend(self.model_signal.evaluate(classifier, text));
        }

        log::debug!("Email analysis raw score: {}", card.total());
        card.finish(LabelScale::Email)
    }
}

/// Scores a URL. The model is part of the primary signal here, so an analyzer
/// built without one answers every request with an error result.
pub struct UrlAnalyzer {
    rules: UrlRuleMatcher,
    extractor: UrlFeatureExtractor,
    model_signal: UrlModelSignal,
    classifier: Option<UrlClassifier>,
}

impl UrlAnalyzer {
    pub fn new(config: &Config, classifier: Option<UrlClassifier>) -> Self {
        Self {
            rules: UrlRuleMatcher::new(config.url.clone()),
            extractor: UrlFeatureExtractor::new(&config.url),
            model_signal: UrlModelSignal::new(config.url.model.clone()),
            classifier,
        }
    }

    pub fn analyze(&self, url: &str) -> AnalysisResult {
        match &self.classifier {
            Some(classifier) => self.analyze_with(classifier.as_ref(), url),
            None => {
                log::warn!("URL analysis requested but no URL model is loaded");
                AnalysisResult::error(MODEL_UNAVAILABLE_REASON)
            }
        }
    }

    pub fn analyze_with(
        &self,
        classifier: &dyn Classifier<FeatureVector>,
        url: &str,
    ) -> AnalysisResult {
        let parsed = match ParsedUrl::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::debug!("URL analysis failed: {e:#}");
                return AnalysisResult::error(format!("Analysis error: {e:#}"));
            }
        };

        let mut card = ScoreCard::new();
        card.extend(self.rules.evaluate(&parsed));

        let features = self.extractor.extract(&parsed);
        card.extend(self.model_signal.evaluate(classifier, &features));

        log::debug!(
            "URL analysis of {} raw score: {}",
            parsed.normalized,
            card.total()
        );
        card.finish(LabelScale::Url)
    }
}

/// Analyze message text with the built-in rule tables.
pub fn analyze_email_text(
    text: &str,
    classifier: Option<&dyn Classifier<str>>,
) -> AnalysisResult {
    EmailAnalyzer::new(&Config::default(), None).analyze_with(classifier, text)
}

/// Analyze a URL with the built-in rule tables.
pub fn analyze_url(url: &str, classifier: Option<&dyn Classifier<FeatureVector>>) -> AnalysisResult {
    let analyzer = UrlAnalyzer::new(&Config::default(), None);
    match classifier {
        Some(classifier) => analyzer.analyze_with(classifier, url),
        None => analyzer.analyze(url),
    }
}
