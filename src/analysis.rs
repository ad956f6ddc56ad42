use crate::detection::Finding;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_SCORE: u32 = 100;
pub const MAX_REASONS: usize = 6;
/// Scores above this are at least medium severity.
pub const MEDIUM_THRESHOLD: u32 = 30;
/// Scores above this are high severity.
pub const HIGH_THRESHOLD: u32 = 70;

pub const NOTES_OFFLINE: &str = "offline-analysis";
pub const NOTES_OFFLINE_ERROR: &str = "offline-error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Ham,
    Spam,
    Phishing,
    Safe,
    Suspicious,
    Malicious,
    Error,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Ham => "ham",
            Label::Spam => "spam",
            Label::Phishing => "phishing",
            Label::Safe => "safe",
            Label::Suspicious => "suspicious",
            Label::Malicious => "malicious",
            Label::Error => "error",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Which label vocabulary a score is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelScale {
    Email,
    Url,
}

impl LabelScale {
    pub fn label_for(&self, score: u32) -> Label {
        let (low, medium, high) = match self {
            LabelScale::Email => (Label::Ham, Label::Spam, Label::Phishing),
            LabelScale::Url => (Label::Safe, Label::Suspicious, Label::Malicious),
        };
        match score {
            s if s > HIGH_THRESHOLD => high,
            s if s > MEDIUM_THRESHOLD => medium,
            _ => low,
        }
    }

    fn benign_reason(&self) -> &'static str {
        match self {
            LabelScale::Email => "Looks safe: no threat indicators found",
            LabelScale::Url => "No obvious threat found",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: u32,
    pub label: Label,
    pub reasons: Vec<String>,
    pub notes: String,
}

impl AnalysisResult {
    /// Result for an analysis that could not be carried out.
    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            score: 0,
            label: Label::Error,
            reasons: vec![reason.into()],
            notes: NOTES_OFFLINE_ERROR.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.label == Label::Error
    }
}

/// Collects findings in evaluation order and turns them into a result.
#[derive(Debug, Default)]
pub struct ScoreCard {
    total: u32,
    reasons: Vec<String>,
}

impl ScoreCard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, finding: Finding) {
        self.total = self.total.saturating_add(finding.weight);
        self.reasons.push(finding.reason);
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        for finding in findings {
            self.add(finding);
        }
    }

    /// Raw, unclamped total.
    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn finish(self, scale: LabelScale) -> AnalysisResult {
        let score = self.total.min(MAX_SCORE);
        let mut reasons = self.reasons;

        if score == 0 && reasons.is_empty() {
            reasons.push(scale.benign_reason().to_string());
        }
        reasons.truncate(MAX_REASONS);

        AnalysisResult {
            score,
            label: scale.label_for(score),
            reasons,
            notes: NOTES_OFFLINE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_boundaries() {
        for (scale, low, medium, high) in [
            (LabelScale::Email, Label::Ham, Label::Spam, Label::Phishing),
            (LabelScale::Url, Label::Safe, Label::Suspicious, Label::Malicious),
        ] {
            assert_eq!(scale.label_for(0), low);
            assert_eq!(scale.label_for(30), low);
            assert_eq!(scale.label_for(31), medium);
            assert_eq!(scale.label_for(70), medium);
            assert_eq!(scale.label_for(71), high);
            assert_eq!(scale.label_for(100), high);
        }
    }

    #[test]
    fn test_empty_card_gets_default_reason() {
        let result = ScoreCard::new().finish(LabelScale::Email);
        assert_eq!(result.score, 0);
        assert_eq!(result.label, Label::Ham);
        assert_eq!(result.reasons.len(), 1);
        assert_eq!(result.notes, NOTES_OFFLINE);
    }

    #[test]
    fn test_score_is_clamped() {
        let mut card = ScoreCard::new();
        card.extend([Finding::new(50, "a"), Finding::new(40, "b"), Finding::new(40, "c")]);
        assert_eq!(card.total(), 130);

        let result = card.finish(LabelScale::Url);
        assert_eq!(result.score, 100);
        assert_eq!(result.label, Label::Malicious);
        assert_eq!(result.reasons, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_reasons_truncated_in_order() {
        let mut card = ScoreCard::new();
        card.extend((1..=8).map(|i| Finding::new(1, format!("reason {i}"))));

        let result = card.finish(LabelScale::Url);
        assert_eq!(result.score, 8);
        assert_eq!(result.reasons.len(), MAX_REASONS);
        assert_eq!(result.reasons[0], "reason 1");
        assert_eq!(result.reasons[5], "reason 6");
    }

    #[test]
    fn test_error_result() {
        let result = AnalysisResult::error("Analysis error: boom");
        assert!(result.is_error());
        assert_eq!(result.score, 0);
        assert_eq!(result.reasons, vec!["Analysis error: boom"]);
        assert_eq!(result.notes, NOTES_OFFLINE_ERROR);
    }

    #[test]
    fn test_label_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Label::Malicious).unwrap(), "\"malicious\"");
        assert_eq!(Label::Ham.to_string(), "ham");
    }
}
