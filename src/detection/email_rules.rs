use super::Finding;
use crate::config::{EmailRulesConfig, PhraseCategory, PhraseRule, ShoutingRule};

/// Only this many leading characters are searched for generic greetings.
pub const GREETING_WINDOW: usize = 50;

/// At most this many matched phrases are quoted in a reason.
const MAX_QUOTED_PHRASES: usize = 3;

/// Lexical checks over free-form message text.
pub struct EmailRuleMatcher {
    phrase_rules: Vec<PhraseRule>,
    shouting: ShoutingRule,
}

impl Default for EmailRuleMatcher {
    fn default() -> Self {
        Self::new(&EmailRulesConfig::default())
    }
}

impl EmailRuleMatcher {
    pub fn new(config: &EmailRulesConfig) -> Self {
        // Category order, not file order, decides reason order
        let mut phrase_rules = Vec::new();
        for category in PhraseCategory::ALL {
            if let Some(rule) = config.phrase_rules.iter().find(|r| r.category == category) {
                let mut rule = rule.clone();
                rule.phrases = rule.phrases.iter().map(|p| p.to_lowercase()).collect();
                phrase_rules.push(rule);
            }
        }

        Self {
            phrase_rules,
            shouting: config.shouting.clone(),
        }
    }

    /// Run every check; each category contributes at most once.
    pub fn evaluate(&self, text: &str) -> Vec<Finding> {
        let text_lower = text.to_lowercase();
        let opening: String = text_lower.chars().take(GREETING_WINDOW).collect();

        let mut findings = Vec::new();
        for rule in &self.phrase_rules {
            let haystack = match rule.category {
                PhraseCategory::GenericGreeting => opening.as_str(),
                _ => text_lower.as_str(),
            };
            if let Some(finding) = Self::check_phrases(rule, haystack) {
                log::debug!("Email rule {:?} fired: {}", rule.category, finding.reason);
                findings.push(finding);
            }
        }

        if self.is_shouting(text) {
            log::debug!("Email rule Shouting fired");
            findings.push(Finding::new(self.shouting.weight, &self.shouting.reason));
        }

        findings
    }

    fn check_phrases(rule: &PhraseRule, haystack: &str) -> Option<Finding> {
        let matches: Vec<&str> = rule
            .phrases
            .iter()
            .filter(|phrase| !phrase.is_empty() && haystack.contains(phrase.as_str()))
            .map(|phrase| phrase.as_str())
            .collect();

        if matches.is_empty() {
            return None;
        }

        let quoted = &matches[..matches.len().min(MAX_QUOTED_PHRASES)];
        Some(Finding::with_matches(rule.weight, &rule.reason, quoted))
    }

    fn is_shouting(&self, text: &str) -> bool {
        let length = text.chars().count();
        if length <= self.shouting.min_length {
            return false;
        }

        let uppercase = text.chars().filter(|c| c.is_uppercase()).count();
        uppercase as f64 / length as f64 > self.shouting.uppercase_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reasons(findings: &[Finding]) -> Vec<String> {
        findings.iter().map(|f| f.reason.clone()).collect()
    }

    #[test]
    fn test_neutral_text_fires_nothing() {
        let matcher = EmailRuleMatcher::default();
        assert!(matcher.evaluate("").is_empty());
        assert!(matcher
            .evaluate("Hi team, the quarterly report is attached for review.")
            .is_empty());
    }

    #[test]
    fn test_category_contributes_once() {
        let matcher = EmailRuleMatcher::default();
        let findings =
            matcher.evaluate("urgent: act immediately, this is your final notice. terminate soon");

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].weight, 30);
        assert_eq!(
            findings[0].reason,
            "Urgent or threatening language: urgent, immediately, terminate"
        );
    }

    #[test]
    fn test_sample_phishing_message() {
        let matcher = EmailRuleMatcher::default();
        let findings = matcher.evaluate("I WON a FREE bitcoin prize, verify your password NOW!!!");

        let weights: Vec<u32> = findings.iter().map(|f| f.weight).collect();
        assert_eq!(weights, vec![30, 40, 25]);
        assert!(findings[0].reason.contains("now!"));
        assert!(findings[1].reason.contains("password"));
        assert!(findings[2].reason.contains("won"));
        assert!(findings[2].reason.contains("bitcoin"));
    }

    #[test]
    fn test_turkish_phrases() {
        let matcher = EmailRuleMatcher::default();
        let findings = matcher.evaluate("Sayın Müşteri, şifre bilgilerinizi hemen güncelleyin");

        let weights: Vec<u32> = findings.iter().map(|f| f.weight).collect();
        assert_eq!(weights, vec![30, 40, 15]);
    }

    #[test]
    fn test_greeting_only_in_opening() {
        let matcher = EmailRuleMatcher::default();

        let findings = matcher.evaluate("Dear customer, your parcel is on its way.");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].weight, 15);

        let late = format!("{} dear customer", "a".repeat(GREETING_WINDOW));
        assert!(matcher.evaluate(&late).is_empty());
    }

    #[test]
    fn test_shouting() {
        let matcher = EmailRuleMatcher::default();

        let findings = matcher.evaluate("THIS IS A VERY LOUD MESSAGE FOR EVERYONE");
        assert_eq!(reasons(&findings), vec![ShoutingRule::default().reason]);
        assert_eq!(findings[0].weight, 10);

        // Too short to be judged
        assert!(matcher.evaluate("HELLO THERE").is_empty());
        // Below the ratio
        assert!(matcher
            .evaluate("Meeting moved to Friday at the Main Office")
            .is_empty());
    }

    #[test]
    fn test_reasons_follow_category_order() {
        let mut config = EmailRulesConfig::default();
        config.phrase_rules.reverse();
        let matcher = EmailRuleMatcher::new(&config);

        let findings = matcher.evaluate("dear user, you won a prize. send your password urgently");
        let weights: Vec<u32> = findings.iter().map(|f| f.weight).collect();
        assert_eq!(weights, vec![30, 40, 25, 15]);
    }
}
