use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub email: EmailRulesConfig,
    pub url: UrlRulesConfig,
    pub models: ModelsConfig,
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhraseCategory {
    Urgency,
    SensitiveData,
    Reward,
    /// Only the opening of the message is searched.
    GenericGreeting,
}

impl PhraseCategory {
    /// Evaluation order, which is also the order reasons are reported in.
    pub const ALL: [PhraseCategory; 4] = [
        PhraseCategory::Urgency,
        PhraseCategory::SensitiveData,
        PhraseCategory::Reward,
        PhraseCategory::GenericGreeting,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhraseRule {
    pub category: PhraseCategory,
    pub weight: u32,
    pub reason: String,
    pub phrases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShoutingRule {
    pub weight: u32,
    pub reason: String,
    pub min_length: usize, // Text must be longer than this before the ratio is checked
    pub uppercase_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailModelRule {
    pub weight: u32,
    pub reason: String,
    pub spam_outcome: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailRulesConfig {
    pub phrase_rules: Vec<PhraseRule>,
    pub shouting: ShoutingRule,
    pub model: EmailModelRule,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightedCheck {
    pub weight: u32,
    pub reason: String,
}

impl WeightedCheck {
    fn new(weight: u32, reason: &str) -> Self {
        Self {
            weight,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlModelRule {
    pub weight: u32,
    pub reason: String,
    /// Prediction value the URL model uses for "benign". Every other value is
    /// treated as a phishing verdict.
    pub benign_outcome: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlRulesConfig {
    pub ip_literal: WeightedCheck,
    pub shortener: WeightedCheck,
    pub https_token: WeightedCheck,
    pub long_url: WeightedCheck,
    pub at_sign: WeightedCheck,
    pub keywords: WeightedCheck,
    pub max_length: usize,
    pub shortener_domains: Vec<String>,
    pub suspicious_keywords: Vec<String>,
    pub model: UrlModelRule,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub email_model: Option<String>, // Path to a TermWeightModel artifact
    pub url_model: Option<String>,   // Path to a LinearUrlModel artifact
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub enabled: bool,
    pub path: String,
    pub preview_chars: usize,
    pub recent_limit: usize,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ShoutingRule {
    fn default() -> Self {
        Self {
            weight: 10,
            reason: "Abnormal use of capital letters (shouting tone)".to_string(),
            min_length: 20,
            uppercase_ratio: 0.4,
        }
    }
}

impl Default for EmailModelRule {
    fn default() -> Self {
        Self {
            weight: 30,
            reason: "Statistical spam/phishing model returned a positive result".to_string(),
            spam_outcome: 1,
        }
    }
}

impl Default for EmailRulesConfig {
    fn default() -> Self {
        Self {
            phrase_rules: vec![
                PhraseRule {
                    category: PhraseCategory::Urgency,
                    weight: 30,
                    reason: "Urgent or threatening language".to_string(),
                    phrases: strings(&[
                        "urgent",
                        "immediately",
                        "action required",
                        "account suspended",
                        "unauthorized access",
                        "terminate",
                        "lock your account",
                        "final notice",
                        "act now",
                        "right now",
                        "now!",
                        "within 24 hours",
                        "acil",
                        "hemen",
                        "hesabınız askıya",
                        "uyarı",
                        "son kez",
                    ]),
                },
                PhraseRule {
                    category: PhraseCategory::SensitiveData,
                    weight: 40,
                    reason: "Request for sensitive information (password/identity)".to_string(),
                    phrases: strings(&[
                        "password",
                        "credit card",
                        "security code",
                        "cvv",
                        "social security",
                        "verify your identity",
                        "otp",
                        "banking details",
                        "şifre",
                        "parola",
                        "kredi kartı",
                        "kimlik doğrulama",
                    ]),
                },
                PhraseRule {
                    category: PhraseCategory::Reward,
                    weight: 25,
                    reason: "Unrealistic promise of money or rewards".to_string(),
                    phrases: strings(&[
                        "won",
                        "winner",
                        "lottery",
                        "prize",
                        "claim your reward",
                        "bitcoin",
                        "crypto",
                        "inheritance",
                        "million dollars",
                        "gift card",
                        "kazandınız",
                        "ödül",
                        "piyango",
                        "miras",
                        "hediye çeki",
                    ]),
                },
                PhraseRule {
                    category: PhraseCategory::GenericGreeting,
                    weight: 15,
                    reason: "Generic greeting (e.g. \"Dear Customer\")".to_string(),
                    phrases: strings(&["dear customer", "dear user", "sayın müşteri"]),
                },
            ],
            shouting: ShoutingRule::default(),
            model: EmailModelRule::default(),
        }
    }
}

impl Default for UrlModelRule {
    fn default() -> Self {
        Self {
            weight: 40,
            reason: "Machine learning model detected phishing indicators".to_string(),
            benign_outcome: 1,
        }
    }
}

impl Default for UrlRulesConfig {
    fn default() -> Self {
        Self {
            ip_literal: WeightedCheck::new(40, "IP address used instead of a domain name"),
            shortener: WeightedCheck::new(20, "URL shortening service used"),
            https_token: WeightedCheck::new(
                30,
                "Host contains 'https' to look trustworthy",
            ),
            long_url: WeightedCheck::new(10, "Unusually long URL"),
            at_sign: WeightedCheck::new(
                50,
                "'@' character in URL (credential hiding trick)",
            ),
            keywords: WeightedCheck::new(25, "Suspicious keywords"),
            max_length: 75,
            shortener_domains: strings(&[
                "bit.ly",
                "goo.gl",
                "tinyurl.com",
                "is.gd",
                "cli.gs",
                "t.co",
                "ow.ly",
                "tiny.cc",
                "rb.gy",
                "cutt.ly",
            ]),
            suspicious_keywords: strings(&[
                "login", "signin", "verify", "secure", "account", "update", "bank", "wallet",
                "confirm", "bonus", "free", "gift", "service", "support", "auth", "pay", "win",
            ]),
            model: UrlModelRule::default(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "scans.json".to_string(),
            preview_chars: 50,
            recent_limit: 10,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Phrase rule for a category, if the configuration defines one.
    pub fn phrase_rule(&self, category: PhraseCategory) -> Option<&PhraseRule> {
        self.email
            .phrase_rules
            .iter()
            .find(|rule| rule.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_cover_every_category() {
        let config = Config::default();
        for category in PhraseCategory::ALL {
            let rule = config.phrase_rule(category).unwrap();
            assert!(!rule.phrases.is_empty());
        }
        assert_eq!(config.phrase_rule(PhraseCategory::Urgency).unwrap().weight, 30);
        assert_eq!(
            config.phrase_rule(PhraseCategory::SensitiveData).unwrap().weight,
            40
        );
        assert_eq!(config.phrase_rule(PhraseCategory::Reward).unwrap().weight, 25);
        assert_eq!(
            config.phrase_rule(PhraseCategory::GenericGreeting).unwrap().weight,
            15
        );
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
url:
  max_length: 100
  model:
    benign_outcome: 0
history:
  enabled: false
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.url.max_length, 100);
        assert_eq!(config.url.model.benign_outcome, 0);
        assert_eq!(config.url.model.weight, 40);
        assert_eq!(config.url.at_sign.weight, 50);
        assert!(!config.history.enabled);
        assert_eq!(config.history.preview_chars, 50);
        assert_eq!(config.email.phrase_rules.len(), 4);
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("phish-guard.yaml");
        let path = path.to_str().unwrap();

        let mut config = Config::default();
        config.url.suspicious_keywords.push("invoice".to_string());
        config.to_file(path).unwrap();

        let loaded = Config::from_file(path).unwrap();
        assert!(loaded
            .url
            .suspicious_keywords
            .contains(&"invoice".to_string()));
        assert_eq!(
            loaded.phrase_rule(PhraseCategory::GenericGreeting).unwrap().phrases,
            config.phrase_rule(PhraseCategory::GenericGreeting).unwrap().phrases
        );
    }
}
