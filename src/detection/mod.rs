pub mod email_rules;
pub mod url_rules;

/// A fired check: the weight it contributes and the reason shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub weight: u32,
    pub reason: String,
}

impl Finding {
    pub fn new(weight: u32, reason: impl Into<String>) -> Self {
        Self {
            weight,
            reason: reason.into(),
        }
    }

    /// Reason followed by the matched terms, e.g. `Suspicious keywords: login, verify`.
    pub fn with_matches(weight: u32, reason: &str, matches: &[&str]) -> Self {
        Self::new(weight, format!("{}: {}", reason, matches.join(", ")))
    }
}
