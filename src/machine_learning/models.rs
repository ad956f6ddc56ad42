use super::{Classifier, Outcome};
use crate::features::{FeatureVector, FEATURE_COUNT};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

fn read_artifact<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read model file: {}", path.display()))?;
    // YAML is a superset of JSON, so both artifact formats parse here
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse model file: {}", path.display()))
}

/// Linear decision function over the URL feature vector.
///
/// Predicts `benign_outcome` when `bias + Σ weight·feature >= 0`, otherwise
/// `phishing_outcome`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearUrlModel {
    pub weights: Vec<f64>,
    #[serde(default)]
    pub bias: f64,
    #[serde(default = "default_benign")]
    pub benign_outcome: Outcome,
    #[serde(default = "default_phishing")]
    pub phishing_outcome: Outcome,
}

fn default_benign() -> Outcome {
    1
}

fn default_phishing() -> Outcome {
    -1
}

impl LinearUrlModel {
    pub fn new(weights: Vec<f64>, bias: f64) -> Result<Self> {
        let model = Self {
            weights,
            bias,
            benign_outcome: default_benign(),
            phishing_outcome: default_phishing(),
        };
        model.validate()?;
        Ok(model)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let model: Self = read_artifact(path)?;
        model
            .validate()
            .with_context(|| format!("Invalid URL model: {}", path.display()))?;
        log::info!("Loaded URL model from {}", path.display());
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        if self.weights.len() != FEATURE_COUNT {
            bail!(
                "expected {} weights, found {}",
                FEATURE_COUNT,
                self.weights.len()
            );
        }
        if self.weights.iter().any(|w| !w.is_finite()) || !self.bias.is_finite() {
            bail!("weights and bias must be finite numbers");
        }
        Ok(())
    }

    pub fn decision(&self, features: &FeatureVector) -> f64 {
        self.weights
            .iter()
            .zip(features.iter())
            .fold(self.bias, |acc, (w, x)| acc + w * f64::from(x))
    }
}

impl Classifier<FeatureVector> for LinearUrlModel {
    fn predict(&self, features: &FeatureVector) -> Result<Outcome> {
        if self.decision(features) >= 0.0 {
            Ok(self.benign_outcome)
        } else {
            Ok(self.phishing_outcome)
        }
    }
}

/// Bag-of-terms scorer over message text: the weights of every term present
/// in the lower-cased text are summed with the bias, and a total above zero
/// predicts spam (`1`), otherwise ham (`0`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermWeightModel {
    pub terms: BTreeMap<String, f64>,
    #[serde(default)]
    pub bias: f64,
}

impl TermWeightModel {
    pub const SPAM: Outcome = 1;
    pub const HAM: Outcome = 0;

    pub fn new(terms: BTreeMap<String, f64>, bias: f64) -> Self {
        let terms = terms
            .into_iter()
            .map(|(term, weight)| (term.to_lowercase(), weight))
            .collect();
        Self { terms, bias }
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let model: Self = read_artifact(path)?;
        if model.terms.keys().any(|t| t.is_empty()) {
            bail!("Invalid text model {}: empty term", path.display());
        }
        log::info!(
            "Loaded text model from {} ({} terms)",
            path.display(),
            model.terms.len()
        );
        Ok(Self::new(model.terms, model.bias))
    }

    pub fn decision(&self, text: &str) -> f64 {
        let text_lower = text.to_lowercase();
        self.terms
            .iter()
            .filter(|(term, _)| text_lower.contains(term.as_str()))
            .fold(self.bias, |acc, (_, weight)| acc + weight)
    }
}

impl Classifier<str> for TermWeightModel {
    fn predict(&self, text: &str) -> Result<Outcome> {
        if self.decision(text) > 0.0 {
            Ok(Self::SPAM)
        } else {
            Ok(Self::HAM)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_linear_model_predicts() {
        let model = LinearUrlModel::new(vec![1.0; FEATURE_COUNT], 0.0).unwrap();

        let clean = FeatureVector([1, 1, 1, 1, 1, 1, 1, 1, 1]);
        let risky = FeatureVector([-1, 0, -1, -1, -1, -1, -1, 1, -1]);
        assert_eq!(model.predict(&clean).unwrap(), 1);
        assert_eq!(model.predict(&risky).unwrap(), -1);
    }

    #[test]
    fn test_linear_model_rejects_wrong_shape() {
        assert!(LinearUrlModel::new(vec![1.0; 3], 0.0).is_err());
        assert!(LinearUrlModel::new(vec![f64::NAN; FEATURE_COUNT], 0.0).is_err());
    }

    #[test]
    fn test_linear_model_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"weights": [2, 1, 1, 2, 1, 1, 1, 0, 1], "bias": -1.5, "phishing_outcome": 0}}"#
        )
        .unwrap();

        let model = LinearUrlModel::load_from_file(file.path()).unwrap();
        assert_eq!(model.benign_outcome, 1);
        assert_eq!(model.phishing_outcome, 0);
        assert_eq!(model.decision(&FeatureVector([1; 9])), 8.5);
    }

    #[test]
    fn test_linear_model_file_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "weights: [1, 2]").unwrap();
        let err = LinearUrlModel::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid URL model"));

        assert!(LinearUrlModel::load_from_file("/nonexistent/model.yaml").is_err());
    }

    #[test]
    fn test_term_model_predicts() {
        let mut terms = BTreeMap::new();
        terms.insert("Bitcoin".to_string(), 1.5);
        terms.insert("meeting".to_string(), -2.0);
        let model = TermWeightModel::new(terms, -0.5);

        assert_eq!(model.predict("Send BITCOIN today").unwrap(), TermWeightModel::SPAM);
        assert_eq!(
            model.predict("bitcoin talk at the meeting").unwrap(),
            TermWeightModel::HAM
        );
        assert_eq!(model.predict("").unwrap(), TermWeightModel::HAM);
    }

    #[test]
    fn test_term_model_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "terms:\n  Prize: 2.0\n  invoice: 0.5\nbias: -1.0").unwrap();

        let model = TermWeightModel::load_from_file(file.path()).unwrap();
        assert!(model.terms.contains_key("prize"));
        assert_eq!(model.predict("claim your prize").unwrap(), 1);
        assert_eq!(model.predict("invoice attached").unwrap(), 0);
    }
}
