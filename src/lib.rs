pub mod analysis;
pub mod analyzer;
pub mod config;
pub mod detection;
pub mod domain_utils;
pub mod features;
pub mod history;
pub mod machine_learning;

pub use analysis::{AnalysisResult, Label};
pub use analyzer::{analyze_email_text, analyze_url, EmailAnalyzer, UrlAnalyzer};
pub use config::Config;
pub use features::FeatureVector;
pub use history::{ScanHistory, ScanKind};
pub use machine_learning::{Classifier, LinearUrlModel, TermWeightModel};
