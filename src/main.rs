use clap::{Arg, ArgMatches, Command};
use log::LevelFilter;
use phish_guard::analysis::{AnalysisResult, Label};
use phish_guard::history::{ScanHistory, ScanKind};
use phish_guard::machine_learning::{TextClassifier, UrlClassifier};
use phish_guard::{Config, EmailAnalyzer, LinearUrlModel, TermWeightModel, UrlAnalyzer};
use serde::Serialize;
use std::process;
use std::sync::Arc;

/// Shape of every analysis printed to stdout.
#[derive(Debug, Serialize)]
struct AnalysisResponse<'a> {
    input: &'a str,
    #[serde(rename = "type")]
    kind: ScanKind,
    score: u32,
    label: Label,
    reasons: &'a [String],
    notes: &'a str,
}

impl<'a> AnalysisResponse<'a> {
    fn new(input: &'a str, kind: ScanKind, result: &'a AnalysisResult) -> Self {
        Self {
            input,
            kind,
            score: result.score,
            label: result.label,
            reasons: &result.reasons,
            notes: &result.notes,
        }
    }
}

fn main() {
    let matches = Command::new("phish-guard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Offline phishing and spam scoring for message text and URLs")
        .long_about("PhishGuard - heuristic phishing/spam analysis:\n\
                    • Lexical rules over message text (urgency, credential requests, lures)\n\
                    • Structural URL checks (IP hosts, shorteners, '@' tricks, keywords)\n\
                    • Optional pre-trained models for text and URL features\n\
                    • Local scan history with daily summaries")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("/etc/phish-guard.yaml"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Test configuration and model files, then exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("email")
                .long("email")
                .value_name("TEXT")
                .help("Analyze message text")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("email-file")
                .long("email-file")
                .value_name("FILE")
                .help("Analyze message text read from a file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("url")
                .long("url")
                .value_name("URL")
                .help("Analyze a URL")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("email-model")
                .long("email-model")
                .value_name("FILE")
                .help("Text model artifact (overrides models.email_model)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("url-model")
                .long("url-model")
                .value_name("FILE")
                .help("URL model artifact (overrides models.url_model)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("no-history")
                .long("no-history")
                .help("Do not append this analysis to the scan history")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("stats")
                .long("stats")
                .help("Show today's scan counts and the most recent scans")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging of fired checks")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("/etc/phish-guard.yaml");

    let mut config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            process::exit(1);
        }
    };

    if let Some(path) = matches.get_one::<String>("email-model") {
        config.models.email_model = Some(path.clone());
    }
    if let Some(path) = matches.get_one::<String>("url-model") {
        config.models.url_model = Some(path.clone());
    }

    if matches.get_flag("test-config") {
        test_config(&config);
        return;
    }

    let history = ScanHistory::new(&config.history);

    if matches.get_flag("stats") {
        show_stats(&history);
        return;
    }

    let record_history = config.history.enabled && !matches.get_flag("no-history");
    let mut analyzed = false;

    if let Some(text) = email_input(&matches) {
        let analyzer = EmailAnalyzer::new(&config, load_text_model(&config));
        let result = analyzer.analyze(&text);
        report(&history, record_history, ScanKind::Email, &text, &result);
        analyzed = true;
    }

    if let Some(url) = matches.get_one::<String>("url") {
        let analyzer = UrlAnalyzer::new(&config, load_url_model(&config));
        let result = analyzer.analyze(url);
        report(&history, record_history, ScanKind::Url, url, &result);
        analyzed = true;
    }

    if !analyzed {
        eprintln!("Nothing to analyze: pass --email, --email-file or --url (see --help)");
        process::exit(2);
    }
}

fn load_config(path: &str) -> anyhow::Result<Config> {
    if std::path::Path::new(path).exists() {
        Config::from_file(path)
    } else {
        log::warn!("Configuration file '{path}' not found, using default configuration");
        Ok(Config::default())
    }
}

fn generate_default_config(path: &str) {
    let config = Config::default();
    match config.to_file(path) {
        Ok(()) => {
            println!("Default configuration written to: {path}");
            println!("Please edit the configuration file to suit your needs.");
        }
        Err(e) => {
            eprintln!("Error writing configuration file: {e}");
            process::exit(1);
        }
    }
}

fn email_input(matches: &ArgMatches) -> Option<String> {
    if let Some(text) = matches.get_one::<String>("email") {
        return Some(text.clone());
    }

    let path = matches.get_one::<String>("email-file")?;
    match std::fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            eprintln!("❌ Error reading message file {path}: {e}");
            process::exit(1);
        }
    }
}

/// A model that fails to load leaves its capability absent.
fn load_text_model(config: &Config) -> Option<TextClassifier> {
    let path = config.models.email_model.as_ref()?;
    match TermWeightModel::load_from_file(path) {
        Ok(model) => Some(Arc::new(model)),
        Err(e) => {
            log::error!("Failed to load text model: {e:#}");
            None
        }
    }
}

fn load_url_model(config: &Config) -> Option<UrlClassifier> {
    let Some(path) = config.models.url_model.as_ref() else {
        log::warn!("No URL model configured; URL analysis will report an error");
        return None;
    };
    match LinearUrlModel::load_from_file(path) {
        Ok(model) => Some(Arc::new(model)),
        Err(e) => {
            log::error!("Failed to load URL model: {e:#}");
            None
        }
    }
}

fn report(
    history: &ScanHistory,
    record_history: bool,
    kind: ScanKind,
    input: &str,
    result: &AnalysisResult,
) {
    if record_history {
        if let Err(e) = history.record(kind, input, result) {
            log::error!("Failed to record scan: {e:#}");
        }
    }

    let response = AnalysisResponse::new(input, kind, result);
    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("❌ Failed to serialize result: {e}");
            process::exit(1);
        }
    }
}

fn test_config(config: &Config) {
    println!("🔍 Testing configuration...");
    println!();

    let mut failed = false;
    for rule in &config.email.phrase_rules {
        println!(
            "  Email rule {:?}: weight {}, {} phrases",
            rule.category,
            rule.weight,
            rule.phrases.len()
        );
    }
    println!(
        "  URL rules: {} shortener domains, {} keywords",
        config.url.shortener_domains.len(),
        config.url.suspicious_keywords.len()
    );

    if let Some(path) = &config.models.email_model {
        match TermWeightModel::load_from_file(path) {
            Ok(model) => println!("  Text model: {} terms", model.terms.len()),
            Err(e) => {
                println!("❌ Text model {path}: {e:#}");
                failed = true;
            }
        }
    }
    if let Some(path) = &config.models.url_model {
        match LinearUrlModel::load_from_file(path) {
            Ok(_) => println!("  URL model: OK"),
            Err(e) => {
                println!("❌ URL model {path}: {e:#}");
                failed = true;
            }
        }
    } else {
        println!("  URL model: not configured (URL analysis will report errors)");
    }

    if failed {
        process::exit(1);
    }
    println!("✅ Configuration is valid");
}

fn show_stats(history: &ScanHistory) {
    let summary = history.summary(chrono::Local::now().date_naive());

    println!("📊 PhishGuard Scan Statistics ({})", history.path().display());
    println!("═══════════════════════════════════════");
    println!("  Email scans today: {}", summary.email_count);
    println!("  URL scans today:   {}", summary.url_count);
    println!();

    if summary.recent_scans.is_empty() {
        println!("📭 No scans recorded yet");
        return;
    }

    println!("Recent scans:");
    for scan in &summary.recent_scans {
        println!(
            "  {} {:<5} {:>3} {:<10} {}",
            scan.timestamp.format("%Y-%m-%d %H:%M:%S"),
            match scan.kind {
                ScanKind::Email => "email",
                ScanKind::Url => "url",
            },
            scan.score,
            scan.label,
            scan.content
        );
    }
}
