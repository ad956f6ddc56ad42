use phish_guard::features::FEATURE_COUNT;
use phish_guard::{analyze_email_text, analyze_url, AnalysisResult, LinearUrlModel};

fn print_result(title: &str, input: &str, result: &AnalysisResult) -> anyhow::Result<()> {
    println!("\n--- {title} ---");
    println!("Input: {input}");
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Every feature votes with equal weight; enough to exercise the model path
    let model = LinearUrlModel::new(vec![1.0; FEATURE_COUNT], 0.0)?;

    let url = "http://secure-login.paypal-update.com@192.168.1.1/login";
    let result = analyze_url(url, Some(&model));
    print_result("Testing URL Analysis", url, &result)?;
    assert!(!result.reasons.is_empty());
    println!("✅ URL analysis passed structure check");

    let text = "URGENT: Dear User, please verify your password immediately to claim your bitcoin prize and gift card!";
    let result = analyze_email_text(text, None);
    print_result("Testing Email Analysis", text, &result)?;
    assert!(matches!(
        result.label,
        phish_guard::Label::Spam | phish_guard::Label::Phishing
    ));
    println!("✅ Email analysis passed structure check");

    let result = analyze_url("http://bit.ly/abcd", None);
    print_result("Testing URL Analysis Without Model", "http://bit.ly/abcd", &result)?;
    assert!(result.is_error());
    println!("✅ Missing URL model reported as error");

    Ok(())
}
