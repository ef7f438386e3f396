use std::sync::Arc;

use anyhow::Context;

use mail_triage::config::TriageConfig;
use mail_triage::llm::{LlmConfig, create_provider};
use mail_triage::pipeline::{EmailProcessor, LoggingActionSink};
use mail_triage::report::{normalize_emails, write_normalized_emails, write_report};
use mail_triage::sample::sample_emails;
use mail_triage::text::EnglishNormalizer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real env vars still apply.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = TriageConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export OPENAI_API_KEY=sk-...");
        std::process::exit(1);
    });

    eprintln!("📬 mail-triage v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.model);
    eprintln!("   Endpoint: {}", config.api_base);
    eprintln!("   Timeout: {}s", config.request_timeout.as_secs());
    eprintln!("   Report: {}", config.report_path.display());
    eprintln!("   Export: {}\n", config.emails_export_path.display());

    let emails = sample_emails();

    // ── Normalized export ────────────────────────────────────────────
    let normalized = normalize_emails(&emails, &EnglishNormalizer::new())
        .context("normalizing sample emails")?;
    write_normalized_emails(&normalized, &config.emails_export_path)
        .context("writing normalized email export")?;

    // ── Triage ───────────────────────────────────────────────────────
    let llm = create_provider(&LlmConfig::from(&config))?;
    let processor = EmailProcessor::from_provider(llm, config.temperature, Arc::new(LoggingActionSink));

    let report = processor.process_batch(&emails).await;
    write_report(&report, &config.report_path).context("writing batch report")?;

    eprintln!("\n{}", report.summary());
    for result in &report.results {
        let label = result.category.map(|c| c.label()).unwrap_or("-");
        match &result.error {
            None => println!("{:<4} {:<16} {:>6.2}s", result.email.id, label, result.processing_time),
            Some(e) => println!(
                "{:<4} {:<16} {:>6.2}s  error: {}",
                result.email.id, label, result.processing_time, e
            ),
        }
    }

    Ok(())
}
