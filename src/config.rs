//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default completion endpoint base URL.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default model used for both classification and reply drafting.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini-2024-07-18";

/// Low temperature keeps classification labels stable across runs.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_REPORT_PATH: &str = "report/report.csv";

pub const DEFAULT_EMAILS_EXPORT_PATH: &str = "data/emails.csv";

/// Runtime configuration for a triage run.
#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// Bearer credential for the completion endpoint.
    pub api_key: SecretString,
    /// Base URL of the OpenAI-compatible API.
    pub api_base: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Per-request timeout. Exceeding it counts as an upstream failure.
    pub request_timeout: Duration,
    /// Where the batch report is written.
    pub report_path: PathBuf,
    /// Where the normalized email export is written.
    pub emails_export_path: PathBuf,
}

impl TriageConfig {
    /// Load configuration from the process environment.
    ///
    /// `OPENAI_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()))?;

        let api_base = lookup("TRIAGE_API_BASE")
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let model = lookup("TRIAGE_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let temperature = match lookup("TRIAGE_TEMPERATURE") {
            Some(raw) => parse_temperature(&raw)?,
            None => DEFAULT_TEMPERATURE,
        };

        let timeout_secs = match lookup("TRIAGE_REQUEST_TIMEOUT_SECS") {
            Some(raw) => parse_timeout_secs(&raw)?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let report_path = lookup("TRIAGE_REPORT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH));

        let emails_export_path = lookup("TRIAGE_EMAILS_EXPORT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EMAILS_EXPORT_PATH));

        Ok(Self {
            api_key: SecretString::from(api_key),
            api_base,
            model,
            temperature,
            request_timeout: Duration::from_secs(timeout_secs),
            report_path,
            emails_export_path,
        })
    }
}

fn parse_temperature(raw: &str) -> Result<f32, ConfigError> {
    let value: f32 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: "TRIAGE_TEMPERATURE".to_string(),
        message: format!("'{raw}' is not a number"),
    })?;
    if !(0.0..=2.0).contains(&value) {
        return Err(ConfigError::InvalidValue {
            key: "TRIAGE_TEMPERATURE".to_string(),
            message: format!("{value} is outside 0.0..=2.0"),
        });
    }
    Ok(value)
}

fn parse_timeout_secs(raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidValue {
            key: "TRIAGE_REQUEST_TIMEOUT_SECS".to_string(),
            message: "timeout must be greater than zero".to_string(),
        }),
        Ok(secs) => Ok(secs),
        Err(_) => Err(ConfigError::InvalidValue {
            key: "TRIAGE_REQUEST_TIMEOUT_SECS".to_string(),
            message: format!("'{raw}' is not a whole number of seconds"),
        }),
    }
}
