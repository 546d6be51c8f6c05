//! `send` command implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use contracts::{Message, ReportingConfig};
use dispatcher::{DispatchReport, HttpClient, HttpClientConfig, LogCollaborator, ReportingBuilder};
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

use super::parse_config;
use crate::cli::SendArgs;
use crate::error::CliError;

/// Execute the `send` command
pub async fn run_send(args: &SendArgs) -> Result<()> {
    info!(config = %args.config.display(), topic = %args.topic, "Loading configuration");

    let config = load_send_config(args)?;

    let raw = match &args.message {
        Some(raw) => raw.clone(),
        None => read_stdin().await?,
    };
    let mut message = parse_message(&raw)?;

    let transport = HttpClient::new(HttpClientConfig {
        timeout: Duration::from_secs(args.http_timeout),
    })?;
    let reporting = ReportingBuilder::new(config, LogCollaborator::new("batch"), transport)
        .build()
        .context("Failed to create reporting")?;

    let report = reporting.log_message(&args.topic, &mut message).await;
    reporting.flush_reports();
    if let Err(e) = reporting.registry().shutdown().await {
        warn!(error = %e, "Some file writes failed");
    }

    let json = serde_json::to_string_pretty(&report.to_json())
        .context("Failed to serialize dispatch report")?;
    println!("{}", json);

    check_report(&report, args.strict)
}

/// Parse the config file, apply CLI overrides, then validate
///
/// Overrides may supply a host or cluster the file leaves out.
fn load_send_config(args: &SendArgs) -> Result<ReportingConfig> {
    let mut config = parse_config(&args.config)?;
    apply_overrides(&mut config, args);
    config_loader::ConfigLoader::validate(&config)
        .with_context(|| format!("Invalid config {}", args.config.display()))?;
    Ok(config)
}

fn apply_overrides(config: &mut ReportingConfig, args: &SendArgs) {
    if let Some(ref host) = args.host {
        info!(host = %host, "Overriding host from CLI");
        config.host = Some(host.clone());
    }
    if let Some(ref cluster) = args.cluster {
        info!(cluster = %cluster, "Overriding cluster from CLI");
        config.cluster = Some(cluster.clone());
    }
    if let Some(real_time) = args.real_time {
        info!(real_time, "Overriding realTimeLoggingEnabled from CLI");
        config.real_time_logging_enabled = real_time;
    }
}

async fn read_stdin() -> Result<String> {
    let mut raw = String::new();
    tokio::io::stdin()
        .read_to_string(&mut raw)
        .await
        .context("Failed to read message from stdin")?;
    Ok(raw)
}

fn parse_message(raw: &str) -> Result<Message, CliError> {
    match serde_json::from_str(raw.trim()) {
        Ok(serde_json::Value::Object(message)) => Ok(message),
        Ok(other) => Err(CliError::invalid_message(format!(
            "expected a JSON object, got {}",
            type_name(&other)
        ))),
        Err(e) => Err(CliError::invalid_message(e.to_string())),
    }
}

fn type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

fn check_report(report: &DispatchReport, strict: bool) -> Result<()> {
    let Some(ref error) = report.error else {
        return Ok(());
    };
    let destinations = report
        .failed
        .iter()
        .map(|d| d.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    if strict {
        return Err(CliError::delivery(destinations, error.to_string()).into());
    }
    warn!(destinations = %destinations, error = %error, "Delivery failed");
    Ok(())
}
