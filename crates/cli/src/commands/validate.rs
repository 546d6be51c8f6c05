//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{ReportingConfig, TopicTemplate, TOPIC_PLACEHOLDER};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    host: String,
    cluster: String,
    mbaas_type: String,
    real_time_logging_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_message_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    backup_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    recovery_file: Option<String>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(summarize(&config)),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

fn summarize(config: &ReportingConfig) -> ConfigSummary {
    let template = |t: Option<&TopicTemplate>| t.map(ToString::to_string);
    ConfigSummary {
        host: config.host.clone().unwrap_or_default(),
        cluster: config.cluster.clone().unwrap_or_default(),
        mbaas_type: config.mbaas_type.to_string(),
        real_time_logging_enabled: config.real_time_logging_enabled,
        log_message_url: template(config.log_message_url()),
        backup_file: template(config.backup_template()),
        recovery_file: template(config.recovery_template()),
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &ReportingConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.backup_template().is_none() {
        warnings.push("No backupFiles.fileName - file destination reports 'no config'".to_string());
    }

    if config.is_openshift() && config.real_time_logging_enabled {
        if config.log_message_url().is_none() {
            warnings.push("No msgServer.logMessageURL - HTTP delivery is skipped".to_string());
        } else if config.recovery_template().is_none() {
            warnings.push(
                "No recoveryFiles.fileName - failed HTTP deliveries are not persisted".to_string(),
            );
        }
    }

    let files = [
        ("backupFiles.fileName", config.backup_template()),
        ("recoveryFiles.fileName", config.recovery_template()),
    ];
    for (field, template) in files {
        if let Some(template) = template {
            if !template.as_str().contains(TOPIC_PLACEHOLDER) {
                warnings.push(format!(
                    "{field} has no {TOPIC_PLACEHOLDER} placeholder - all topics share one file"
                ));
            }
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Host: {}", summary.host);
            println!("  Cluster: {}", summary.cluster);
            println!("  Deployment: {}", summary.mbaas_type);
            println!("  Real-time logging: {}", summary.real_time_logging_enabled);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
