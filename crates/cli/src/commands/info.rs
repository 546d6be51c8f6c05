//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::ReportingConfig;
use dispatcher::DeliveryPolicy;
use serde::Serialize;
use tracing::info;

use super::load_config;
use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    host: String,
    cluster: String,
    mbaas_type: String,
    real_time_logging_enabled: bool,
    routes: Vec<RouteInfo>,
}

#[derive(Serialize)]
struct RouteInfo {
    destination: &'static str,
    handler: &'static str,
    route: String,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    let config = load_config(&args.config)?;
    let info = build_config_info(&config);

    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&info);
    }

    Ok(())
}

fn build_config_info(config: &ReportingConfig) -> ConfigInfo {
    let routes = DeliveryPolicy::from_config(config)
        .describe()
        .into_iter()
        .map(|(destination, route)| RouteInfo {
            destination: destination.as_str(),
            handler: destination.handler(),
            route,
        })
        .collect();

    ConfigInfo {
        host: config.host.clone().unwrap_or_default(),
        cluster: config.cluster.clone().unwrap_or_default(),
        mbaas_type: config.mbaas_type.to_string(),
        real_time_logging_enabled: config.real_time_logging_enabled,
        routes,
    }
}

fn print_config_info(info: &ConfigInfo) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               Reporter Configuration                         ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("📍 Identity");
    println!("   ├─ Host: {}", info.host);
    println!("   ├─ Cluster: {}", info.cluster);
    println!("   ├─ Deployment: {}", info.mbaas_type);
    println!("   └─ Real-time logging: {}", info.real_time_logging_enabled);

    println!("\n📤 Destinations ({})", info.routes.len());
    for (i, route) in info.routes.iter().enumerate() {
        let prefix = if i == info.routes.len() - 1 { "└─" } else { "├─" };
        println!(
            "   {} {} ({}): {}",
            prefix, route.destination, route.handler, route.route
        );
    }

    println!();
}
