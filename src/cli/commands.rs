use crate::cli::Commands;
use crate::k8s::{KubePodSource, PodLister};
use crate::GateConfig;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;

pub async fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Check { config } => handle_check(&config),
        Commands::Pods { config, interval } => handle_pods(&config, interval).await,
    }
}

fn handle_check(path: &Path) -> Result<()> {
    let config = GateConfig::from_path(path)?;
    println!("{}", check_summary(&config)?);
    Ok(())
}

/// Validate `config` the way the plugin factory does and describe the result.
///
/// Never contacts the cluster.
fn check_summary(config: &GateConfig) -> crate::Result<String> {
    if !config.enabled {
        return Ok("Plugin disabled; requests pass through unchanged".to_string());
    }

    config.validate()?;

    let namespace = if config.namespace.is_empty() {
        "<all>"
    } else {
        config.namespace.as_str()
    };

    Ok(format!(
        "header:          {}\n\
         serviceName:     {}\n\
         dataSourceURL:   {}\n\
         namespace:       {}\n\
         onHeaderPresent: {:?}",
        config.header,
        config.service_name,
        config.data_source_url,
        namespace,
        config.on_header_present
    ))
}

async fn handle_pods(path: &Path, interval: Option<u64>) -> Result<()> {
    let config = GateConfig::from_path(path)?;
    config.validate()?;

    info!("Listing pods for {}", config.label_selector());

    let source = KubePodSource::in_cluster()
        .await
        .context("Failed to create Kubernetes client")?;
    let lister = PodLister::from_config(Arc::new(source), &config);

    match interval {
        Some(secs) => {
            lister
                .run_periodic(Duration::from_secs(secs), async {
                    let _ = signal::ctrl_c().await;
                    info!("Shutdown signal received");
                })
                .await
        }
        None => {
            lister.log_pods().await;
        }
    }

    Ok(())
}
