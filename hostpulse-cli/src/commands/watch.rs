//! Continuous monitoring command.

use std::path::Path;
use std::sync::Arc;

use hostpulse_core::models::TargetDescriptor;
use hostpulse_core::monitoring::{MonitorRegistry, MonitorState, MonitorTarget};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::format::{format_json_line, format_targets_table};
use crate::util::{build_runtime, load_config, select_profiles};

/// Watch command handler
///
/// Prints the whole state after every change until Ctrl+C, then stops all
/// sessions so ephemeral key files are removed before exiting.
pub fn cmd_watch(
    config_path: Option<&Path>,
    names: &[String],
    interval: Option<u8>,
    format: OutputFormat,
    color: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let catalog = config.catalog();

    let descriptors: Vec<TargetDescriptor> = select_profiles(&catalog, names)?
        .into_iter()
        .map(TargetDescriptor::from)
        .collect();
    if descriptors.is_empty() {
        println!("No SSH profiles configured.");
        return Ok(());
    }

    let mut settings = config.monitoring;
    if let Some(secs) = interval {
        settings.poll_interval_secs = secs;
    }

    let runtime = build_runtime()?;
    runtime.block_on(async move {
        let registry = MonitorRegistry::with_ssh(settings, Arc::new(catalog));
        for descriptor in descriptors {
            registry.add_target(descriptor).await;
        }

        let result = watch_until_interrupted(&registry, format, color).await;
        registry.remove_all().await;
        result
    })
}

async fn watch_until_interrupted(
    registry: &MonitorRegistry,
    format: OutputFormat,
    color: bool,
) -> Result<(), CliError> {
    let mut rx = registry.subscribe();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        let state = rx.borrow_and_update().clone();
        print_state(&state, format, color)?;

        tokio::select! {
            signal = &mut ctrl_c => {
                if let Err(e) = signal {
                    tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
                }
                tracing::info!("Interrupted, stopping monitor");
                return Ok(());
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
            }
        }
    }
}

fn print_state(state: &MonitorState, format: OutputFormat, color: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Table => {
            let targets: Vec<&MonitorTarget> = state.iter().collect();
            println!(
                "{}\n{}\n",
                chrono::Local::now().format("%H:%M:%S"),
                format_targets_table(&targets, color)
            );
        }
        OutputFormat::Json => println!("{}", format_json_line(state)?),
    }
    Ok(())
}
