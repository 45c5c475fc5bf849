//! Poll a single profile once.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use hostpulse_core::models::TargetDescriptor;
use hostpulse_core::monitoring::{MonitorRegistry, MonitorTarget, TargetStatus};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::format::{format_json_pretty, format_target_detail};
use crate::util::{build_runtime, find_profile, load_config};

/// Extra wait on top of the execution timeout, covering key resolution
const RESOLVE_GRACE: Duration = Duration::from_secs(5);

/// Probe command handler
pub fn cmd_probe(
    config_path: Option<&Path>,
    name: &str,
    format: OutputFormat,
    color: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let catalog = config.catalog();
    let descriptor = TargetDescriptor::from(find_profile(&catalog, name)?);
    let target_name = descriptor.name.clone();
    let settings = config.monitoring;
    let deadline = settings.exec_timeout() + RESOLVE_GRACE;

    let runtime = build_runtime()?;
    let target = runtime.block_on(async move {
        let registry = MonitorRegistry::with_ssh(settings, Arc::new(catalog));
        registry.add_target(descriptor).await;
        let target = first_result(&registry, &target_name, deadline).await;
        registry.remove_all().await;
        target
    });

    let Some(target) = target else {
        return Err(CliError::ProbeFailed(format!(
            "No result from '{name}' within {}s",
            deadline.as_secs()
        )));
    };

    match format {
        OutputFormat::Table => println!("{}", format_target_detail(&target, color)),
        OutputFormat::Json => println!("{}", format_json_pretty(&target)?),
    }

    if target.status == TargetStatus::Error {
        return Err(CliError::ProbeFailed(
            target
                .error_message
                .unwrap_or_else(|| "Unknown error".to_string()),
        ));
    }
    Ok(())
}

/// Waits for the first completed poll of `name`
async fn first_result(
    registry: &MonitorRegistry,
    name: &str,
    deadline: Duration,
) -> Option<MonitorTarget> {
    let mut rx = registry.subscribe();
    let finished = |status: TargetStatus| matches!(status, TargetStatus::Connected | TargetStatus::Error);
    match tokio::time::timeout(
        deadline,
        rx.wait_for(|state| state.get(name).is_some_and(|t| finished(t.status))),
    )
    .await
    {
        Ok(Ok(state)) => state.get(name).cloned(),
        _ => None,
    }
}
