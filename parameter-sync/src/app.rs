use std::{io::Write, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use futures::StreamExt;
use serde::Serialize;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    SyncContext,
    cli::{Args, Command},
    configs::{BulkLoadConfig, Configs, ParameterSyncConfig, loaders},
    domain::{ParameterBuilder, ParameterName, ParameterType},
    enumerator::ParameterEnumerator,
    operations::DeleteOutcome,
    storage::factory::{ParameterStoreFactory, StoreProvider},
    workflows::{self, RegionCopyRequest, WorkflowError},
};

/// Result of a command that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    /// The named parameter does not exist.
    NotFound,
    /// The command finished but some parameters were not processed.
    Partial,
}

impl CommandStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Partial => 3,
            Self::NotFound => 4,
        }
    }
}

const EXIT_FAILURE: i32 = 1;

fn setup_logging() {
    // stdout carries command output
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .try_init();
}

fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn status_for<T>(failed: &[T]) -> CommandStatus {
    if failed.is_empty() {
        CommandStatus::Success
    } else {
        CommandStatus::Partial
    }
}

/// Runs one command against `ctx`, writing its result to `out`.
pub async fn execute(
    ctx: &SyncContext<dyn StoreProvider>,
    args: Args,
    out: &mut dyn Write,
) -> Result<CommandStatus> {
    let region = args.region.as_deref();

    match args.command {
        Command::Put {
            name,
            value,
            parameter_type,
            description,
        } => {
            let parameter_type: ParameterType = parameter_type.parse()?;
            let parameter = ParameterBuilder::new()
                .name(name)
                .value(value)
                .parameter_type(parameter_type)
                .description(description)
                .build()?;

            let operations = ctx.operations(region).await?;
            operations.put(&parameter).await?;
            writeln!(
                out,
                "Stored {} in {}",
                parameter.name(),
                operations.region()
            )?;
            Ok(CommandStatus::Success)
        }
        Command::Get { name } => {
            let name = ParameterName::new(name)?;
            let operations = ctx.operations(region).await?;
            match operations.get(&name).await? {
                Some(value) => {
                    writeln!(out, "{}", value)?;
                    Ok(CommandStatus::Success)
                }
                None => Ok(CommandStatus::NotFound),
            }
        }
        Command::Delete { name } => {
            let name = ParameterName::new(name)?;
            let operations = ctx.operations(region).await?;
            match operations.delete(&name).await? {
                DeleteOutcome::Deleted => {
                    writeln!(out, "Deleted {} from {}", name, operations.region())?;
                    Ok(CommandStatus::Success)
                }
                DeleteOutcome::NotFound => Ok(CommandStatus::NotFound),
            }
        }
        Command::List { with_values } => {
            let operations = ctx.operations(region).await?;
            let mut descriptors = ParameterEnumerator::new(operations.store().clone(), with_values)
                .with_retry(operations.retry_config().clone())
                .into_stream();

            let mut count = 0usize;
            while let Some(descriptor) = descriptors.next().await {
                let descriptor = descriptor?;
                serde_json::to_writer(&mut *out, &descriptor)?;
                writeln!(out)?;
                count += 1;
            }
            info!(count, region = operations.region(), "Listed parameters");
            Ok(CommandStatus::Success)
        }
        Command::DeleteMatching { pattern, pacing_ms } => {
            let pacing = pacing_ms
                .map(Duration::from_millis)
                .unwrap_or(ctx.config.workflow_config.delete_pacing);
            let operations = ctx.operations(region).await?;
            let report = workflows::delete_matching(&operations, &pattern, pacing).await?;
            write_json(out, &report)?;
            Ok(status_for(&report.failed))
        }
        Command::CopyRegion {
            source,
            destination,
            delete_source,
        } => {
            let request = RegionCopyRequest {
                source_region: source,
                destination_region: destination,
                delete_source,
            };
            let report = workflows::copy_region(
                &*ctx.provider,
                &ctx.config.workflow_config,
                ctx.audit_logger(),
                ctx.actor(),
                &request,
            )
            .await?;
            write_json(out, &report)?;
            if report.skipped.is_empty() {
                Ok(status_for(&report.failed))
            } else {
                Ok(CommandStatus::Partial)
            }
        }
        Command::BulkLoad {
            source,
            namespace,
            parameter_type,
        } => {
            let defaults = &ctx.config.workflow_config.bulk_load;
            let config = BulkLoadConfig {
                namespace: namespace.unwrap_or_else(|| defaults.namespace.clone()),
                parameter_type: match parameter_type {
                    Some(parameter_type) => parameter_type.parse()?,
                    None => defaults.parameter_type,
                },
            };

            let document = loaders::load(&source, &ctx.config.storage_config)
                .await
                .map_err(WorkflowError::Load)?;
            let operations = ctx.operations(region).await?;
            let report = workflows::bulk_load(&operations, &document, &config).await?;
            write_json(out, &report)?;
            Ok(status_for(&report.failed))
        }
        Command::Regions => {
            for region in ctx.config.workflow_config.available_regions.as_slice() {
                writeln!(out, "{}", region)?;
            }
            Ok(CommandStatus::Success)
        }
    }
}

async fn run(args: Args) -> Result<CommandStatus> {
    let config = ParameterSyncConfig::load()
        .await
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to load configs")?;
    debug!("CONFIGS: {:?}", &config);

    let config = Arc::new(config);
    let provider: Arc<dyn StoreProvider> = Arc::new(ParameterStoreFactory::new(Arc::new(
        config.storage_config.clone(),
    )));
    let ctx = SyncContext::new(config, provider);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&ctx, args, &mut out).await
}

/// Entry point of the binary. Returns the process exit code.
pub async fn start() -> i32 {
    dotenv().ok();

    setup_logging();

    let args = Args::parse();

    match run(args).await {
        Ok(CommandStatus::Success) => 0,
        Ok(status) => {
            warn!(?status, "Command finished with unprocessed parameters or a missing parameter");
            status.exit_code()
        }
        Err(e) => {
            error!("{:#}", e);
            EXIT_FAILURE
        }
    }
}
