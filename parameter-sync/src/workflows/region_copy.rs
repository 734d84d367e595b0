use std::sync::Arc;

use serde_derive::Serialize;
use tracing::{info, warn};

use super::WorkflowError;
use crate::{
    audit::{AuditLogBuilder, AuditLogger, AuditOperation, AuditResource},
    configs::WorkflowConfig,
    domain::ParameterName,
    enumerator::ParameterEnumerator,
    operations::{DeleteOutcome, ParameterOperations},
    regions::AvailableRegions,
    storage::factory::StoreProvider,
};

#[derive(Debug, Clone)]
pub struct RegionCopyRequest {
    pub source_region: String,
    pub destination_region: String,
    pub delete_source: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RegionCopyReport {
    pub copied: Vec<ParameterName>,
    pub deleted_at_source: Vec<ParameterName>,
    /// Listed parameters whose value could not be resolved.
    pub skipped: Vec<ParameterName>,
    pub failed: Vec<(ParameterName, String)>,
}

fn validate_regions(
    request: &RegionCopyRequest,
    regions: &AvailableRegions,
) -> Result<(), WorkflowError> {
    for region in [&request.source_region, &request.destination_region] {
        if !regions.contains(region) {
            return Err(WorkflowError::InvalidRegion {
                region: region.clone(),
                valid: regions.as_slice().to_vec(),
            });
        }
    }
    if request.source_region == request.destination_region {
        return Err(WorkflowError::InvalidInput(format!(
            "Source and destination region are both '{}'",
            request.source_region
        )));
    }
    Ok(())
}

/// Copies every parameter of the source region into the destination region.
///
/// With `delete_source`, a parameter is removed from the source only after
/// its put into the destination succeeded. A listing failure returns an
/// error before anything was written to either region.
pub async fn copy_region(
    provider: &dyn StoreProvider,
    config: &WorkflowConfig,
    audit_logger: Arc<dyn AuditLogger>,
    actor: &str,
    request: &RegionCopyRequest,
) -> Result<RegionCopyReport, WorkflowError> {
    validate_regions(request, &config.available_regions)?;

    let source = ParameterOperations::new(
        provider.store_for_region(&request.source_region).await?,
        config.retry.clone(),
        Arc::clone(&audit_logger),
        actor,
    );
    let destination = ParameterOperations::new(
        provider
            .store_for_region(&request.destination_region)
            .await?,
        config.retry.clone(),
        Arc::clone(&audit_logger),
        actor,
    );

    info!(
        source = request.source_region.as_str(),
        destination = request.destination_region.as_str(),
        delete_source = request.delete_source,
        "Copying parameters between regions"
    );

    // Whole source listing is read before the first write, deletes never
    // run under a live cursor.
    let descriptors = ParameterEnumerator::new(source.store().clone(), true)
        .with_retry(config.retry.clone())
        .collect_all()
        .await?;

    let mut report = RegionCopyReport::default();
    for descriptor in descriptors {
        let Some(parameter) = descriptor.to_parameter() else {
            warn!(
                name = descriptor.name.as_str(),
                region = request.source_region.as_str(),
                "Skipping parameter without a resolvable value"
            );
            report.skipped.push(descriptor.name);
            continue;
        };

        // a failed put is audited by the put itself
        if let Err(err) = destination.put(&parameter).await {
            report
                .failed
                .push((parameter.name().clone(), err.to_string()));
            continue;
        }
        audit_logger
            .log(
                AuditLogBuilder::new(AuditOperation::Copy)
                    .actor(actor)
                    .resource(AuditResource::copy(
                        parameter.name(),
                        &request.source_region,
                        &request.destination_region,
                    ))
                    .build_success(),
            )
            .await;
        report.copied.push(parameter.name().clone());

        if request.delete_source {
            match source.delete(parameter.name()).await {
                Ok(DeleteOutcome::Deleted) => {
                    report.deleted_at_source.push(parameter.name().clone())
                }
                Ok(DeleteOutcome::NotFound) => {}
                Err(err) => report
                    .failed
                    .push((parameter.name().clone(), err.to_string())),
            }
        }
    }

    info!(
        copied = report.copied.len(),
        deleted_at_source = report.deleted_at_source.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "Region copy finished"
    );

    Ok(report)
}
