use std::time::Duration;

use futures::TryStreamExt;
use serde_derive::Serialize;
use tracing::{error, info};

use super::WorkflowError;
use crate::{
    domain::ParameterName,
    enumerator::ParameterEnumerator,
    operations::{DeleteOutcome, ParameterOperations},
};

#[derive(Debug, Clone, Default, Serialize)]
pub struct DeleteMatchingReport {
    pub deleted: Vec<ParameterName>,
    pub not_found: Vec<ParameterName>,
    pub failed: Vec<(ParameterName, String)>,
}

/// Deletes every parameter whose name contains `pattern`, waiting `pacing`
/// between deletions.
///
/// Matching names are collected before the first deletion so the listing
/// cursor is never walked over a region that is changing underneath it.
pub async fn delete_matching(
    operations: &ParameterOperations,
    pattern: &str,
    pacing: Duration,
) -> Result<DeleteMatchingReport, WorkflowError> {
    if pattern.is_empty() {
        return Err(WorkflowError::InvalidInput(
            "Refusing to delete with an empty name pattern".to_string(),
        ));
    }

    let matching: Vec<ParameterName> =
        ParameterEnumerator::new(operations.store().clone(), false)
            .with_retry(operations.retry_config().clone())
            .into_stream()
            .try_filter_map(|descriptor| {
                let name = descriptor.name;
                async move { Ok(name.contains(pattern).then_some(name)) }
            })
            .try_collect()
            .await?;

    info!(
        pattern,
        region = operations.region(),
        count = matching.len(),
        "Deleting parameters matching pattern"
    );

    let mut report = DeleteMatchingReport::default();
    for (index, name) in matching.into_iter().enumerate() {
        if index > 0 && !pacing.is_zero() {
            tokio::time::sleep(pacing).await;
        }

        match operations.delete(&name).await {
            Ok(DeleteOutcome::Deleted) => report.deleted.push(name),
            Ok(DeleteOutcome::NotFound) => report.not_found.push(name),
            Err(err) => {
                error!(name = name.as_str(), error = %err, "Failed to delete parameter");
                report.failed.push((name, err.to_string()));
            }
        }
    }

    Ok(report)
}
