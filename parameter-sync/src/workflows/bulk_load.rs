use serde_derive::Serialize;
use serde_json::Value;
use tracing::info;

use super::WorkflowError;
use crate::{
    configs::BulkLoadConfig,
    domain::{Parameter, ParameterBuilder, ParameterName, default_description},
    operations::ParameterOperations,
};

#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkLoadReport {
    pub stored: Vec<ParameterName>,
    pub failed: Vec<(ParameterName, String)>,
}

fn namespaced(namespace: &str, key: &str) -> String {
    let namespace = namespace.trim_end_matches('/');
    let key = key.trim_start_matches('/');
    if namespace.is_empty() {
        format!("/{}", key)
    } else {
        format!("{}/{}", namespace, key)
    }
}

/// Parses a JSON object of `key -> string value` into parameters under the
/// configured namespace. Nothing is written when any entry is invalid.
pub fn parse_document(
    document: &str,
    config: &BulkLoadConfig,
) -> Result<Vec<Parameter>, WorkflowError> {
    let value: Value = serde_json::from_str(document)
        .map_err(|e| WorkflowError::InvalidInput(format!("Document is not valid JSON: {}", e)))?;

    let Value::Object(entries) = value else {
        return Err(WorkflowError::InvalidInput(
            "Document must be a JSON object of key/value pairs".to_string(),
        ));
    };

    entries
        .into_iter()
        .map(|(key, value)| {
            let Value::String(value) = value else {
                return Err(WorkflowError::InvalidInput(format!(
                    "Value for key '{}' must be a string",
                    key
                )));
            };
            let name = ParameterName::new(namespaced(&config.namespace, &key))?;
            Ok(ParameterBuilder::new()
                .description(Some(default_description(&name)))
                .name(name.as_str())
                .value(value)
                .parameter_type(config.parameter_type)
                .build()?)
        })
        .collect()
}

pub async fn bulk_load(
    operations: &ParameterOperations,
    document: &str,
    config: &BulkLoadConfig,
) -> Result<BulkLoadReport, WorkflowError> {
    let parameters = parse_document(document, config)?;

    info!(
        count = parameters.len(),
        namespace = config.namespace.as_str(),
        parameter_type = %config.parameter_type,
        region = operations.region(),
        "Loading parameters from document"
    );

    let mut report = BulkLoadReport::default();
    for parameter in parameters {
        match operations.put(&parameter).await {
            Ok(()) => report.stored.push(parameter.name().clone()),
            Err(err) => report
                .failed
                .push((parameter.name().clone(), err.to_string())),
        }
    }

    Ok(report)
}
