use crate::{
    configs::StorageConfig,
    domain::ParameterName,
    storage::{adapters::ssm_storage::SsmStorage, repository::ParameterStore},
};

pub async fn load(param_name: &str, config: &StorageConfig) -> Result<String, String> {
    let name = ParameterName::new(param_name).map_err(|e| e.to_string())?;
    let storage = SsmStorage::new(
        &config.ssm_storage_config,
        config.default_region.as_deref(),
    )
    .await
    .map_err(|e| e.to_string())?;

    storage
        .get_parameter(&name, true)
        .await
        .map_err(|e| format!("Failed to get parameter '{}': {}", param_name, e))
}
