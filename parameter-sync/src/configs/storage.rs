use super::{Configs, loaders::environment::optional_env};

#[derive(Debug, Clone, Default)]
pub struct SsmStorageConfig {
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    /// Region used when a command does not name one. `None` defers to the
    /// AWS provider chain.
    pub default_region: Option<String>,
    pub ssm_storage_config: SsmStorageConfig,
}

#[async_trait::async_trait]
impl Configs for SsmStorageConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(SsmStorageConfig {
            profile: optional_env("AWS_PROFILE"),
            endpoint_url: optional_env("AWS_ENDPOINT").or_else(|| optional_env("SSM_ENDPOINT")),
        })
    }
}

#[async_trait::async_trait]
impl Configs for StorageConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(StorageConfig {
            default_region: optional_env("AWS_REGION")
                .or_else(|| optional_env("AWS_DEFAULT_REGION"))
                .filter(|r| !r.is_empty()),
            ssm_storage_config: SsmStorageConfig::load().await?,
        })
    }
}
