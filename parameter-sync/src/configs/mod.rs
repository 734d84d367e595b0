pub mod audit;
pub mod loaders;
pub mod storage;
pub mod workflow;

pub use audit::{AuditConfig, AuditLogFormat};
pub use storage::{SsmStorageConfig, StorageConfig};
pub use workflow::{BulkLoadConfig, WorkflowConfig};

#[async_trait::async_trait]
pub trait Configs: Sized {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>>;
}

#[derive(Debug, Clone)]
pub struct ParameterSyncConfig {
    pub storage_config: StorageConfig,
    pub workflow_config: WorkflowConfig,
    pub audit_config: AuditConfig,
}

#[async_trait::async_trait]
impl Configs for ParameterSyncConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self {
            storage_config: StorageConfig::load().await?,
            workflow_config: WorkflowConfig::load().await?,
            audit_config: AuditConfig::load().await?,
        })
    }
}
