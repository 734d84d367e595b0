use std::{fmt, sync::Arc};

use crate::{
    audit::{AuditLogger, BaseAuditLogger},
    configs::ParameterSyncConfig,
    operations::ParameterOperations,
    storage::{factory::StoreProvider, repository::StoreError},
};

pub mod app;
pub mod audit;
pub mod cli;
pub mod configs;
pub mod domain;
pub mod enumerator;
pub mod operations;
pub mod regions;
pub mod retry;
pub mod storage;
pub mod workflows;

/// Everything a command needs, constructed once and passed down.
pub struct SyncContext<P>
where
    P: StoreProvider + ?Sized,
{
    pub config: Arc<ParameterSyncConfig>,
    pub provider: Arc<P>,
    pub audit_logger: Arc<BaseAuditLogger>,
}

impl<P> SyncContext<P>
where
    P: StoreProvider + ?Sized,
{
    pub fn new(config: Arc<ParameterSyncConfig>, provider: Arc<P>) -> Self {
        let audit_logger = Arc::new(BaseAuditLogger::new(config.audit_config.clone()));
        Self {
            config,
            provider,
            audit_logger,
        }
    }

    pub fn actor(&self) -> &str {
        &self.config.audit_config.actor
    }

    pub fn audit_logger(&self) -> Arc<dyn AuditLogger> {
        self.audit_logger.clone()
    }

    /// Operations bound to `region`, or to the provider's default region.
    pub async fn operations(
        &self,
        region: Option<&str>,
    ) -> Result<ParameterOperations, StoreError> {
        let store = match region {
            Some(region) => self.provider.store_for_region(region).await?,
            None => self.provider.default_store().await?,
        };
        Ok(ParameterOperations::new(
            store,
            self.config.workflow_config.retry.clone(),
            self.audit_logger(),
            self.actor(),
        ))
    }
}

impl<P: StoreProvider + ?Sized> fmt::Debug for SyncContext<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncContext")
            .field("config", &self.config)
            .finish()
    }
}

impl<P> Clone for SyncContext<P>
where
    P: StoreProvider + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            provider: Arc::clone(&self.provider),
            audit_logger: Arc::clone(&self.audit_logger),
        }
    }
}
