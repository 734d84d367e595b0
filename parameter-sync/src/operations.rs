use std::sync::Arc;

use tracing::warn;

use crate::{
    audit::{AuditLogBuilder, AuditLogger, AuditOperation, AuditResource},
    domain::{Parameter, ParameterName},
    retry::{RetryConfig, retry},
    storage::repository::{ParameterStore, StoreError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Put, get and delete against one region, with retry and audit logging.
#[derive(Clone)]
pub struct ParameterOperations {
    store: Arc<dyn ParameterStore>,
    retry: RetryConfig,
    audit_logger: Arc<dyn AuditLogger>,
    actor: String,
}

impl ParameterOperations {
    pub fn new(
        store: Arc<dyn ParameterStore>,
        retry: RetryConfig,
        audit_logger: Arc<dyn AuditLogger>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            store,
            retry,
            audit_logger,
            actor: actor.into(),
        }
    }

    pub fn store(&self) -> &Arc<dyn ParameterStore> {
        &self.store
    }

    pub fn region(&self) -> &str {
        self.store.region()
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    fn audit(&self, operation: AuditOperation, name: &ParameterName) -> AuditLogBuilder {
        AuditLogBuilder::new(operation)
            .actor(self.actor.as_str())
            .resource(AuditResource::parameter(name, self.store.region()))
    }

    /// Creates or overwrites `parameter`.
    pub async fn put(&self, parameter: &Parameter) -> Result<(), StoreError> {
        let result = retry(&self.retry, || self.store.put_parameter(parameter, true)).await;

        let audit = self.audit(AuditOperation::Put, parameter.name());
        match &result {
            Ok(()) => self.audit_logger.log(audit.build_success()).await,
            Err(err) => self.audit_logger.log(audit.build_failure(err.to_string())).await,
        }

        result
    }

    /// Decrypted value of `name`, or `None` when it does not exist.
    pub async fn get(&self, name: &ParameterName) -> Result<Option<String>, StoreError> {
        let result = retry(&self.retry, || self.store.get_parameter(name, true)).await;

        match result {
            Ok(value) => Ok(Some(value)),
            Err(StoreError::NotFound(_)) => {
                warn!(
                    name = name.as_str(),
                    region = self.store.region(),
                    "Parameter not found"
                );
                Ok(None)
            }
            Err(err) => {
                self.audit_logger
                    .log(
                        self.audit(AuditOperation::Get, name)
                            .build_failure(err.to_string()),
                    )
                    .await;
                Err(err)
            }
        }
    }

    pub async fn delete(&self, name: &ParameterName) -> Result<DeleteOutcome, StoreError> {
        let result = retry(&self.retry, || self.store.delete_parameter(name)).await;

        let audit = self.audit(AuditOperation::Delete, name);
        match result {
            Ok(()) => {
                self.audit_logger.log(audit.build_success()).await;
                Ok(DeleteOutcome::Deleted)
            }
            Err(StoreError::NotFound(_)) => {
                self.audit_logger.log(audit.build_not_found()).await;
                Ok(DeleteOutcome::NotFound)
            }
            Err(err) => {
                self.audit_logger
                    .log(audit.build_failure(err.to_string()))
                    .await;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::audit::{AuditLog, AuditStatus};
    use crate::domain::{ParameterBuilder, ParameterType};
    use crate::storage::adapters::local_storage::LocalStorage;
    use std::sync::Mutex;

    #[derive(Default)]
    pub(crate) struct RecordingAuditLogger {
        pub logs: Mutex<Vec<AuditLog>>,
    }

    #[async_trait::async_trait]
    impl AuditLogger for RecordingAuditLogger {
        async fn log(&self, audit_log: AuditLog) {
            self.logs.lock().unwrap().push(audit_log);
        }
    }

    fn create_test_parameter(name: &str, value: &str) -> Parameter {
        ParameterBuilder::new()
            .name(name)
            .value(value)
            .parameter_type(ParameterType::Plain)
            .build()
            .unwrap()
    }

    fn operations(storage: LocalStorage) -> (ParameterOperations, Arc<RecordingAuditLogger>) {
        let logger = Arc::new(RecordingAuditLogger::default());
        let ops = ParameterOperations::new(
            Arc::new(storage),
            RetryConfig::none(),
            logger.clone(),
            "tester",
        );
        (ops, logger)
    }

    #[tokio::test]
    async fn test_put_then_get_returns_latest_value() {
        let (ops, logger) = operations(LocalStorage::new("eu-west-1"));
        let name = ParameterName::new("/app/url").unwrap();

        ops.put(&create_test_parameter("/app/url", "one"))
            .await
            .unwrap();
        assert_eq!(ops.get(&name).await.unwrap().as_deref(), Some("one"));

        ops.put(&create_test_parameter("/app/url", "two"))
            .await
            .unwrap();
        assert_eq!(ops.get(&name).await.unwrap().as_deref(), Some("two"));

        let logs = logger.logs.lock().unwrap();
        assert_eq!(logs.len(), 2);
        assert!(logs.iter().all(|l| l.status == AuditStatus::Success));
        assert_eq!(logs[0].actor, "tester");
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let (ops, logger) = operations(LocalStorage::new("eu-west-1"));
        let name = ParameterName::new("/never/written").unwrap();

        assert_eq!(ops.get(&name).await.unwrap(), None);
        assert!(logger.logs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_then_get_is_none() {
        let storage =
            LocalStorage::with_parameters("eu-west-1", vec![create_test_parameter("/a", "1")]);
        let (ops, _) = operations(storage);
        let name = ParameterName::new("/a").unwrap();

        assert_eq!(ops.delete(&name).await.unwrap(), DeleteOutcome::Deleted);
        assert_eq!(ops.get(&name).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found_outcome() {
        let (ops, logger) = operations(LocalStorage::new("eu-west-1"));
        let name = ParameterName::new("/gone").unwrap();

        assert_eq!(ops.delete(&name).await.unwrap(), DeleteOutcome::NotFound);

        let logs = logger.logs.lock().unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, AuditStatus::NotFound);
        assert_eq!(logs[0].resource.region.as_deref(), Some("eu-west-1"));
    }
}
