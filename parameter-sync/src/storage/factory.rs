use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::{
    configs::StorageConfig,
    storage::{
        adapters::{local_storage::LocalStorage, ssm_storage::SsmStorage},
        repository::{ParameterStore, StoreError},
    },
};

/// Binds one store per region.
#[async_trait::async_trait]
pub trait StoreProvider: Send + Sync {
    async fn store_for_region(&self, region: &str)
    -> Result<Arc<dyn ParameterStore>, StoreError>;

    /// Store for the region the provider resolves when none is named.
    async fn default_store(&self) -> Result<Arc<dyn ParameterStore>, StoreError>;
}

pub struct ParameterStoreFactory {
    config: Arc<StorageConfig>,
}

impl ParameterStoreFactory {
    pub fn new(config: Arc<StorageConfig>) -> Self {
        Self { config }
    }

    /// Store for `region`, falling back to the configured default region.
    pub async fn create(
        &self,
        region: Option<&str>,
    ) -> Result<Arc<dyn ParameterStore>, StoreError> {
        let region = region.or(self.config.default_region.as_deref());
        let storage = SsmStorage::new(&self.config.ssm_storage_config, region)
            .await
            .map_err(|e| StoreError::Configuration(e.to_string()))?;
        Ok(Arc::new(storage))
    }
}

#[async_trait::async_trait]
impl StoreProvider for ParameterStoreFactory {
    async fn store_for_region(
        &self,
        region: &str,
    ) -> Result<Arc<dyn ParameterStore>, StoreError> {
        self.create(Some(region)).await
    }

    async fn default_store(&self) -> Result<Arc<dyn ParameterStore>, StoreError> {
        self.create(None).await
    }
}

const LOCAL_DEFAULT_REGION: &str = "local";

/// In-memory regions; repeated lookups of a region share its contents.
#[derive(Clone)]
pub struct LocalStoreProvider {
    default_region: String,
    regions: Arc<RwLock<HashMap<String, LocalStorage>>>,
}

impl LocalStoreProvider {
    pub fn new() -> Self {
        Self::with_default_region(LOCAL_DEFAULT_REGION)
    }

    pub fn with_default_region(region: impl Into<String>) -> Self {
        Self {
            default_region: region.into(),
            regions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn region(&self, region: &str) -> LocalStorage {
        self.regions
            .write()
            .unwrap()
            .entry(region.to_string())
            .or_insert_with(|| LocalStorage::new(region))
            .clone()
    }

    pub fn insert(&self, storage: LocalStorage) {
        self.regions
            .write()
            .unwrap()
            .insert(storage.region().to_string(), storage);
    }

    pub fn bound_regions(&self) -> Vec<String> {
        let mut regions: Vec<String> = self.regions.read().unwrap().keys().cloned().collect();
        regions.sort();
        regions
    }
}

#[async_trait::async_trait]
impl StoreProvider for LocalStoreProvider {
    async fn store_for_region(
        &self,
        region: &str,
    ) -> Result<Arc<dyn ParameterStore>, StoreError> {
        Ok(Arc::new(self.region(region)))
    }

    async fn default_store(&self) -> Result<Arc<dyn ParameterStore>, StoreError> {
        Ok(Arc::new(self.region(&self.default_region)))
    }
}

impl Default for LocalStoreProvider {
    fn default() -> Self {
        Self::new()
    }
}
