use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{Arc, RwLock};

use crate::domain::*;
use crate::storage::repository::*;

/// In-memory store for a single region. Listing walks names in sorted order
/// and uses the last returned name as the cursor.
#[derive(Clone)]
pub struct LocalStorage {
    region: String,
    parameters: Arc<RwLock<BTreeMap<ParameterName, Parameter>>>,
}

impl LocalStorage {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            parameters: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    pub fn with_parameters(region: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        let storage = Self::new(region);
        {
            let mut stored = storage.parameters.write().unwrap();
            for parameter in parameters {
                stored.insert(parameter.name().clone(), parameter);
            }
        }
        storage
    }

    pub fn len(&self) -> usize {
        self.parameters.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn names(&self) -> Vec<String> {
        self.parameters
            .read()
            .unwrap()
            .keys()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn snapshot(&self, name: &str) -> Option<Parameter> {
        let name = ParameterName::new(name).ok()?;
        self.parameters.read().unwrap().get(&name).cloned()
    }

    pub fn clear(&self) {
        self.parameters.write().unwrap().clear();
    }
}

#[async_trait::async_trait]
impl ParameterStore for LocalStorage {
    fn region(&self) -> &str {
        &self.region
    }

    async fn put_parameter(
        &self,
        parameter: &Parameter,
        overwrite: bool,
    ) -> Result<(), StoreError> {
        let mut parameters = self.parameters.write().unwrap();
        if !overwrite && parameters.contains_key(parameter.name()) {
            return Err(StoreError::AlreadyExists(parameter.name().to_string()));
        }
        parameters.insert(parameter.name().clone(), parameter.clone());
        Ok(())
    }

    async fn get_parameter(
        &self,
        name: &ParameterName,
        _with_decryption: bool,
    ) -> Result<String, StoreError> {
        let parameters = self.parameters.read().unwrap();
        parameters
            .get(name)
            .map(|p| p.value().to_string())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn delete_parameter(&self, name: &ParameterName) -> Result<(), StoreError> {
        let mut parameters = self.parameters.write().unwrap();
        if parameters.remove(name).is_none() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        Ok(())
    }

    async fn list_parameters(
        &self,
        page_size: i32,
        cursor: Option<PageCursor>,
    ) -> Result<ParameterPage, StoreError> {
        if page_size < 1 {
            return Err(StoreError::ValidationError(format!(
                "Page size must be positive, got {}",
                page_size
            )));
        }

        let lower = match cursor {
            Some(cursor) => Bound::Excluded(ParameterName::new(cursor.as_str()).map_err(
                |_| StoreError::ValidationError(format!("Invalid cursor: {}", cursor.as_str())),
            )?),
            None => Bound::Unbounded,
        };

        let parameters = self.parameters.read().unwrap();
        let mut remaining = parameters.range((lower, Bound::Unbounded));
        let page: Vec<ParameterMetadata> = remaining
            .by_ref()
            .take(page_size as usize)
            .map(|(_, p)| ParameterMetadata::from_parameter(p))
            .collect();

        let next_cursor = match (remaining.next(), page.last()) {
            (Some(_), Some(last)) => Some(PageCursor::new(last.name.as_str())),
            _ => None,
        };

        Ok(ParameterPage {
            parameters: page,
            next_cursor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_parameter(name: &str, value: &str) -> Parameter {
        ParameterBuilder::new()
            .name(name)
            .value(value)
            .parameter_type(ParameterType::Plain)
            .build()
            .unwrap()
    }

    fn name(n: &str) -> ParameterName {
        ParameterName::new(n).unwrap()
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let storage = LocalStorage::new("eu-west-1");
        storage
            .put_parameter(&create_test_parameter("/a", "1"), true)
            .await
            .unwrap();

        assert_eq!(storage.get_parameter(&name("/a"), true).await.unwrap(), "1");
        assert_eq!(storage.region(), "eu-west-1");
    }

    #[tokio::test]
    async fn test_put_without_overwrite_rejects_existing() {
        let storage =
            LocalStorage::with_parameters("eu-west-1", vec![create_test_parameter("/a", "1")]);

        let result = storage
            .put_parameter(&create_test_parameter("/a", "2"), false)
            .await;

        assert!(matches!(result, Err(StoreError::AlreadyExists(_))));
        assert_eq!(storage.get_parameter(&name("/a"), true).await.unwrap(), "1");
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let storage = LocalStorage::new("eu-west-1");
        let result = storage.delete_parameter(&name("/missing")).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_pages_until_cursor_is_absent() {
        let storage = LocalStorage::with_parameters(
            "eu-west-1",
            (0..5)
                .map(|i| create_test_parameter(&format!("/p/{i}"), "v"))
                .collect(),
        );

        let first = storage.list_parameters(2, None).await.unwrap();
        assert_eq!(first.parameters.len(), 2);
        let second = storage
            .list_parameters(2, first.next_cursor.clone())
            .await
            .unwrap();
        assert_eq!(second.parameters.len(), 2);
        let third = storage
            .list_parameters(2, second.next_cursor.clone())
            .await
            .unwrap();
        assert_eq!(third.parameters.len(), 1);
        assert!(third.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_exact_page_has_no_cursor() {
        let storage = LocalStorage::with_parameters(
            "eu-west-1",
            vec![create_test_parameter("/a", "1"), create_test_parameter("/b", "2")],
        );

        let page = storage.list_parameters(2, None).await.unwrap();
        assert_eq!(page.parameters.len(), 2);
        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_list_rejects_non_positive_page_size() {
        let storage = LocalStorage::new("eu-west-1");
        let result = storage.list_parameters(0, None).await;
        assert!(matches!(result, Err(StoreError::ValidationError(_))));
    }
}
