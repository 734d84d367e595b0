use std::sync::Arc;

use futures::TryStreamExt;
use parameter_sync::{
    configs::{Configs, SsmStorageConfig},
    domain::*,
    enumerator::ParameterEnumerator,
    storage::{adapters::ssm_storage::SsmStorage, repository::*},
};

const TEST_PREFIX: &str = "/parameter-sync-it";

async fn get_test_storage() -> Option<SsmStorage> {
    // Talks to a real account (or a local emulator via AWS_ENDPOINT), skip unless asked for
    let Ok(region) = std::env::var("PARAM_SYNC_SSM_TEST_REGION") else {
        println!("PARAM_SYNC_SSM_TEST_REGION not set, skipping integration test");
        return None;
    };
    let config = SsmStorageConfig::load().await.ok()?;
    match SsmStorage::new(&config, Some(&region)).await {
        Ok(storage) => Some(storage),
        Err(e) => {
            println!("SSM not available ({}), skipping integration test", e);
            None
        }
    }
}

async fn cleanup_test_data(storage: &SsmStorage) {
    let names: Vec<ParameterName> = ParameterEnumerator::new(Arc::new(storage.clone()), false)
        .into_stream()
        .map_ok(|descriptor| descriptor.name)
        .try_collect()
        .await
        .unwrap_or_default();

    for name in names.iter().filter(|n| n.as_str().starts_with(TEST_PREFIX)) {
        let _ = storage.delete_parameter(name).await;
    }
}

fn create_test_parameter(key: &str, value: &str, parameter_type: ParameterType) -> Parameter {
    ParameterBuilder::new()
        .name(format!("{}/{}", TEST_PREFIX, key))
        .value(value)
        .parameter_type(parameter_type)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_ssm_full_crud_workflow() {
    let Some(storage) = get_test_storage().await else {
        return;
    };
    cleanup_test_data(&storage).await;

    let parameter = create_test_parameter("token", "first", ParameterType::Secret);
    storage.put_parameter(&parameter, true).await.unwrap();
    assert_eq!(
        storage
            .get_parameter(parameter.name(), true)
            .await
            .unwrap(),
        "first"
    );

    // overwrite=false on an existing name is rejected
    let replacement = create_test_parameter("token", "second", ParameterType::Secret);
    let err = storage
        .put_parameter(&replacement, false)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists(_)));

    storage.put_parameter(&replacement, true).await.unwrap();
    assert_eq!(
        storage
            .get_parameter(replacement.name(), true)
            .await
            .unwrap(),
        "second"
    );

    storage.delete_parameter(parameter.name()).await.unwrap();
    assert!(
        storage
            .get_parameter(parameter.name(), true)
            .await
            .unwrap_err()
            .is_not_found()
    );
    assert!(
        storage
            .delete_parameter(parameter.name())
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn test_ssm_enumeration_includes_values() {
    let Some(storage) = get_test_storage().await else {
        return;
    };
    cleanup_test_data(&storage).await;

    for key in ["a", "b", "c"] {
        let parameter = create_test_parameter(key, key, ParameterType::Plain);
        storage.put_parameter(&parameter, true).await.unwrap();
    }

    let descriptors: Vec<ParameterDescriptor> =
        ParameterEnumerator::new(Arc::new(storage.clone()), true)
            .with_page_size(2)
            .into_stream()
            .try_collect()
            .await
            .unwrap();

    let ours: Vec<_> = descriptors
        .iter()
        .filter(|d| d.name.as_str().starts_with(TEST_PREFIX))
        .collect();
    assert_eq!(ours.len(), 3);
    for descriptor in ours {
        assert_eq!(
            descriptor.value.as_deref(),
            Some(descriptor.name.last_segment())
        );
    }

    cleanup_test_data(&storage).await;
}
