use std::time::Duration;

use super::{
    Configs,
    loaders::environment::{env_or, optional_env},
};
use crate::{domain::ParameterType, regions::AvailableRegions, retry::RetryConfig};

const DEFAULT_DELETE_PACING_MS: &str = "1000";
const DEFAULT_MAX_ATTEMPTS: &str = "3";
const DEFAULT_RETRY_BASE_DELAY_MS: &str = "200";
const DEFAULT_BULK_NAMESPACE: &str = "/secrets";
const DEFAULT_BULK_TYPE: &str = "secret";

#[derive(Debug, Clone)]
pub struct BulkLoadConfig {
    /// Prefix applied to every key of a bulk-load document.
    pub namespace: String,
    pub parameter_type: ParameterType,
}

impl Default for BulkLoadConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_BULK_NAMESPACE.to_string(),
            parameter_type: ParameterType::Secret,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub delete_pacing: Duration,
    pub retry: RetryConfig,
    pub bulk_load: BulkLoadConfig,
    pub available_regions: AvailableRegions,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            delete_pacing: Duration::from_secs(1),
            retry: RetryConfig::default(),
            bulk_load: BulkLoadConfig::default(),
            available_regions: AvailableRegions::default(),
        }
    }
}

#[async_trait::async_trait]
impl Configs for BulkLoadConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(BulkLoadConfig {
            namespace: env_or("PARAM_SYNC_BULK_NAMESPACE", DEFAULT_BULK_NAMESPACE),
            parameter_type: env_or("PARAM_SYNC_BULK_TYPE", DEFAULT_BULK_TYPE).parse()?,
        })
    }
}

#[async_trait::async_trait]
impl Configs for WorkflowConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let delete_pacing = Duration::from_millis(
            env_or("PARAM_SYNC_DELETE_PACING_MS", DEFAULT_DELETE_PACING_MS).parse::<u64>()?,
        );

        let retry = RetryConfig {
            max_attempts: env_or("PARAM_SYNC_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS).parse::<u32>()?,
            base_delay: Duration::from_millis(
                env_or("PARAM_SYNC_RETRY_BASE_DELAY_MS", DEFAULT_RETRY_BASE_DELAY_MS)
                    .parse::<u64>()?,
            ),
            ..Default::default()
        };

        let available_regions = optional_env("PARAM_SYNC_AVAILABLE_REGIONS")
            .map(|list| AvailableRegions::parse(&list))
            .filter(|regions| !regions.as_slice().is_empty())
            .unwrap_or_default();

        Ok(WorkflowConfig {
            delete_pacing,
            retry,
            bulk_load: BulkLoadConfig::load().await?,
            available_regions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "PARAM_SYNC_DELETE_PACING_MS",
        "PARAM_SYNC_MAX_ATTEMPTS",
        "PARAM_SYNC_RETRY_BASE_DELAY_MS",
        "PARAM_SYNC_BULK_NAMESPACE",
        "PARAM_SYNC_BULK_TYPE",
        "PARAM_SYNC_AVAILABLE_REGIONS",
    ];

    fn clear_env() {
        for var in VARS {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_load_defaults() {
        clear_env();

        let config = WorkflowConfig::load().await.unwrap();
        assert_eq!(config.delete_pacing, Duration::from_secs(1));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.bulk_load.namespace, "/secrets");
        assert_eq!(config.bulk_load.parameter_type, ParameterType::Secret);
        assert_eq!(config.available_regions, AvailableRegions::default());
    }

    #[tokio::test]
    #[serial]
    async fn test_load_overrides() {
        clear_env();
        unsafe {
            std::env::set_var("PARAM_SYNC_DELETE_PACING_MS", "250");
            std::env::set_var("PARAM_SYNC_MAX_ATTEMPTS", "5");
            std::env::set_var("PARAM_SYNC_BULK_NAMESPACE", "/team/app");
            std::env::set_var("PARAM_SYNC_BULK_TYPE", "String");
            std::env::set_var("PARAM_SYNC_AVAILABLE_REGIONS", "eu-west-1,us-east-1");
        }

        let config = WorkflowConfig::load().await.unwrap();
        assert_eq!(config.delete_pacing, Duration::from_millis(250));
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.bulk_load.namespace, "/team/app");
        assert_eq!(config.bulk_load.parameter_type, ParameterType::Plain);
        assert!(config.available_regions.contains("eu-west-1"));
        assert!(!config.available_regions.contains("ap-south-1"));

        clear_env();
    }

    #[tokio::test]
    #[serial]
    async fn test_invalid_number_is_an_error() {
        clear_env();
        unsafe {
            std::env::set_var("PARAM_SYNC_DELETE_PACING_MS", "soon");
        }

        assert!(WorkflowConfig::load().await.is_err());

        clear_env();
    }

    #[tokio::test]
    #[serial]
    async fn test_unknown_bulk_type_is_an_error() {
        clear_env();
        unsafe {
            std::env::set_var("PARAM_SYNC_BULK_TYPE", "Binary");
        }

        assert!(BulkLoadConfig::load().await.is_err());

        clear_env();
    }
}
