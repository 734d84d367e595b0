use anyhow::{Result as AnyResult, anyhow};
use aws_config::BehaviorVersion;
use aws_sdk_ssm::{
    Client,
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    types::ParameterType as SsmParameterType,
};
use aws_types::region::Region;
use tracing::{debug, warn};

use crate::{
    configs::SsmStorageConfig,
    domain::{
        PageCursor, Parameter, ParameterMetadata, ParameterName, ParameterPage, ParameterType,
    },
    storage::repository::{ParameterStore, StoreError},
};

const TRANSIENT_ERROR_CODES: &[&str] = &[
    "ThrottlingException",
    "TooManyUpdates",
    "InternalServerError",
    "ServiceUnavailable",
    "RequestLimitExceeded",
];

#[derive(Clone)]
pub struct SsmStorage {
    client: Client,
    region: String,
}

impl SsmStorage {
    /// Binds a client to `region`, or to the region resolved by the default
    /// AWS provider chain when none is given.
    pub async fn new(config: &SsmStorageConfig, region: Option<&str>) -> AnyResult<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }

        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }

        if let Some(endpoint_url) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url.clone());
        }

        let shared_config = loader.load().await;
        let region = shared_config
            .region()
            .map(|r| r.to_string())
            .ok_or_else(|| anyhow!("No AWS region configured. Set AWS_REGION or pass --region"))?;
        let client = Client::new(&shared_config);

        Ok(Self::with_client(client, region))
    }

    pub fn with_client(client: Client, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }
}

impl std::fmt::Debug for SsmStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SsmStorage")
            .field("region", &self.region)
            .finish()
    }
}

/// Maps SDK failures that are not operation-specific (throttling, transport,
/// everything else) onto the store error taxonomy.
fn classify_sdk_error<E, R>(err: SdkError<E, R>, context: String) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    if let SdkError::ServiceError(service_err) = &err {
        let detail = format!("{}: {}", context, DisplayErrorContext(&err));
        return match service_err.err().code() {
            Some(code) if TRANSIENT_ERROR_CODES.contains(&code) => StoreError::Transient(detail),
            _ => StoreError::RemoteCallFailed(detail),
        };
    }

    let detail = format!("{}: {}", context, DisplayErrorContext(&err));
    match err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            StoreError::Transient(detail)
        }
        _ => StoreError::RemoteCallFailed(detail),
    }
}

fn metadata_from_ssm(
    metadata: &aws_sdk_ssm::types::ParameterMetadata,
) -> Result<ParameterMetadata, StoreError> {
    let name = metadata
        .name()
        .ok_or_else(|| StoreError::RemoteCallFailed("Listed parameter has no name".to_string()))
        .and_then(|n| ParameterName::new(n).map_err(StoreError::from))?;

    let parameter_type = metadata
        .r#type()
        .ok_or_else(|| StoreError::RemoteCallFailed(format!("Parameter '{}' has no type", name)))?
        .as_str()
        .parse::<ParameterType>()?;

    Ok(ParameterMetadata {
        name,
        parameter_type,
        description: metadata.description().map(|d| d.to_string()),
    })
}

/// Listed entries this crate cannot represent are skipped so the rest of
/// the page still enumerates.
fn metadata_page(
    listed: &[aws_sdk_ssm::types::ParameterMetadata],
    region: &str,
) -> Vec<ParameterMetadata> {
    listed
        .iter()
        .filter_map(|entry| match metadata_from_ssm(entry) {
            Ok(metadata) => Some(metadata),
            Err(err) => {
                warn!(
                    name = entry.name().unwrap_or_default(),
                    region,
                    error = %err,
                    "Skipping listed parameter"
                );
                None
            }
        })
        .collect()
}

#[async_trait::async_trait]
impl ParameterStore for SsmStorage {
    fn region(&self) -> &str {
        &self.region
    }

    async fn put_parameter(
        &self,
        parameter: &Parameter,
        overwrite: bool,
    ) -> Result<(), StoreError> {
        debug!(
            name = parameter.name().as_str(),
            parameter_type = %parameter.parameter_type(),
            region = self.region.as_str(),
            overwrite,
            "Putting parameter to SSM"
        );

        self.client
            .put_parameter()
            .name(parameter.name().as_str())
            .value(parameter.value())
            .r#type(SsmParameterType::from(
                parameter.parameter_type().as_remote_str(),
            ))
            .set_description(parameter.description().map(|d| d.to_string()))
            .overwrite(overwrite)
            .send()
            .await
            .map_err(|err| {
                let context = parameter.name().to_string();
                if let SdkError::ServiceError(service_err) = &err
                    && service_err.err().is_parameter_already_exists()
                {
                    return StoreError::AlreadyExists(context);
                }
                classify_sdk_error(
                    err,
                    format!("Failed to put parameter '{}'", context),
                )
            })?;

        Ok(())
    }

    async fn get_parameter(
        &self,
        name: &ParameterName,
        with_decryption: bool,
    ) -> Result<String, StoreError> {
        debug!(
            name = name.as_str(),
            region = self.region.as_str(),
            with_decryption,
            "Getting parameter from SSM"
        );

        let response = self
            .client
            .get_parameter()
            .name(name.as_str())
            .with_decryption(with_decryption)
            .send()
            .await
            .map_err(|err| {
                if let SdkError::ServiceError(service_err) = &err
                    && service_err.err().is_parameter_not_found()
                {
                    return StoreError::NotFound(name.to_string());
                }
                classify_sdk_error(
                    err,
                    format!("Failed to get parameter '{}'", name),
                )
            })?;

        response
            .parameter()
            .and_then(|p| p.value())
            .map(|v| v.to_string())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn delete_parameter(&self, name: &ParameterName) -> Result<(), StoreError> {
        debug!(
            name = name.as_str(),
            region = self.region.as_str(),
            "Deleting parameter from SSM"
        );

        self.client
            .delete_parameter()
            .name(name.as_str())
            .send()
            .await
            .map_err(|err| {
                if let SdkError::ServiceError(service_err) = &err
                    && service_err.err().is_parameter_not_found()
                {
                    return StoreError::NotFound(name.to_string());
                }
                classify_sdk_error(
                    err,
                    format!("Failed to delete parameter '{}'", name),
                )
            })?;

        Ok(())
    }

    async fn list_parameters(
        &self,
        page_size: i32,
        cursor: Option<PageCursor>,
    ) -> Result<ParameterPage, StoreError> {
        debug!(
            region = self.region.as_str(),
            page_size,
            has_cursor = cursor.is_some(),
            "Listing parameters from SSM"
        );

        let response = self
            .client
            .describe_parameters()
            .max_results(page_size)
            .set_next_token(cursor.map(|c| c.as_str().to_string()))
            .send()
            .await
            .map_err(|err| {
                classify_sdk_error(err, "Failed to describe parameters".to_string())
            })?;

        let parameters = metadata_page(response.parameters(), &self.region);

        Ok(ParameterPage {
            parameters,
            next_cursor: response
                .next_token()
                .filter(|token| !token.is_empty())
                .map(PageCursor::new),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ssm::types::ParameterMetadata as SsmParameterMetadata;

    #[test]
    fn test_metadata_from_ssm() {
        let listed = SsmParameterMetadata::builder()
            .name("/app/db/password")
            .r#type(SsmParameterType::SecureString)
            .description("Database password")
            .build();

        let metadata = metadata_from_ssm(&listed).unwrap();
        assert_eq!(metadata.name.as_str(), "/app/db/password");
        assert_eq!(metadata.parameter_type, ParameterType::Secret);
        assert_eq!(metadata.description.as_deref(), Some("Database password"));
    }

    #[test]
    fn test_metadata_without_name_is_rejected() {
        let listed = SsmParameterMetadata::builder()
            .r#type(SsmParameterType::String)
            .build();

        assert!(matches!(
            metadata_from_ssm(&listed),
            Err(StoreError::RemoteCallFailed(_))
        ));
    }

    #[test]
    fn test_metadata_type_mapping() {
        let listed = SsmParameterMetadata::builder()
            .name("/list")
            .r#type(SsmParameterType::StringList)
            .build();

        let metadata = metadata_from_ssm(&listed).unwrap();
        assert_eq!(metadata.parameter_type, ParameterType::List);
        assert_eq!(metadata.description, None);
    }

    #[test]
    fn test_unrepresentable_entry_is_skipped() {
        let listed = vec![
            SsmParameterMetadata::builder()
                .name("/first")
                .r#type(SsmParameterType::String)
                .build(),
            SsmParameterMetadata::builder()
                .name("x".repeat(3000))
                .r#type(SsmParameterType::String)
                .build(),
            SsmParameterMetadata::builder()
                .name("/unknown-type")
                .r#type(SsmParameterType::from("Binary"))
                .build(),
            SsmParameterMetadata::builder()
                .name("/last")
                .r#type(SsmParameterType::SecureString)
                .build(),
        ];

        let page = metadata_page(&listed, "eu-west-1");

        let names: Vec<&str> = page.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["/first", "/last"]);
    }
}
