use aws_config::BehaviorVersion;
use aws_sdk_secretsmanager::Client;
use aws_types::region::Region;

use crate::configs::StorageConfig;

pub async fn load(secret_name: &str, config: &StorageConfig) -> Result<String, String> {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(profile) = &config.ssm_storage_config.profile {
        loader = loader.profile_name(profile);
    }
    if let Some(region) = &config.default_region {
        loader = loader.region(Region::new(region.clone()));
    }
    let client = Client::new(&loader.load().await);

    let result = client
        .get_secret_value()
        .secret_id(secret_name)
        .send()
        .await
        .map_err(|e| format!("Failed to get secret '{secret_name}': {e}"))?;

    result
        .secret_string()
        .map(|s| s.to_string())
        .ok_or_else(|| format!("Secret '{secret_name}' has no string value"))
}
