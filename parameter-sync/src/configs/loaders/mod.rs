//! Resolves a value from a URI-style reference:
//! `string://`, `file://`, `aws_secrets://`, `aws_parameter_store://`,
//! or a bare value.

pub mod aws_parameter_store;
pub mod aws_secrets;
pub mod environment;
pub mod file;

use super::StorageConfig;

pub async fn load(input: &str, config: &StorageConfig) -> Result<String, String> {
    if let Some(content) = input.strip_prefix("string://") {
        Ok(content.to_string())
    } else if let Some(path) = input.strip_prefix("file://") {
        file::load(path).await
    } else if let Some(secret_name) = input.strip_prefix("aws_secrets://") {
        aws_secrets::load(secret_name, config).await
    } else if let Some(param_name) = input.strip_prefix("aws_parameter_store://") {
        aws_parameter_store::load(param_name, config).await
    } else {
        Ok(input.to_string())
    }
}
