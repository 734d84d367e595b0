use std::fmt;

use crate::{
    domain::{PageCursor, Parameter, ParameterError, ParameterName, ParameterPage},
    retry::RetryableError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(String),
    AlreadyExists(String),
    /// Throttling, timeouts and other failures worth retrying.
    Transient(String),
    RemoteCallFailed(String),
    ValidationError(String),
    /// The store could not be set up (credentials, region, endpoint).
    Configuration(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Parameter not found: {}", msg),
            Self::AlreadyExists(msg) => write!(f, "Parameter already exists: {}", msg),
            Self::Transient(msg) => write!(f, "Transient remote failure: {}", msg),
            Self::RemoteCallFailed(msg) => write!(f, "Remote call failed: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::Configuration(msg) => write!(f, "Store configuration error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<ParameterError> for StoreError {
    fn from(err: ParameterError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl RetryableError for StoreError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// Remote parameter store bound to a single region.
#[async_trait::async_trait]
pub trait ParameterStore: Send + Sync {
    fn region(&self) -> &str;

    async fn put_parameter(&self, parameter: &Parameter, overwrite: bool)
    -> Result<(), StoreError>;

    async fn get_parameter(
        &self,
        name: &ParameterName,
        with_decryption: bool,
    ) -> Result<String, StoreError>;

    async fn delete_parameter(&self, name: &ParameterName) -> Result<(), StoreError>;

    async fn list_parameters(
        &self,
        page_size: i32,
        cursor: Option<PageCursor>,
    ) -> Result<ParameterPage, StoreError>;
}
