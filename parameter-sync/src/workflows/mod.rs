pub mod bulk_load;
pub mod delete_matching;
pub mod region_copy;

use std::fmt;

use crate::{domain::ParameterError, storage::repository::StoreError};

pub use bulk_load::{BulkLoadReport, bulk_load, parse_document};
pub use delete_matching::{DeleteMatchingReport, delete_matching};
pub use region_copy::{RegionCopyReport, RegionCopyRequest, copy_region};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    InvalidInput(String),
    InvalidRegion { region: String, valid: Vec<String> },
    Load(String),
    Store(StoreError),
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::InvalidRegion { region, valid } => write!(
                f,
                "Invalid region '{}'. Valid regions: {}",
                region,
                valid.join(", ")
            ),
            Self::Load(msg) => write!(f, "Failed to load input: {}", msg),
            Self::Store(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for WorkflowError {}

impl From<StoreError> for WorkflowError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<ParameterError> for WorkflowError {
    fn from(err: ParameterError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}
