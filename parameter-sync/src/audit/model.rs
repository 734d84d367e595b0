use crate::domain::ParameterName;
use chrono::Utc;
use serde_derive::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub operation: AuditOperation,
    pub actor: String,
    pub status: AuditStatus,
    pub resource: AuditResource,
    pub detail: Option<String>,
    pub timestamp: chrono::DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    Success,
    NotFound,
    Failure,
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Failure => write!(f, "FAILURE"),
        }
    }
}

pub struct AuditLogBuilder {
    audit_log: AuditLog,
}

impl AuditLogBuilder {
    pub fn new(operation: AuditOperation) -> Self {
        Self {
            audit_log: AuditLog {
                operation,
                actor: String::new(),
                status: AuditStatus::Success,
                resource: AuditResource::empty(),
                detail: None,
                timestamp: Utc::now(),
            },
        }
    }

    pub fn actor(mut self, actor: impl Into<String>) -> Self {
        self.audit_log.actor = actor.into();
        self
    }

    pub fn resource(mut self, resource: AuditResource) -> Self {
        self.audit_log.resource = resource;
        self
    }

    pub fn build_success(mut self) -> AuditLog {
        self.audit_log.status = AuditStatus::Success;
        self.audit_log.timestamp = Utc::now();
        self.audit_log
    }

    pub fn build_not_found(mut self) -> AuditLog {
        self.audit_log.status = AuditStatus::NotFound;
        self.audit_log.timestamp = Utc::now();
        self.audit_log
    }

    pub fn build_failure(mut self, error_message: impl Into<String>) -> AuditLog {
        self.audit_log.status = AuditStatus::Failure;
        self.audit_log.detail = Some(error_message.into());
        self.audit_log.timestamp = Utc::now();
        self.audit_log
    }
}

#[async_trait::async_trait]
pub trait AuditLogger: Send + Sync {
    async fn log(&self, audit_log: AuditLog);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditOperation {
    Put,
    Get,
    Delete,
    Copy,
}

impl fmt::Display for AuditOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Put => write!(f, "PUT"),
            Self::Get => write!(f, "GET"),
            Self::Delete => write!(f, "DELETE"),
            Self::Copy => write!(f, "COPY"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<ParameterName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_region: Option<String>,
}

impl AuditResource {
    pub fn parameter(name: &ParameterName, region: &str) -> Self {
        Self {
            name: Some(name.clone()),
            region: Some(region.to_string()),
            destination_region: None,
        }
    }

    pub fn copy(name: &ParameterName, source_region: &str, destination_region: &str) -> Self {
        Self {
            name: Some(name.clone()),
            region: Some(source_region.to_string()),
            destination_region: Some(destination_region.to_string()),
        }
    }

    pub fn empty() -> Self {
        Self {
            name: None,
            region: None,
            destination_region: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_failure_carries_detail() {
        let name = ParameterName::new("/app/token").unwrap();
        let log = AuditLogBuilder::new(AuditOperation::Put)
            .actor("ops")
            .resource(AuditResource::parameter(&name, "eu-west-1"))
            .build_failure("AccessDenied");

        assert_eq!(log.status, AuditStatus::Failure);
        assert_eq!(log.detail.as_deref(), Some("AccessDenied"));
        assert_eq!(log.resource.name.as_ref().unwrap().as_str(), "/app/token");
        assert_eq!(log.resource.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn test_copy_resource_names_both_regions() {
        let name = ParameterName::new("/x").unwrap();
        let resource = AuditResource::copy(&name, "eu-west-1", "us-east-1");

        let json = serde_json::to_value(&resource).unwrap();
        assert_eq!(json["region"], "eu-west-1");
        assert_eq!(json["destination_region"], "us-east-1");
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_value(AuditStatus::NotFound).unwrap(),
            serde_json::json!("NOT_FOUND")
        );
    }
}
