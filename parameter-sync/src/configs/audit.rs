use serde_derive::{Deserialize, Serialize};
use std::fmt;

use super::{
    Configs,
    loaders::environment::{env_or, optional_env},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuditLogFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for AuditLogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for AuditLogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid audit log format: {}", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub log_format: AuditLogFormat,
    pub actor: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            log_format: AuditLogFormat::Text,
            actor: "unknown".to_string(),
        }
    }
}

#[async_trait::async_trait]
impl Configs for AuditConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let log_format = env_or("AUDIT_LOG_FORMAT", "text")
            .parse::<AuditLogFormat>()
            .unwrap_or(AuditLogFormat::Text);

        let actor = optional_env("AUDIT_ACTOR")
            .or_else(|| optional_env("USER"))
            .unwrap_or_else(|| "unknown".to_string());

        Ok(AuditConfig { log_format, actor })
    }
}
