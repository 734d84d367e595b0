use crate::{
    audit::model::{AuditLog, AuditLogger, AuditResource, AuditStatus},
    configs::{AuditConfig, AuditLogFormat},
};
use serde_json::{Value, json};
use tracing::{error, info, warn};

pub const NA: &str = "N/A";

#[derive(Clone)]
pub struct BaseAuditLogger {
    config: AuditConfig,
}

impl BaseAuditLogger {
    pub fn new(config: AuditConfig) -> Self {
        Self { config }
    }

    pub fn actor(&self) -> &str {
        &self.config.actor
    }

    fn opt_to_string<T: ToString>(&self, opt: &Option<T>) -> String {
        opt.as_ref()
            .map_or_else(|| NA.to_string(), |v| v.to_string())
    }

    fn resource_json_value(&self, resource: &AuditResource) -> Value {
        let mut map = serde_json::Map::new();
        map.insert("name".to_string(), json!(self.opt_to_string(&resource.name)));
        map.insert(
            "region".to_string(),
            json!(self.opt_to_string(&resource.region)),
        );
        if let Some(destination) = &resource.destination_region {
            map.insert("destination_region".to_string(), json!(destination));
        }
        Value::Object(map)
    }

    fn json_line(&self, audit_log: &AuditLog) -> String {
        let mut map = serde_json::Map::new();
        map.insert("actor".to_string(), json!(audit_log.actor));
        map.insert("operation".to_string(), json!(audit_log.operation));
        map.insert("status".to_string(), json!(audit_log.status));
        map.insert(
            "resource".to_string(),
            self.resource_json_value(&audit_log.resource),
        );
        if let Some(detail) = &audit_log.detail {
            map.insert("error".to_string(), json!(detail));
        }
        map.insert(
            "timestamp".to_string(),
            json!(audit_log.timestamp.to_rfc3339()),
        );
        Value::Object(map).to_string()
    }

    fn text_line(&self, audit_log: &AuditLog) -> String {
        let name = self.opt_to_string(&audit_log.resource.name);
        let region = self.opt_to_string(&audit_log.resource.region);
        let location = match &audit_log.resource.destination_region {
            Some(destination) => format!("{} -> {}", region, destination),
            None => region.clone(),
        };

        let text = match (&audit_log.status, &audit_log.detail) {
            (AuditStatus::Failure, Some(detail)) => format!(
                "{} {} [{}] by {} - FAILURE: {}",
                audit_log.operation, name, location, audit_log.actor, detail
            ),
            (status, _) => format!(
                "{} {} [{}] by {} - {}",
                audit_log.operation, name, location, audit_log.actor, status
            ),
        };

        let mut log_parts = vec![
            format!("audit.actor={}", audit_log.actor),
            format!("audit.operation={}", audit_log.operation),
            format!("audit.status={}", audit_log.status),
            format!("audit.resource.name={}", name),
            format!("audit.resource.region={}", region),
        ];
        if let Some(destination) = &audit_log.resource.destination_region {
            log_parts.push(format!("audit.resource.destination_region={}", destination));
        }
        log_parts.push(format!("audit.timestamp={}", audit_log.timestamp.to_rfc3339()));

        format!("{} | {}", text, log_parts.join(" "))
    }

    pub fn render(&self, audit_log: &AuditLog) -> String {
        match self.config.log_format {
            AuditLogFormat::Json => self.json_line(audit_log),
            AuditLogFormat::Text => self.text_line(audit_log),
        }
    }
}

#[async_trait::async_trait]
impl AuditLogger for BaseAuditLogger {
    async fn log(&self, audit_log: AuditLog) {
        let line = self.render(&audit_log);
        match audit_log.status {
            AuditStatus::Success => info!("{}", line),
            AuditStatus::NotFound => warn!("{}", line),
            AuditStatus::Failure => error!("{}", line),
        }
    }
}
