pub mod audit_logger;
pub mod model;

pub use audit_logger::BaseAuditLogger;
pub use model::{AuditLog, AuditLogBuilder, AuditLogger, AuditOperation, AuditResource, AuditStatus};
