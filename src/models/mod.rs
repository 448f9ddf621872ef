//! # Data Models
//!
//! SeaORM entity models and shared response types for the back-office API.

use serde::{Deserialize, Serialize};

pub mod audit_log;
pub mod category;

pub use audit_log::Entity as AuditLog;
pub use category::Entity as Category;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "backoffice".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
