//! # API Handlers
//!
//! HTTP endpoint handlers for the back-office API.

use axum::response::Json;

use crate::models::ServiceInfo;

pub mod categories;

/// Root handler that returns basic service information
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}
