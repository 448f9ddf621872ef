//! # Error Handling
//!
//! Two layers: [`DomainError`] is what repositories and services speak, and
//! [`ApiError`] is the HTTP envelope rendered to clients, with a message
//! resolved in the request's language and a trace ID for correlation.

use axum::{
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::i18n::{self, Language};
use crate::telemetry;

/// Errors produced by repositories and services.
///
/// Repository errors propagate unchanged through the service layer; the
/// service only intercepts transaction lifecycle and duplicate-key
/// translation (see `db::translate_unique_violation`).
#[derive(Debug, Error)]
pub enum DomainError {
    /// The record does not exist under the current tenant. Cross-tenant
    /// lookups report this too, so record existence never leaks.
    #[error("record not found")]
    NotFound,

    /// A business-rule validation failed; `key` is an i18n message key.
    #[error("validation failed: {key}")]
    Validation { key: String },

    /// A unique index was violated; carries the entity and the API-facing
    /// field name instead of a driver error string.
    #[error("duplicate value for {entity}.{field}")]
    UniqueField {
        entity: &'static str,
        field: &'static str,
    },

    /// The request context is missing a value the upstream middleware was
    /// supposed to provide. A deployment bug, not a client error.
    #[error("request context is missing the current {what}")]
    Configuration { what: &'static str },

    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
}

impl DomainError {
    /// Shorthand for a validation error with the given message key.
    pub fn validation(key: impl Into<String>) -> Self {
        Self::Validation { key: key.into() }
    }

    /// Resolves the user-facing message in the given language.
    pub fn localized_message(&self, language: Language) -> String {
        match self {
            Self::NotFound => i18n::message(language, "errors.notFound"),
            Self::Validation { key } => i18n::message(language, key),
            Self::UniqueField { entity, field } => {
                i18n::message(language, &format!("{entity}.errors.unique.{field}"))
            }
            Self::Configuration { .. } | Self::Database(_) => {
                i18n::message(language, "errors.internal")
            }
        }
    }
}

/// Unified API error response structure.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// HTTP status code for the response
    #[serde(skip_serializing)]
    pub status: StatusCode,
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message, resolved in the request language
    pub message: String,
    /// Additional error details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Correlation trace ID for debugging (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl ApiError {
    /// Create a new API error with the given status code and message.
    pub fn new(status: StatusCode, code: &str, message: &str) -> Self {
        Self {
            status,
            code: code.to_string(),
            message: message.to_string(),
            details: None,
            trace_id: Self::current_trace_id(),
        }
    }

    /// Add details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Renders a domain error as its HTTP envelope, resolving the message
    /// in the request's language.
    pub fn from_domain(error: DomainError, language: Language) -> Self {
        let message = error.localized_message(language);
        let (status, code) = match &error {
            DomainError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            DomainError::Validation { .. } | DomainError::UniqueField { .. } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED")
            }
            DomainError::Configuration { .. } => {
                tracing::error!(%error, "request context is incomplete");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR")
            }
            DomainError::Database(_) => {
                tracing::error!(%error, "database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR")
            }
        };
        Self::new(status, code, &message)
    }

    /// Extract the trace ID from the active request scope, falling back to
    /// a generated correlation ID for basic client-server log correlation.
    fn current_trace_id() -> Option<String> {
        telemetry::current_trace_id()
            .or_else(|| Some(format!("corr-{}", &uuid::Uuid::new_v4().to_string()[..8])))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(
            "content-type",
            HeaderValue::from_static("application/problem+json"),
        );

        (self.status, headers, axum::Json(self)).into_response()
    }
}
