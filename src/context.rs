//! Explicit per-request context threaded through services and repositories.
//!
//! The context is built once at the HTTP boundary and passed by reference
//! through every call below it; no layer consults ambient or task-local
//! state for tenant or user identity.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::DomainError;
use crate::i18n::Language;

/// Per-request bundle of the current tenant, current user and negotiated
/// language. Read-only to downstream layers.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub tenant_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub language: Language,
}

impl RequestContext {
    pub fn new(tenant_id: Option<Uuid>, user_id: Option<Uuid>, language: Language) -> Self {
        Self {
            tenant_id,
            user_id,
            language,
        }
    }

    /// The tenant this request is scoped to. Absence means the tenant
    /// routing did not run upstream — a deployment bug, not a client error.
    pub fn current_tenant(&self) -> Result<Uuid, DomainError> {
        self.tenant_id
            .ok_or(DomainError::Configuration { what: "tenant" })
    }

    /// The authenticated user acting in this request. Absence means the
    /// auth middleware did not run upstream.
    pub fn current_user(&self) -> Result<Uuid, DomainError> {
        self.user_id
            .ok_or(DomainError::Configuration { what: "user" })
    }
}

/// Identity facts extracted from request headers: the upstream-authenticated
/// user (`X-User-Id`) and the negotiated language (`Accept-Language`).
///
/// Authentication itself is the gateway's concern; this extractor only
/// reads what the gateway forwarded.
#[derive(Debug, Clone)]
pub struct RequestIdentity {
    pub user_id: Option<Uuid>,
    pub language: Language,
}

impl RequestIdentity {
    /// Builds the context for a tenant-scoped endpoint.
    pub fn for_tenant(&self, tenant_id: Uuid) -> RequestContext {
        RequestContext::new(Some(tenant_id), self.user_id, self.language)
    }

    /// Builds the context for the few endpoints that run without a tenant
    /// in scope (the public contact lookups).
    pub fn without_tenant(&self) -> RequestContext {
        RequestContext::new(None, self.user_id, self.language)
    }
}

impl<S> FromRequestParts<S> for RequestIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value.trim()).ok());

        let language = parts
            .headers
            .get("accept-language")
            .and_then(|value| value.to_str().ok())
            .map(Language::from_header)
            .unwrap_or_default();

        Ok(Self { user_id, language })
    }
}
