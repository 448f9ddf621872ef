//! Append-only audit log sink.
//!
//! Every entity mutation appends exactly one entry here through the same
//! connection handle as the mutation itself, so the entry commits or rolls
//! back together with the data change. Entries are never updated or
//! deleted.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::error::DomainError;
use crate::models::audit_log;

/// Mutation kinds recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
        }
    }
}

/// A single entry to append to the audit trail.
#[derive(Debug, Clone)]
pub struct NewAuditLogEntry {
    pub entity_name: &'static str,
    pub entity_id: Uuid,
    pub action: AuditAction,
    pub values: JsonValue,
}

/// Repository for audit log writes.
pub struct AuditLogRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> AuditLogRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Appends one entry stamped with the context's tenant and actor.
    pub async fn append(
        &self,
        ctx: &RequestContext,
        entry: NewAuditLogEntry,
    ) -> Result<(), DomainError> {
        let model = audit_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(ctx.current_tenant()?),
            entity_name: Set(entry.entity_name.to_string()),
            entity_id: Set(entry.entity_id),
            action: Set(entry.action.as_str().to_string()),
            values: Set(Some(entry.values)),
            created_by: Set(ctx.current_user()?),
            created_at: Set(Utc::now().into()),
        };

        model.insert(self.conn).await?;
        Ok(())
    }
}
