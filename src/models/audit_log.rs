//! Audit log entity model
//!
//! SeaORM entity for the audit_logs table. Rows are append-only: nothing in
//! the service updates or deletes them.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// One recorded entity mutation.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,

    /// Tenant the mutated entity belongs to
    pub tenant_id: Uuid,

    /// Entity type name, e.g. "category"
    pub entity_name: String,

    /// Identifier of the mutated entity
    pub entity_id: Uuid,

    /// "create", "update" or "delete"
    pub action: String,

    /// Changed-values payload: the submitted fields on create/update, the
    /// pre-delete snapshot on delete
    #[sea_orm(column_type = "JsonBinary")]
    pub values: Option<JsonValue>,

    /// Actor who performed the mutation
    pub created_by: Uuid,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
