//! Category entity model
//!
//! SeaORM entity for the categories table: tenant-scoped admin records,
//! a couple of which double as contact entries for the public contact page.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Category record; every row belongs to exactly one tenant.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "categories")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the category (primary key)
    #[sea_orm(primary_key)]
    pub id: Uuid,

    /// Tenant identifier for multi-tenancy
    pub tenant_id: Uuid,

    /// Display name
    pub name: String,

    /// URL slug, unique per tenant
    pub slug: Option<String>,

    pub meta_keywords: Option<String>,

    pub meta_descriptions: Option<String>,

    /// Contact number surfaced on the public contact page
    pub number: Option<String>,

    pub status: Option<String>,

    /// Featured flag; filters must distinguish "explicitly false" from
    /// "not filtered on"
    pub is_feature: bool,

    /// Ordered list of stored file references, kept as raw JSON; download
    /// URLs are computed at read time and never persisted
    #[sea_orm(column_type = "JsonBinary")]
    pub photo: Option<JsonValue>,

    /// Caller-supplied hash keeping imports idempotent, unique per tenant
    pub import_hash: Option<String>,

    pub created_by: Uuid,

    pub updated_by: Uuid,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
