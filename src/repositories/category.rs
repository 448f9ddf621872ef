//! Category repository.
//!
//! Tenant-scoped data access for category records. Every read and write is
//! filtered by the context's tenant, and every mutation appends an audit
//! entry through the same connection handle so both commit or roll back as
//! one unit. A lookup that misses — including one that hits a record owned
//! by another tenant — reports `NotFound`, never a permission error, so
//! record existence does not leak across tenants.

use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::context::RequestContext;
use crate::db::UniqueFieldSpec;
use crate::error::DomainError;
use crate::files::{FileRef, StoredFile, fill_download_urls};
use crate::models::category::{self, Entity as Category};
use crate::query;
use crate::repositories::audit_log::{AuditAction, AuditLogRepository, NewAuditLogEntry};

/// Entity name recorded in audit entries and duplicate-key messages.
pub const ENTITY_NAME: &str = "category";

/// Record name the public contact endpoints look up.
const CONTACT_RECORD_NAME: &str = "WhatsApp";

/// Unique indexes translated into field-level validation errors.
pub const UNIQUE_FIELDS: &[UniqueFieldSpec] = &[
    UniqueFieldSpec {
        column: "slug",
        field: "slug",
    },
    UniqueFieldSpec {
        column: "import_hash",
        field: "importHash",
    },
];

/// Create/update payload for a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryInput {
    pub name: String,
    pub slug: Option<String>,
    pub meta_keywords: Option<String>,
    pub meta_descriptions: Option<String>,
    pub number: Option<String>,
    pub status: Option<String>,
    pub is_feature: bool,
    /// Absent on update means "leave the attachments unchanged".
    pub photo: Option<Vec<StoredFile>>,
    pub import_hash: Option<String>,
}

/// Read shape of a category, with computed fields (download URLs) resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub slug: Option<String>,
    pub meta_keywords: Option<String>,
    pub meta_descriptions: Option<String>,
    pub number: Option<String>,
    pub status: Option<String>,
    pub is_feature: bool,
    pub photo: Vec<FileRef>,
    pub import_hash: Option<String>,
    pub created_by: Uuid,
    pub updated_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

/// Optional predicates combined conjunctively. Absent (and blank) fields
/// are omitted from the query entirely; `is_feature: Some(false)` matches
/// only records explicitly flagged false, which the `Option<bool>` keeps
/// distinguishable from "not filtered on" at the type level.
#[derive(Debug, Clone, Default)]
pub struct CategoryFilter {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub meta_keywords: Option<String>,
    pub meta_descriptions: Option<String>,
    pub status: Option<String>,
    pub is_feature: Option<bool>,
    /// Inclusive lower bound on creation time.
    pub created_at_start: Option<DateTime<Utc>>,
    /// Inclusive upper bound on creation time.
    pub created_at_end: Option<DateTime<Utc>>,
    pub import_hash: Option<String>,
}

/// Filter, pagination and sort for [`CategoryRepository::find_and_count_all`].
#[derive(Debug, Clone, Default)]
pub struct CategoryListParams {
    pub filter: CategoryFilter,
    /// Page size; `None` or 0 returns everything.
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// `field_ASC` / `field_DESC` spec; defaults to newest-created first.
    pub order_by: Option<String>,
}

/// One page of rows plus the total count under the same filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPage {
    pub rows: Vec<CategoryRecord>,
    pub count: u64,
}

/// Projection returned by the autocomplete search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompleteItem {
    pub id: Uuid,
    pub label: String,
}

/// Repository for category database operations.
pub struct CategoryRepository<'a, C> {
    conn: &'a C,
    config: &'a AppConfig,
}

impl<'a, C: ConnectionTrait> CategoryRepository<'a, C> {
    /// Creates a repository bound to a connection handle — the pool for
    /// plain reads, an open transaction for mutations.
    pub fn new(conn: &'a C, config: &'a AppConfig) -> Self {
        Self { conn, config }
    }

    /// Inserts a tenant-stamped, creator-stamped record, appends the CREATE
    /// audit entry, and returns the record re-read through [`Self::find_by_id`]
    /// so computed fields come back exactly as any other read produces them.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: &CategoryInput,
    ) -> Result<CategoryRecord, DomainError> {
        let tenant_id = ctx.current_tenant()?;
        let user_id = ctx.current_user()?;

        let id = Uuid::new_v4();
        let now: DateTimeWithTimeZone = Utc::now().into();

        let model = category::ActiveModel {
            id: Set(id),
            tenant_id: Set(tenant_id),
            name: Set(input.name.clone()),
            slug: Set(input.slug.clone()),
            meta_keywords: Set(input.meta_keywords.clone()),
            meta_descriptions: Set(input.meta_descriptions.clone()),
            number: Set(input.number.clone()),
            status: Set(input.status.clone()),
            is_feature: Set(input.is_feature),
            photo: Set(encode_photo(input.photo.as_ref())?),
            import_hash: Set(input.import_hash.clone()),
            created_by: Set(user_id),
            updated_by: Set(user_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model.insert(self.conn).await?;

        self.write_audit(ctx, AuditAction::Create, id, audit_values(input)?)
            .await?;

        self.find_by_id(ctx, id).await
    }

    /// Fetches a record scoped to the current tenant.
    pub async fn find_by_id(
        &self,
        ctx: &RequestContext,
        id: Uuid,
    ) -> Result<CategoryRecord, DomainError> {
        let tenant_id = ctx.current_tenant()?;

        let record = Category::find_by_id(id)
            .filter(category::Column::TenantId.eq(tenant_id))
            .one(self.conn)
            .await?
            .ok_or(DomainError::NotFound)?;

        self.map_record(record)
    }

    /// Applies the given fields to an owned record, stamps the updater,
    /// appends the UPDATE audit entry with the new payload, and returns the
    /// refreshed record.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        input: &CategoryInput,
    ) -> Result<CategoryRecord, DomainError> {
        let tenant_id = ctx.current_tenant()?;

        let existing = Category::find_by_id(id)
            .filter(category::Column::TenantId.eq(tenant_id))
            .one(self.conn)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active = existing.into_active_model();
        active.name = Set(input.name.clone());
        active.slug = Set(input.slug.clone());
        active.meta_keywords = Set(input.meta_keywords.clone());
        active.meta_descriptions = Set(input.meta_descriptions.clone());
        active.number = Set(input.number.clone());
        active.status = Set(input.status.clone());
        active.is_feature = Set(input.is_feature);
        // Attachments and the import hash are only touched when the payload
        // carries them; the admin forms omit both on ordinary edits.
        if input.photo.is_some() {
            active.photo = Set(encode_photo(input.photo.as_ref())?);
        }
        if let Some(import_hash) = &input.import_hash {
            active.import_hash = Set(Some(import_hash.clone()));
        }
        active.updated_by = Set(ctx.current_user()?);
        active.updated_at = Set(Utc::now().into());

        active.update(self.conn).await?;

        self.write_audit(ctx, AuditAction::Update, id, audit_values(input)?)
            .await?;

        self.find_by_id(ctx, id).await
    }

    /// Deletes an owned record, appending a DELETE audit entry that carries
    /// the pre-delete snapshot so the audit history retains the removed
    /// values.
    pub async fn destroy(&self, ctx: &RequestContext, id: Uuid) -> Result<(), DomainError> {
        let tenant_id = ctx.current_tenant()?;

        let existing = Category::find_by_id(id)
            .filter(category::Column::TenantId.eq(tenant_id))
            .one(self.conn)
            .await?
            .ok_or(DomainError::NotFound)?;

        let snapshot = serde_json::to_value(&existing)
            .map_err(|err| DomainError::from(DbErr::Json(err.to_string())))?;

        Category::delete_by_id(id).exec(self.conn).await?;

        self.write_audit(ctx, AuditAction::Delete, id, snapshot)
            .await
    }

    /// Paginated, filtered, sorted listing plus the total count matching
    /// the filter (not the page).
    pub async fn find_and_count_all(
        &self,
        ctx: &RequestContext,
        params: &CategoryListParams,
    ) -> Result<CategoryPage, DomainError> {
        let tenant_id = ctx.current_tenant()?;
        let condition = Self::filter_condition(tenant_id, &params.filter);
        let (column, order) = Self::order_for(params.order_by.as_deref());

        let mut select = Category::find()
            .filter(condition.clone())
            .order_by(column, order)
            .order_by(category::Column::Id, Order::Asc);
        if let Some(offset) = params.offset.filter(|v| *v > 0) {
            select = select.offset(offset);
        }
        if let Some(limit) = params.limit.filter(|v| *v > 0) {
            select = select.limit(limit);
        }

        let models = select.all(self.conn).await?;
        let count = Category::find()
            .filter(condition)
            .count(self.conn)
            .await?;

        let rows = models
            .into_iter()
            .map(|model| self.map_record(model))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CategoryPage { rows, count })
    }

    /// Tenant-scoped id-or-name search, name ascending, projected to
    /// `{id, label}` pairs only.
    pub async fn find_all_autocomplete(
        &self,
        ctx: &RequestContext,
        search: Option<&str>,
        limit: Option<u64>,
    ) -> Result<Vec<AutocompleteItem>, DomainError> {
        let tenant_id = ctx.current_tenant()?;

        let mut condition = Condition::all().add(category::Column::TenantId.eq(tenant_id));
        if let Some(term) = search.map(str::trim).filter(|term| !term.is_empty()) {
            let mut id_or_name =
                Condition::any().add(query::ci_contains(category::Column::Name, term));
            if let Ok(id) = Uuid::parse_str(term) {
                id_or_name = id_or_name.add(category::Column::Id.eq(id));
            }
            condition = condition.add(id_or_name);
        }

        let mut select = Category::find()
            .filter(condition)
            .order_by(category::Column::Name, Order::Asc);
        if let Some(limit) = limit.filter(|v| *v > 0) {
            select = select.limit(limit);
        }

        let records = select.all(self.conn).await?;

        Ok(records
            .into_iter()
            .map(|record| AutocompleteItem {
                id: record.id,
                label: record.name,
            })
            .collect())
    }

    /// Tenant-scoped count under the given filter, used for existence
    /// checks such as duplicate-import detection.
    pub async fn count(
        &self,
        ctx: &RequestContext,
        filter: &CategoryFilter,
    ) -> Result<u64, DomainError> {
        let tenant_id = ctx.current_tenant()?;

        Ok(Category::find()
            .filter(Self::filter_condition(tenant_id, filter))
            .count(self.conn)
            .await?)
    }

    /// Public contact-page listing, newest first.
    ///
    /// Deliberately NOT tenant-scoped: the public storefront calls this
    /// without a tenant in scope and expects the contact records across all
    /// tenants. Every other read in this repository enforces tenant
    /// isolation — keep this one confined to the contact endpoints.
    pub async fn find_cs(&self) -> Result<Vec<CategoryRecord>, DomainError> {
        let models = Category::find()
            .order_by(category::Column::CreatedAt, Order::Desc)
            .all(self.conn)
            .await?;

        models
            .into_iter()
            .map(|model| self.map_record(model))
            .collect()
    }

    /// Contact-number lookup for the public "contact us" flow: the number
    /// of the record named "WhatsApp". Not tenant-scoped, same caveat as
    /// [`Self::find_cs`].
    pub async fn find_contact(&self) -> Result<String, DomainError> {
        let record = Category::find()
            .filter(category::Column::Name.eq(CONTACT_RECORD_NAME))
            .one(self.conn)
            .await?;

        record
            .and_then(|model| model.number)
            .ok_or(DomainError::NotFound)
    }

    async fn write_audit(
        &self,
        ctx: &RequestContext,
        action: AuditAction,
        entity_id: Uuid,
        values: JsonValue,
    ) -> Result<(), DomainError> {
        AuditLogRepository::new(self.conn)
            .append(
                ctx,
                NewAuditLogEntry {
                    entity_name: ENTITY_NAME,
                    entity_id,
                    action,
                    values,
                },
            )
            .await
    }

    fn filter_condition(tenant_id: Uuid, filter: &CategoryFilter) -> Condition {
        Condition::all()
            .add(category::Column::TenantId.eq(tenant_id))
            .add_option(filter.id.map(|id| category::Column::Id.eq(id)))
            .add_option(
                non_blank(filter.name.as_deref())
                    .map(|v| query::ci_contains(category::Column::Name, v)),
            )
            .add_option(
                non_blank(filter.slug.as_deref())
                    .map(|v| query::ci_contains(category::Column::Slug, v)),
            )
            .add_option(
                non_blank(filter.meta_keywords.as_deref())
                    .map(|v| query::ci_contains(category::Column::MetaKeywords, v)),
            )
            .add_option(
                non_blank(filter.meta_descriptions.as_deref())
                    .map(|v| query::ci_contains(category::Column::MetaDescriptions, v)),
            )
            .add_option(
                non_blank(filter.status.as_deref()).map(|v| category::Column::Status.eq(v)),
            )
            .add_option(
                filter
                    .is_feature
                    .map(|v| category::Column::IsFeature.eq(v)),
            )
            .add_option(
                filter
                    .created_at_start
                    .map(|v| category::Column::CreatedAt.gte(v)),
            )
            .add_option(
                filter
                    .created_at_end
                    .map(|v| category::Column::CreatedAt.lte(v)),
            )
            .add_option(
                non_blank(filter.import_hash.as_deref())
                    .map(|v| category::Column::ImportHash.eq(v)),
            )
    }

    fn order_for(order_by: Option<&str>) -> (category::Column, Order) {
        let default = (category::Column::CreatedAt, Order::Desc);
        let Some((field, direction)) = order_by.and_then(query::parse_order_by) else {
            return default;
        };

        let column = match field {
            "name" => category::Column::Name,
            "slug" => category::Column::Slug,
            "status" => category::Column::Status,
            "isFeature" => category::Column::IsFeature,
            "createdAt" => category::Column::CreatedAt,
            "updatedAt" => category::Column::UpdatedAt,
            _ => return default,
        };

        (column, direction.into_order())
    }

    fn map_record(&self, model: category::Model) -> Result<CategoryRecord, DomainError> {
        let photo = decode_photo(model.photo)?;

        Ok(CategoryRecord {
            id: model.id,
            tenant_id: model.tenant_id,
            name: model.name,
            slug: model.slug,
            meta_keywords: model.meta_keywords,
            meta_descriptions: model.meta_descriptions,
            number: model.number,
            status: model.status,
            is_feature: model.is_feature,
            photo: fill_download_urls(photo, &self.config.file_download_base_url),
            import_hash: model.import_hash,
            created_by: model.created_by,
            updated_by: model.updated_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn audit_values(input: &CategoryInput) -> Result<JsonValue, DomainError> {
    serde_json::to_value(input).map_err(|err| DomainError::from(DbErr::Json(err.to_string())))
}

fn encode_photo(photo: Option<&Vec<StoredFile>>) -> Result<Option<JsonValue>, DomainError> {
    photo
        .map(serde_json::to_value)
        .transpose()
        .map_err(|err| DomainError::from(DbErr::Json(err.to_string())))
}

fn decode_photo(raw: Option<JsonValue>) -> Result<Vec<StoredFile>, DomainError> {
    match raw {
        None | Some(JsonValue::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value)
            .map_err(|err| DomainError::from(DbErr::Json(err.to_string()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Repo<'a> = CategoryRepository<'a, sea_orm::DatabaseConnection>;

    #[test]
    fn unknown_or_missing_order_by_defaults_to_newest_first() {
        let (column, order) = Repo::order_for(None);
        assert!(matches!(column, category::Column::CreatedAt));
        assert_eq!(order, Order::Desc);

        let (column, order) = Repo::order_for(Some("favoriteColor_ASC"));
        assert!(matches!(column, category::Column::CreatedAt));
        assert_eq!(order, Order::Desc);
    }

    #[test]
    fn order_by_maps_whitelisted_fields() {
        let (column, order) = Repo::order_for(Some("name_ASC"));
        assert!(matches!(column, category::Column::Name));
        assert_eq!(order, Order::Asc);

        let (column, order) = Repo::order_for(Some("updatedAt_DESC"));
        assert!(matches!(column, category::Column::UpdatedAt));
        assert_eq!(order, Order::Desc);
    }

    #[test]
    fn blank_filter_values_are_treated_as_absent() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("")), None);
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(Some(" abc ")), Some("abc"));
    }

    #[test]
    fn photo_round_trips_through_json() {
        let stored = vec![StoredFile {
            name: "a.png".to_string(),
            size_in_bytes: Some(10),
            storage_key: "uploads/a.png".to_string(),
        }];

        let encoded = encode_photo(Some(&stored)).unwrap();
        let decoded = decode_photo(encoded).unwrap();
        assert_eq!(decoded, stored);

        assert_eq!(decode_photo(None).unwrap(), Vec::<StoredFile>::new());
        assert_eq!(
            decode_photo(Some(JsonValue::Null)).unwrap(),
            Vec::<StoredFile>::new()
        );
    }
}
