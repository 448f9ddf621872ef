//! # Category API Handlers
//!
//! Maps the HTTP surface onto the category service: tenant-scoped CRUD,
//! filtered listing, autocomplete, idempotent import, bulk destroy, and the
//! public contact endpoints. Success responses return the payload directly;
//! errors are rendered through [`ApiError`] with a message in the request's
//! language.

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::context::RequestIdentity;
use crate::error::ApiError;
use crate::repositories::category::{
    AutocompleteItem, CategoryFilter, CategoryInput, CategoryListParams, CategoryPage,
    CategoryRecord,
};
use crate::server::AppState;
use crate::services::CategoryService;

fn service(state: &AppState) -> CategoryService {
    CategoryService::new(state.db.clone(), state.config.clone())
}

/// Query parameters for the category list endpoint; filter fields left out
/// of the query string are omitted from the database filter entirely, while
/// `isFeature=false` filters on an explicit false.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryListQuery {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub meta_keywords: Option<String>,
    pub meta_descriptions: Option<String>,
    pub status: Option<String>,
    pub is_feature: Option<bool>,
    pub created_at_start: Option<DateTime<Utc>>,
    pub created_at_end: Option<DateTime<Utc>>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub order_by: Option<String>,
}

impl From<CategoryListQuery> for CategoryListParams {
    fn from(query: CategoryListQuery) -> Self {
        Self {
            filter: CategoryFilter {
                id: query.id,
                name: query.name,
                slug: query.slug,
                meta_keywords: query.meta_keywords,
                meta_descriptions: query.meta_descriptions,
                status: query.status,
                is_feature: query.is_feature,
                created_at_start: query.created_at_start,
                created_at_end: query.created_at_end,
                import_hash: None,
            },
            limit: query.limit,
            offset: query.offset,
            order_by: query.order_by,
        }
    }
}

/// Query parameters for the autocomplete endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AutocompleteQuery {
    pub query: Option<String>,
    pub limit: Option<u64>,
}

/// Body of the bulk-destroy request.
#[derive(Debug, Deserialize)]
pub struct DestroyCategoriesRequest {
    pub ids: Vec<Uuid>,
}

/// Body of the import request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportCategoryRequest {
    pub data: CategoryInput,
    #[serde(default)]
    pub import_hash: Option<String>,
}

pub async fn category_create(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    identity: RequestIdentity,
    Json(input): Json<CategoryInput>,
) -> Result<Json<CategoryRecord>, ApiError> {
    let ctx = identity.for_tenant(tenant_id);

    let record = service(&state)
        .create(&ctx, input)
        .await
        .map_err(|err| ApiError::from_domain(err, ctx.language))?;

    Ok(Json(record))
}

pub async fn category_update(
    State(state): State<AppState>,
    Path((tenant_id, id)): Path<(Uuid, Uuid)>,
    identity: RequestIdentity,
    Json(input): Json<CategoryInput>,
) -> Result<Json<CategoryRecord>, ApiError> {
    let ctx = identity.for_tenant(tenant_id);

    let record = service(&state)
        .update(&ctx, id, input)
        .await
        .map_err(|err| ApiError::from_domain(err, ctx.language))?;

    Ok(Json(record))
}

pub async fn category_import(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    identity: RequestIdentity,
    Json(request): Json<ImportCategoryRequest>,
) -> Result<Json<CategoryRecord>, ApiError> {
    let ctx = identity.for_tenant(tenant_id);

    let record = service(&state)
        .import(&ctx, request.data, request.import_hash)
        .await
        .map_err(|err| ApiError::from_domain(err, ctx.language))?;

    Ok(Json(record))
}

pub async fn category_destroy(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    identity: RequestIdentity,
    Json(request): Json<DestroyCategoriesRequest>,
) -> Result<Json<bool>, ApiError> {
    let ctx = identity.for_tenant(tenant_id);

    service(&state)
        .destroy_all(&ctx, &request.ids)
        .await
        .map_err(|err| ApiError::from_domain(err, ctx.language))?;

    Ok(Json(true))
}

pub async fn category_find(
    State(state): State<AppState>,
    Path((tenant_id, id)): Path<(Uuid, Uuid)>,
    identity: RequestIdentity,
) -> Result<Json<CategoryRecord>, ApiError> {
    let ctx = identity.for_tenant(tenant_id);

    let record = service(&state)
        .find_by_id(&ctx, id)
        .await
        .map_err(|err| ApiError::from_domain(err, ctx.language))?;

    Ok(Json(record))
}

pub async fn category_list(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    identity: RequestIdentity,
    Query(query): Query<CategoryListQuery>,
) -> Result<Json<CategoryPage>, ApiError> {
    let ctx = identity.for_tenant(tenant_id);

    let page = service(&state)
        .find_and_count_all(&ctx, query.into())
        .await
        .map_err(|err| ApiError::from_domain(err, ctx.language))?;

    Ok(Json(page))
}

pub async fn category_autocomplete(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    identity: RequestIdentity,
    Query(query): Query<AutocompleteQuery>,
) -> Result<Json<Vec<AutocompleteItem>>, ApiError> {
    let ctx = identity.for_tenant(tenant_id);

    let items = service(&state)
        .find_all_autocomplete(&ctx, query.query.as_deref(), query.limit)
        .await
        .map_err(|err| ApiError::from_domain(err, ctx.language))?;

    Ok(Json(items))
}

/// Public contact listing. Intentionally mounted outside the
/// `/tenant/{tenant_id}` tree and served without tenant scoping; see the
/// repository's `find_cs` for the caveat.
pub async fn category_find_cs(
    State(state): State<AppState>,
    identity: RequestIdentity,
) -> Result<Json<Vec<CategoryRecord>>, ApiError> {
    let ctx = identity.without_tenant();

    let records = service(&state)
        .find_cs()
        .await
        .map_err(|err| ApiError::from_domain(err, ctx.language))?;

    Ok(Json(records))
}

/// Public contact-number lookup backing the "contact us" page.
pub async fn category_contact(
    State(state): State<AppState>,
    identity: RequestIdentity,
) -> Result<Json<String>, ApiError> {
    let ctx = identity.without_tenant();

    let number = service(&state)
        .find_contact()
        .await
        .map_err(|err| ApiError::from_domain(err, ctx.language))?;

    Ok(Json(number))
}
