//! Test utilities for database testing.
//!
//! Sets up in-memory SQLite databases with all migrations applied, plus
//! fixture helpers for tenants, request contexts and services.

use std::sync::Arc;

use anyhow::Result;
use backoffice::config::AppConfig;
use backoffice::context::RequestContext;
use backoffice::i18n::Language;
use backoffice::models::audit_log;
use backoffice::repositories::category::CategoryInput;
use backoffice::services::CategoryService;
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    QueryFilter, Statement,
};
use uuid::Uuid;

/// Sets up an in-memory SQLite database with all migrations applied.
///
/// The pool is capped at one connection so every query and transaction sees
/// the same in-memory database.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);

    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;

    // SQLite does not enforce our Postgres foreign key semantics; disable
    // FK checks so fixtures can be inserted without cross-table ceremony.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "PRAGMA foreign_keys = OFF".to_string(),
    ))
    .await?;

    Ok(db)
}

/// Creates a tenant row directly and returns its id.
#[allow(dead_code)]
pub async fn create_test_tenant(db: &DatabaseConnection) -> Result<Uuid> {
    let id = Uuid::new_v4();
    let stmt = Statement::from_sql_and_values(
        db.get_database_backend(),
        "INSERT INTO tenants (id, name) VALUES (?, ?)",
        [id.into(), "Test Tenant".into()],
    );
    db.execute(stmt).await?;
    Ok(id)
}

#[allow(dead_code)]
pub fn test_config() -> Arc<AppConfig> {
    Arc::new(AppConfig {
        profile: "test".to_string(),
        ..AppConfig::default()
    })
}

#[allow(dead_code)]
pub fn test_context(tenant_id: Uuid, user_id: Uuid) -> RequestContext {
    RequestContext::new(Some(tenant_id), Some(user_id), Language::En)
}

#[allow(dead_code)]
pub fn category_service(db: &DatabaseConnection) -> CategoryService {
    CategoryService::new(db.clone(), test_config())
}

#[allow(dead_code)]
pub fn category_input(name: &str) -> CategoryInput {
    CategoryInput {
        name: name.to_string(),
        ..CategoryInput::default()
    }
}

/// All audit entries recorded for one entity id.
#[allow(dead_code)]
pub async fn audit_entries_for(
    db: &DatabaseConnection,
    entity_id: Uuid,
) -> Result<Vec<audit_log::Model>> {
    Ok(backoffice::models::AuditLog::find()
        .filter(audit_log::Column::EntityId.eq(entity_id))
        .all(db)
        .await?)
}

/// All audit entries recorded with the given action.
#[allow(dead_code)]
pub async fn audit_entries_with_action(
    db: &DatabaseConnection,
    action: &str,
) -> Result<Vec<audit_log::Model>> {
    Ok(backoffice::models::AuditLog::find()
        .filter(audit_log::Column::Action.eq(action))
        .all(db)
        .await?)
}
