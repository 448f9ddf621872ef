//! Database pool management and storage-error translation.
//!
//! Owns the SeaORM connection pool setup (with retry and backoff), the
//! transaction rollback helper used by the services, and the translation of
//! driver-level duplicate-key failures into typed domain errors. Queries
//! themselves stay in the repositories, which are generic over
//! [`sea_orm::ConnectionTrait`] so the same code runs against the pool or
//! an open transaction.

use std::time::Duration;

use anyhow::{Context, Result};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DatabaseTransaction, DbErr,
    RuntimeErr,
};
use tokio::time::sleep;

use crate::config::AppConfig;
use crate::error::DomainError;

/// Errors that can occur during database setup.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("failed to connect to database: {source}")]
    ConnectionFailed {
        #[from]
        source: DbErr,
    },
    #[error("invalid database configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// Initializes a database connection pool with the given configuration,
/// retrying transient connection failures with exponential backoff.
pub async fn init_pool(cfg: &AppConfig) -> Result<DatabaseConnection> {
    if cfg.database_url.is_empty() {
        return Err(DatabaseError::InvalidConfiguration {
            message: "Database URL cannot be empty".to_string(),
        }
        .into());
    }

    let mut opt = ConnectOptions::new(&cfg.database_url);
    opt.max_connections(cfg.db_max_connections)
        .acquire_timeout(Duration::from_millis(cfg.db_acquire_timeout_ms))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let max_retries = 5;
    let mut retry_delay = Duration::from_millis(100);

    for attempt in 1..=max_retries {
        match Database::connect(opt.clone()).await {
            Ok(conn) => {
                log::info!("Successfully connected to database (attempt {})", attempt);
                return Ok(conn);
            }
            Err(e) => {
                if attempt == max_retries {
                    log::error!(
                        "Failed to connect to database after {} attempts: {}",
                        max_retries,
                        e
                    );
                    return Err(DatabaseError::ConnectionFailed { source: e }.into());
                }

                log::warn!(
                    "Database connection attempt {} failed: {}, retrying in {:?}",
                    attempt,
                    e,
                    retry_delay
                );

                sleep(retry_delay).await;
                retry_delay *= 2;
            }
        }
    }

    unreachable!("retry loop either returns a connection or the final error")
}

/// Health check for the database connection.
pub async fn health_check(db: &DatabaseConnection) -> Result<()> {
    use sea_orm::Statement;

    let stmt = Statement::from_string(db.get_database_backend(), "SELECT 1".to_string());

    db.query_one(stmt)
        .await
        .context("Database health check failed")?;

    Ok(())
}

/// Rolls a transaction back, logging rollback failures instead of
/// surfacing them so the error that caused the abort stays the one
/// reported.
pub async fn rollback(txn: DatabaseTransaction) {
    if let Err(err) = txn.rollback().await {
        tracing::warn!(error = %err, "failed to roll back transaction");
    }
}

/// A unique index participating in duplicate-key translation: the database
/// column it guards and the API-facing field name it maps to.
#[derive(Debug, Clone, Copy)]
pub struct UniqueFieldSpec {
    pub column: &'static str,
    pub field: &'static str,
}

/// Whether a storage error is a unique-constraint violation, across the
/// Postgres and SQLite backends this service runs on.
pub fn is_unique_violation(error: &DbErr) -> bool {
    const PG_UNIQUE: &str = "23505";
    const SQLITE_DUPLICATE_CODES: &[&str] = &["1555", "2067"];

    let sqlx_err = match error {
        DbErr::Query(RuntimeErr::SqlxError(sqlx_err))
        | DbErr::Exec(RuntimeErr::SqlxError(sqlx_err)) => sqlx_err,
        _ => return false,
    };

    let Some(db_error) = sqlx_err.as_database_error() else {
        return false;
    };

    if db_error.is_unique_violation() {
        return true;
    }

    matches!(
        db_error.code().as_deref(),
        Some(code) if code == PG_UNIQUE || SQLITE_DUPLICATE_CODES.contains(&code)
    )
}

/// Translates a duplicate-key failure into [`DomainError::UniqueField`]
/// naming the conflicting entity field. Every other error, and violations
/// of indexes not listed in `unique_fields`, pass through unchanged.
pub fn translate_unique_violation(
    error: DomainError,
    entity: &'static str,
    unique_fields: &[UniqueFieldSpec],
) -> DomainError {
    match error {
        DomainError::Database(db_err) if is_unique_violation(&db_err) => {
            let detail = violation_detail(&db_err);
            match unique_fields.iter().find(|uf| detail.contains(uf.column)) {
                Some(uf) => DomainError::UniqueField {
                    entity,
                    field: uf.field,
                },
                None => DomainError::Database(db_err),
            }
        }
        other => other,
    }
}

/// Text the violated column can be recognized in: the constraint name when
/// the driver exposes one (Postgres) plus the raw message (SQLite names the
/// columns there).
fn violation_detail(error: &DbErr) -> String {
    let mut detail = error.to_string().to_lowercase();

    if let DbErr::Query(RuntimeErr::SqlxError(sqlx_err))
    | DbErr::Exec(RuntimeErr::SqlxError(sqlx_err)) = error
        && let Some(db_error) = sqlx_err.as_database_error()
        && let Some(constraint) = db_error.constraint()
    {
        detail.push(' ');
        detail.push_str(&constraint.to_lowercase());
    }

    detail
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[UniqueFieldSpec] = &[
        UniqueFieldSpec {
            column: "slug",
            field: "slug",
        },
        UniqueFieldSpec {
            column: "import_hash",
            field: "importHash",
        },
    ];

    #[test]
    fn non_database_errors_pass_through() {
        let err = translate_unique_violation(DomainError::NotFound, "category", FIELDS);
        assert!(matches!(err, DomainError::NotFound));
    }

    #[test]
    fn non_unique_database_errors_pass_through() {
        let err = translate_unique_violation(
            DomainError::Database(DbErr::Custom("boom".to_string())),
            "category",
            FIELDS,
        );
        assert!(matches!(err, DomainError::Database(_)));
    }

    #[test]
    fn empty_database_url_is_rejected() {
        let config = AppConfig {
            database_url: String::new(),
            ..AppConfig::default()
        };

        let rt = tokio::runtime::Runtime::new().unwrap();
        let result = rt.block_on(init_pool(&config));

        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err().downcast::<DatabaseError>(),
            Ok(DatabaseError::InvalidConfiguration { .. })
        ));
    }
}
