//! Category service.
//!
//! Every mutation runs inside one transaction: begin, delegate to the
//! repository, commit on success. On any error the transaction is rolled
//! back first, then duplicate-key failures are translated into field-level
//! validation errors; everything else is rethrown untouched. Reads go
//! straight to the pool.

use std::sync::Arc;

use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::context::RequestContext;
use crate::db;
use crate::error::DomainError;
use crate::repositories::category::{
    AutocompleteItem, CategoryFilter, CategoryInput, CategoryListParams, CategoryPage,
    CategoryRecord, CategoryRepository, ENTITY_NAME, UNIQUE_FIELDS,
};

/// Use-case operations for categories, exposed to the HTTP layer.
pub struct CategoryService {
    db: DatabaseConnection,
    config: Arc<AppConfig>,
}

impl CategoryService {
    pub fn new(db: DatabaseConnection, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: CategoryInput,
    ) -> Result<CategoryRecord, DomainError> {
        let txn = self.db.begin().await?;

        let created = CategoryRepository::new(&txn, &self.config)
            .create(ctx, &input)
            .await;

        match created {
            Ok(record) => {
                txn.commit().await?;
                Ok(record)
            }
            Err(err) => {
                db::rollback(txn).await;
                Err(db::translate_unique_violation(err, ENTITY_NAME, UNIQUE_FIELDS))
            }
        }
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        input: CategoryInput,
    ) -> Result<CategoryRecord, DomainError> {
        let txn = self.db.begin().await?;

        let updated = CategoryRepository::new(&txn, &self.config)
            .update(ctx, id, &input)
            .await;

        match updated {
            Ok(record) => {
                txn.commit().await?;
                Ok(record)
            }
            Err(err) => {
                db::rollback(txn).await;
                Err(db::translate_unique_violation(err, ENTITY_NAME, UNIQUE_FIELDS))
            }
        }
    }

    /// Destroys the given records as one all-or-nothing batch: ids are
    /// processed sequentially inside a single transaction, and the first
    /// failure rolls the whole batch back, leaving no partial deletion.
    pub async fn destroy_all(
        &self,
        ctx: &RequestContext,
        ids: &[Uuid],
    ) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;

        let result = async {
            let repo = CategoryRepository::new(&txn, &self.config);
            for id in ids {
                repo.destroy(ctx, *id).await?;
            }
            Ok::<_, DomainError>(())
        }
        .await;

        match result {
            Ok(()) => {
                txn.commit().await?;
                Ok(())
            }
            Err(err) => {
                db::rollback(txn).await;
                Err(err)
            }
        }
    }

    pub async fn find_by_id(
        &self,
        ctx: &RequestContext,
        id: Uuid,
    ) -> Result<CategoryRecord, DomainError> {
        CategoryRepository::new(&self.db, &self.config)
            .find_by_id(ctx, id)
            .await
    }

    pub async fn find_and_count_all(
        &self,
        ctx: &RequestContext,
        params: CategoryListParams,
    ) -> Result<CategoryPage, DomainError> {
        CategoryRepository::new(&self.db, &self.config)
            .find_and_count_all(ctx, &params)
            .await
    }

    pub async fn find_all_autocomplete(
        &self,
        ctx: &RequestContext,
        search: Option<&str>,
        limit: Option<u64>,
    ) -> Result<Vec<AutocompleteItem>, DomainError> {
        CategoryRepository::new(&self.db, &self.config)
            .find_all_autocomplete(ctx, search, limit)
            .await
    }

    /// Public contact listing; see the repository's caveat on tenant
    /// scoping.
    pub async fn find_cs(&self) -> Result<Vec<CategoryRecord>, DomainError> {
        CategoryRepository::new(&self.db, &self.config)
            .find_cs()
            .await
    }

    /// Public contact-number lookup.
    pub async fn find_contact(&self) -> Result<String, DomainError> {
        CategoryRepository::new(&self.db, &self.config)
            .find_contact()
            .await
    }

    /// Idempotent import: the caller-supplied hash is required and must not
    /// have been used by this tenant before; only then does the create run.
    pub async fn import(
        &self,
        ctx: &RequestContext,
        data: CategoryInput,
        import_hash: Option<String>,
    ) -> Result<CategoryRecord, DomainError> {
        let Some(import_hash) = import_hash
            .map(|hash| hash.trim().to_string())
            .filter(|hash| !hash.is_empty())
        else {
            return Err(DomainError::validation(
                "importer.errors.importHashRequired",
            ));
        };

        if self.is_import_hash_existent(ctx, &import_hash).await? {
            return Err(DomainError::validation(
                "importer.errors.importHashExistent",
            ));
        }

        let mut data = data;
        data.import_hash = Some(import_hash);
        self.create(ctx, data).await
    }

    async fn is_import_hash_existent(
        &self,
        ctx: &RequestContext,
        import_hash: &str,
    ) -> Result<bool, DomainError> {
        let filter = CategoryFilter {
            import_hash: Some(import_hash.to_string()),
            ..CategoryFilter::default()
        };

        let count = CategoryRepository::new(&self.db, &self.config)
            .count(ctx, &filter)
            .await?;

        Ok(count > 0)
    }
}
