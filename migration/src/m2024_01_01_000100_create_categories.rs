//! Migration to create the categories table.
//!
//! Categories are tenant-scoped admin records; a couple of them double as
//! the contact entries served on the public contact page. Uniqueness of
//! `slug` and `import_hash` is enforced per tenant.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Categories::Name).text().not_null())
                    .col(ColumnDef::new(Categories::Slug).text().null())
                    .col(ColumnDef::new(Categories::MetaKeywords).text().null())
                    .col(ColumnDef::new(Categories::MetaDescriptions).text().null())
                    .col(ColumnDef::new(Categories::Number).text().null())
                    .col(ColumnDef::new(Categories::Status).text().null())
                    .col(
                        ColumnDef::new(Categories::IsFeature)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Categories::Photo).json_binary().null())
                    .col(ColumnDef::new(Categories::ImportHash).text().null())
                    .col(ColumnDef::new(Categories::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(Categories::UpdatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(Categories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Categories::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_categories_tenant_id")
                            .from(Categories::Table, Categories::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index on tenant_id for tenant isolation queries
        manager
            .create_index(
                Index::create()
                    .name("idx_categories_tenant_id")
                    .table(Categories::Table)
                    .col(Categories::TenantId)
                    .to_owned(),
            )
            .await?;

        // Unique per tenant; duplicate-key errors on these indexes are
        // translated into field-level validation errors.
        manager
            .create_index(
                Index::create()
                    .name("idx_categories_tenant_slug")
                    .table(Categories::Table)
                    .col(Categories::TenantId)
                    .col(Categories::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_categories_tenant_import_hash")
                    .table(Categories::Table)
                    .col(Categories::TenantId)
                    .col(Categories::ImportHash)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_categories_tenant_import_hash")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name("idx_categories_tenant_slug").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_categories_tenant_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    TenantId,
    Name,
    Slug,
    MetaKeywords,
    MetaDescriptions,
    Number,
    Status,
    IsFeature,
    Photo,
    ImportHash,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
}
