//! Migration to create the adresse table.
//!
//! This migration creates the adresse table holding the postal address
//! owned by an entreprise. All fields are free text and optional.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Adresse::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Adresse::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Adresse::Rue).string_len(50).null())
                    .col(ColumnDef::new(Adresse::Ville).string_len(50).null())
                    .col(ColumnDef::new(Adresse::Pays).string_len(20).null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Adresse::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Adresse {
    Table,
    Id,
    Rue,
    Ville,
    Pays,
}
