//! Migration to create the entreprise table.
//!
//! This migration creates the entreprise table which groups utilisateurs
//! and gates registration through a short join code.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Entreprise::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Entreprise::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Entreprise::Nom).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Entreprise::Telephone)
                            .string_len(13)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Entreprise::CodeEntreprise)
                            .string_len(5)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Entreprise::AdresseId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_entreprise_adresse_id")
                            .from(Entreprise::Table, Entreprise::AdresseId)
                            .to(Adresse::Table, Adresse::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Join codes are the registration lookup key and must be unambiguous.
        manager
            .create_index(
                Index::create()
                    .name("idx_entreprise_code_entreprise")
                    .table(Entreprise::Table)
                    .col(Entreprise::CodeEntreprise)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One adresse belongs to exactly one entreprise.
        manager
            .create_index(
                Index::create()
                    .name("idx_entreprise_adresse_id")
                    .table(Entreprise::Table)
                    .col(Entreprise::AdresseId)
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
                    .name("idx_entreprise_code_entreprise")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name("idx_entreprise_adresse_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Entreprise::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Entreprise {
    Table,
    Id,
    Nom,
    Telephone,
    CodeEntreprise,
    AdresseId,
}

#[derive(DeriveIden)]
enum Adresse {
    Table,
    Id,
}
