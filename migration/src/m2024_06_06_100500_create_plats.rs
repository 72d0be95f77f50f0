//! Migration to create the plat table and its allergene join table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Plat::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Plat::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Plat::Nom).string().not_null())
                    .col(ColumnDef::new(Plat::Image).string_len(255).null())
                    .col(ColumnDef::new(Plat::Ingredients).json_binary().null())
                    .col(ColumnDef::new(Plat::DateDisponibilite).date().not_null())
                    .col(ColumnDef::new(Plat::CategorieId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_plat_categorie_id")
                            .from(Plat::Table, Plat::CategorieId)
                            .to(Categorie::Table, Categorie::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_plat_date_disponibilite")
                    .table(Plat::Table)
                    .col(Plat::DateDisponibilite)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PlatAllergene::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PlatAllergene::PlatId).integer().not_null())
                    .col(
                        ColumnDef::new(PlatAllergene::AllergeneId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(PlatAllergene::PlatId)
                            .col(PlatAllergene::AllergeneId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_plat_allergene_plat_id")
                            .from(PlatAllergene::Table, PlatAllergene::PlatId)
                            .to(Plat::Table, Plat::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_plat_allergene_allergene_id")
                            .from(PlatAllergene::Table, PlatAllergene::AllergeneId)
                            .to(Allergene::Table, Allergene::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PlatAllergene::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_plat_date_disponibilite")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Plat::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Plat {
    Table,
    Id,
    Nom,
    Image,
    Ingredients,
    DateDisponibilite,
    CategorieId,
}

#[derive(DeriveIden)]
enum PlatAllergene {
    Table,
    PlatId,
    AllergeneId,
}

#[derive(DeriveIden)]
enum Categorie {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Allergene {
    Table,
    Id,
}
