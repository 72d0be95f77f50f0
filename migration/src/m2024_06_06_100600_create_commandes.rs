//! Migration to create the commande table and its plat line table.
//!
//! commande_plat carries its own surrogate key: the same plat may appear
//! several times in one commande, each occurrence being its own line row.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Commande::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Commande::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Commande::DateCommande)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Commande::Etat).string().not_null())
                    .col(ColumnDef::new(Commande::Quantite).integer().not_null())
                    .col(ColumnDef::new(Commande::Note).string().not_null())
                    .col(
                        ColumnDef::new(Commande::DateAvis)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Commande::Commentaire).string().not_null())
                    .col(
                        ColumnDef::new(Commande::UtilisateurId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_commande_utilisateur_id")
                            .from(Commande::Table, Commande::UtilisateurId)
                            .to(Utilisateur::Table, Utilisateur::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CommandePlat::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CommandePlat::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CommandePlat::CommandeId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CommandePlat::PlatId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_commande_plat_commande_id")
                            .from(CommandePlat::Table, CommandePlat::CommandeId)
                            .to(Commande::Table, Commande::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_commande_plat_plat_id")
                            .from(CommandePlat::Table, CommandePlat::PlatId)
                            .to(Plat::Table, Plat::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_commande_plat_commande_id")
                    .table(CommandePlat::Table)
                    .col(CommandePlat::CommandeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_commande_plat_commande_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(CommandePlat::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Commande::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Commande {
    Table,
    Id,
    DateCommande,
    Etat,
    Quantite,
    Note,
    DateAvis,
    Commentaire,
    UtilisateurId,
}

#[derive(DeriveIden)]
enum CommandePlat {
    Table,
    Id,
    CommandeId,
    PlatId,
}

#[derive(DeriveIden)]
enum Utilisateur {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Plat {
    Table,
    Id,
}
