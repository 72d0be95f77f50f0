//! Migration to create the utilisateur table and its allergene join table.
//!
//! Email uniqueness is enforced here by the store rather than by
//! application logic.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Utilisateur::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Utilisateur::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Utilisateur::Nom).string().not_null())
                    .col(ColumnDef::new(Utilisateur::Prenom).string().not_null())
                    .col(ColumnDef::new(Utilisateur::Email).string().not_null())
                    .col(ColumnDef::new(Utilisateur::Password).string().not_null())
                    .col(
                        ColumnDef::new(Utilisateur::DateDeNaissance)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Utilisateur::Telephone).string().not_null())
                    .col(ColumnDef::new(Utilisateur::Roles).json_binary().not_null())
                    .col(
                        ColumnDef::new(Utilisateur::EntrepriseId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_utilisateur_entreprise_id")
                            .from(Utilisateur::Table, Utilisateur::EntrepriseId)
                            .to(Entreprise::Table, Entreprise::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_utilisateur_email")
                    .table(Utilisateur::Table)
                    .col(Utilisateur::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UtilisateurAllergene::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UtilisateurAllergene::UtilisateurId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UtilisateurAllergene::AllergeneId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(UtilisateurAllergene::UtilisateurId)
                            .col(UtilisateurAllergene::AllergeneId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_utilisateur_allergene_utilisateur_id")
                            .from(
                                UtilisateurAllergene::Table,
                                UtilisateurAllergene::UtilisateurId,
                            )
                            .to(Utilisateur::Table, Utilisateur::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_utilisateur_allergene_allergene_id")
                            .from(
                                UtilisateurAllergene::Table,
                                UtilisateurAllergene::AllergeneId,
                            )
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
            .drop_table(
                Table::drop()
                    .table(UtilisateurAllergene::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name("idx_utilisateur_email").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Utilisateur::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Utilisateur {
    Table,
    Id,
    Nom,
    Prenom,
    Email,
    Password,
    DateDeNaissance,
    Telephone,
    Roles,
    EntrepriseId,
}

#[derive(DeriveIden)]
enum UtilisateurAllergene {
    Table,
    UtilisateurId,
    AllergeneId,
}

#[derive(DeriveIden)]
enum Entreprise {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Allergene {
    Table,
    Id,
}
