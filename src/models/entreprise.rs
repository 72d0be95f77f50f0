//! Entreprise entity model
//!
//! This module contains the SeaORM entity model for the entreprise table.
//! An entreprise groups utilisateurs and gates registration through its
//! `code_entreprise` join code.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "entreprise")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Display name of the company
    pub nom: String,

    pub telephone: String,

    /// Short join code required at registration (unique)
    pub code_entreprise: String,

    /// Owned address row (one-to-one, required)
    pub adresse_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::adresse::Entity",
        from = "Column::AdresseId",
        to = "super::adresse::Column::Id"
    )]
    Adresse,
    #[sea_orm(has_many = "super::utilisateur::Entity")]
    Utilisateur,
}

impl Related<super::adresse::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Adresse.def()
    }
}

impl Related<super::utilisateur::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Utilisateur.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
