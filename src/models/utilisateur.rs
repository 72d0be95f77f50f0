//! Utilisateur entity model
//!
//! This module contains the SeaORM entity model for the utilisateur table.
//! The `password` column stores a PBKDF2 hash and is never serialized;
//! response projections are built explicitly by the handlers.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "utilisateur")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub nom: String,

    pub prenom: String,

    /// Login identifier (unique index enforced by the store)
    pub email: String,

    /// PBKDF2 password hash, `pbkdf2:sha256:<iterations>$<salt>$<hash>`
    pub password: String,

    pub date_de_naissance: Date,

    pub telephone: String,

    /// Role strings stored as a JSON array
    #[sea_orm(column_type = "JsonBinary")]
    pub roles: JsonValue,

    pub entreprise_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::entreprise::Entity",
        from = "Column::EntrepriseId",
        to = "super::entreprise::Column::Id"
    )]
    Entreprise,
    #[sea_orm(has_many = "super::commande::Entity")]
    Commande,
}

impl Related<super::entreprise::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entreprise.def()
    }
}

impl Related<super::commande::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commande.def()
    }
}

impl Related<super::allergene::Entity> for Entity {
    fn to() -> RelationDef {
        super::utilisateur_allergene::Relation::Allergene.def()
    }

    fn via() -> Option<RelationDef> {
        Some(
            super::utilisateur_allergene::Relation::Utilisateur
                .def()
                .rev(),
        )
    }
}

impl ActiveModelBehavior for ActiveModel {}
