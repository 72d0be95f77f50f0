//! Commande entity model
//!
//! This module contains the SeaORM entity model for the commande table.
//! A commande is owned by exactly one utilisateur, set at creation and
//! never reassigned; its plats are line rows in commande_plat.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "commande")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub date_commande: DateTimeWithTimeZone,

    /// Order status, "En cours" at creation
    pub etat: String,

    pub quantite: i32,

    pub note: String,

    /// Set when the utilisateur leaves a review
    pub date_avis: Option<DateTimeWithTimeZone>,

    pub commentaire: String,

    pub utilisateur_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::utilisateur::Entity",
        from = "Column::UtilisateurId",
        to = "super::utilisateur::Column::Id"
    )]
    Utilisateur,
    #[sea_orm(has_many = "super::commande_plat::Entity")]
    CommandePlat,
}

impl Related<super::utilisateur::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Utilisateur.def()
    }
}

impl Related<super::commande_plat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CommandePlat.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
