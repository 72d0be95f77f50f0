//! Allergene entity model
//!
//! Allergen tag shared by utilisateurs (what they must avoid) and plats
//! (what they contain). Used purely as an exclusion filter set.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "allergene")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub nom: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::utilisateur::Entity> for Entity {
    fn to() -> RelationDef {
        super::utilisateur_allergene::Relation::Utilisateur.def()
    }

    fn via() -> Option<RelationDef> {
        Some(
            super::utilisateur_allergene::Relation::Allergene
                .def()
                .rev(),
        )
    }
}

impl Related<super::plat::Entity> for Entity {
    fn to() -> RelationDef {
        super::plat_allergene::Relation::Plat.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::plat_allergene::Relation::Allergene.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
