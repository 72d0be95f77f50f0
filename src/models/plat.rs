//! Plat entity model
//!
//! This module contains the SeaORM entity model for the plat table. A
//! plat belongs to one categorie and carries a set of allergenes through
//! the plat_allergene join table.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "plat")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub nom: String,

    pub image: Option<String>,

    /// Structured ingredient list stored as a JSON array
    #[sea_orm(column_type = "JsonBinary")]
    pub ingredients: Option<JsonValue>,

    /// Day this plat is on the menu
    pub date_disponibilite: Date,

    pub categorie_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categorie::Entity",
        from = "Column::CategorieId",
        to = "super::categorie::Column::Id"
    )]
    Categorie,
}

impl Related<super::categorie::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categorie.def()
    }
}

impl Related<super::allergene::Entity> for Entity {
    fn to() -> RelationDef {
        super::plat_allergene::Relation::Allergene.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::plat_allergene::Relation::Plat.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
