//! Categorie entity model

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categorie")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub nom: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::plat::Entity")]
    Plat,
}

impl Related<super::plat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plat.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
