//! Adresse entity model
//!
//! Postal address owned by exactly one entreprise. All fields are free
//! text and optional.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "adresse")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub rue: Option<String>,

    pub ville: Option<String>,

    pub pays: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::entreprise::Entity")]
    Entreprise,
}

impl Related<super::entreprise::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entreprise.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
