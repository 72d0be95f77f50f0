//! Line rows joining commande and plat.
//!
//! Unlike the other join tables this one has a surrogate key: the same
//! plat may appear several times in one commande, one row per occurrence.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "commande_plat")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub commande_id: i32,

    pub plat_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::commande::Entity",
        from = "Column::CommandeId",
        to = "super::commande::Column::Id"
    )]
    Commande,
    #[sea_orm(
        belongs_to = "super::plat::Entity",
        from = "Column::PlatId",
        to = "super::plat::Column::Id"
    )]
    Plat,
}

impl Related<super::commande::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commande.def()
    }
}

impl Related<super::plat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plat.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
