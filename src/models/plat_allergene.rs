//! Join table between plat and allergene.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "plat_allergene")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub plat_id: i32,

    #[sea_orm(primary_key, auto_increment = false)]
    pub allergene_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plat::Entity",
        from = "Column::PlatId",
        to = "super::plat::Column::Id"
    )]
    Plat,
    #[sea_orm(
        belongs_to = "super::allergene::Entity",
        from = "Column::AllergeneId",
        to = "super::allergene::Column::Id"
    )]
    Allergene,
}

impl ActiveModelBehavior for ActiveModel {}
