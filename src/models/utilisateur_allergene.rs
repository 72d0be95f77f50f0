//! Join table between utilisateur and allergene.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "utilisateur_allergene")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub utilisateur_id: i32,

    #[sea_orm(primary_key, auto_increment = false)]
    pub allergene_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::utilisateur::Entity",
        from = "Column::UtilisateurId",
        to = "super::utilisateur::Column::Id"
    )]
    Utilisateur,
    #[sea_orm(
        belongs_to = "super::allergene::Entity",
        from = "Column::AllergeneId",
        to = "super::allergene::Column::Id"
    )]
    Allergene,
}

impl ActiveModelBehavior for ActiveModel {}
