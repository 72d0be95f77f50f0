//! # Plat Repository
//!
//! Repository for the plat catalog, including the allergen-exclusion /
//! category-inclusion filter backing `GET /api/plat/filtered`.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, ModelTrait,
    QueryFilter, QuerySelect, RelationTrait, Set, TransactionTrait,
};

use crate::error::RepositoryError;
use crate::models::allergene;
use crate::models::plat::{
    self, ActiveModel as PlatActiveModel, Column, Entity as Plat, Model as PlatModel,
};
use crate::models::plat_allergene::{self, ActiveModel as PlatAllergeneActiveModel};
use crate::models::{categorie, Allergene, PlatAllergene};

/// Request data for creating a new plat
#[derive(Debug, Clone)]
pub struct CreatePlatRequest {
    pub nom: String,
    pub image: Option<String>,
    pub ingredients: Option<serde_json::Value>,
    pub date_disponibilite: chrono::NaiveDate,
    pub categorie_id: i32,
    pub allergene_ids: Vec<i32>,
}

/// Repository for plat database operations
pub struct PlatRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PlatRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get a plat by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<PlatModel>, RepositoryError> {
        let plat = Plat::find_by_id(id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(plat)
    }

    /// List plats available on the given date
    pub async fn find_by_date(
        &self,
        date: chrono::NaiveDate,
    ) -> Result<Vec<PlatModel>, RepositoryError> {
        let plats = Plat::find()
            .filter(Column::DateDisponibilite.eq(date))
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(plats)
    }

    /// Plats matching the allergen-exclusion and category-inclusion filter.
    ///
    /// A plat qualifies iff it carries no allergene whose name is in
    /// `allergies` (plats with no allergene always pass) and its categorie
    /// name is in `categories`. Two explicit queries: first the ids of
    /// plats carrying an excluded allergene, then the category-filtered
    /// listing without them.
    pub async fn find_filtered(
        &self,
        allergies: &[String],
        categories: &[String],
    ) -> Result<Vec<PlatModel>, RepositoryError> {
        let excluded_ids: Vec<i32> = if allergies.is_empty() {
            Vec::new()
        } else {
            PlatAllergene::find()
                .select_only()
                .column(plat_allergene::Column::PlatId)
                .distinct()
                .join(
                    JoinType::InnerJoin,
                    plat_allergene::Relation::Allergene.def(),
                )
                .filter(allergene::Column::Nom.is_in(allergies.iter().cloned()))
                .into_tuple()
                .all(self.db)
                .await
                .map_err(RepositoryError::database_error)?
        };

        let mut query = Plat::find()
            .join(JoinType::InnerJoin, plat::Relation::Categorie.def())
            .filter(categorie::Column::Nom.is_in(categories.iter().cloned()));

        if !excluded_ids.is_empty() {
            query = query.filter(Column::Id.is_not_in(excluded_ids));
        }

        let plats = query
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(plats)
    }

    /// Load the allergenes carried by a plat
    pub async fn allergenes_for(
        &self,
        plat: &PlatModel,
    ) -> Result<Vec<allergene::Model>, RepositoryError> {
        let allergenes = plat
            .find_related(Allergene)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(allergenes)
    }

    /// Create a plat together with its allergene joins in one transaction.
    pub async fn create(&self, request: CreatePlatRequest) -> Result<PlatModel, RepositoryError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(RepositoryError::database_error)?;

        let plat = PlatActiveModel {
            nom: Set(request.nom),
            image: Set(request.image),
            ingredients: Set(request.ingredients),
            date_disponibilite: Set(request.date_disponibilite),
            categorie_id: Set(request.categorie_id),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(RepositoryError::database_error)?;

        if !request.allergene_ids.is_empty() {
            let joins = request
                .allergene_ids
                .iter()
                .map(|allergene_id| PlatAllergeneActiveModel {
                    plat_id: Set(plat.id),
                    allergene_id: Set(*allergene_id),
                });

            PlatAllergene::insert_many(joins)
                .exec(&txn)
                .await
                .map_err(RepositoryError::database_error)?;
        }

        txn.commit()
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(plat)
    }
}
