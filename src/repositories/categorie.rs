//! # Categorie Repository

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::error::RepositoryError;
use crate::models::categorie::{
    ActiveModel as CategorieActiveModel, Column, Entity as Categorie, Model as CategorieModel,
};

/// Repository for categorie database operations
pub struct CategorieRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CategorieRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get a categorie by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<CategorieModel>, RepositoryError> {
        let categorie = Categorie::find_by_id(id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(categorie)
    }

    /// Get a categorie by name
    pub async fn find_by_nom(&self, nom: &str) -> Result<Option<CategorieModel>, RepositoryError> {
        let categorie = Categorie::find()
            .filter(Column::Nom.eq(nom))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(categorie)
    }

    /// List all categories
    pub async fn find_all(&self) -> Result<Vec<CategorieModel>, RepositoryError> {
        let categories = Categorie::find()
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(categories)
    }

    /// Create a new categorie
    pub async fn create(&self, nom: &str) -> Result<CategorieModel, RepositoryError> {
        let categorie = CategorieActiveModel {
            nom: Set(nom.to_string()),
            ..Default::default()
        }
        .insert(self.db)
        .await
        .map_err(RepositoryError::database_error)?;

        Ok(categorie)
    }
}
