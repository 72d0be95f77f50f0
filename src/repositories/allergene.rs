//! # Allergene Repository

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::error::RepositoryError;
use crate::models::allergene::{
    ActiveModel as AllergeneActiveModel, Column, Entity as Allergene, Model as AllergeneModel,
};

/// Repository for allergene database operations
pub struct AllergeneRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AllergeneRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get an allergene by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<AllergeneModel>, RepositoryError> {
        let allergene = Allergene::find_by_id(id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(allergene)
    }

    /// List all allergenes
    pub async fn find_all(&self) -> Result<Vec<AllergeneModel>, RepositoryError> {
        let allergenes = Allergene::find()
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(allergenes)
    }

    /// Resolve the subset of the given ids that exist.
    ///
    /// Unknown ids are simply absent from the result; registration skips
    /// them rather than failing.
    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<AllergeneModel>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let allergenes = Allergene::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(allergenes)
    }

    /// Create a new allergene
    pub async fn create(&self, nom: &str) -> Result<AllergeneModel, RepositoryError> {
        let allergene = AllergeneActiveModel {
            nom: Set(nom.to_string()),
            ..Default::default()
        }
        .insert(self.db)
        .await
        .map_err(RepositoryError::database_error)?;

        Ok(allergene)
    }
}
