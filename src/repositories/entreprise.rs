//! # Entreprise Repository
//!
//! Repository for entreprise rows and their owned adresse. The
//! `code_entreprise` lookup is the registration gate: a code that does not
//! resolve rejects the registration upstream.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

use crate::error::RepositoryError;
use crate::models::adresse::{self, ActiveModel as AdresseActiveModel};
use crate::models::entreprise::{
    ActiveModel as EntrepriseActiveModel, Column, Entity as Entreprise, Model as EntrepriseModel,
};

/// Request data for creating a new entreprise with its adresse
#[derive(Debug, Clone)]
pub struct CreateEntrepriseRequest {
    pub nom: String,
    pub telephone: String,
    pub code_entreprise: String,
    pub rue: Option<String>,
    pub ville: Option<String>,
    pub pays: Option<String>,
}

/// Repository for entreprise database operations
pub struct EntrepriseRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> EntrepriseRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get an entreprise by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<EntrepriseModel>, RepositoryError> {
        let entreprise = Entreprise::find_by_id(id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(entreprise)
    }

    /// Resolve an entreprise by its join code.
    ///
    /// The unique index on `code_entreprise` guarantees at most one row.
    pub async fn find_by_code(
        &self,
        code_entreprise: &str,
    ) -> Result<Option<EntrepriseModel>, RepositoryError> {
        let entreprise = Entreprise::find()
            .filter(Column::CodeEntreprise.eq(code_entreprise))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(entreprise)
    }

    /// Create an entreprise together with its adresse in one transaction.
    pub async fn create(
        &self,
        request: CreateEntrepriseRequest,
    ) -> Result<EntrepriseModel, RepositoryError> {
        if request.code_entreprise.trim().is_empty() {
            return Err(RepositoryError::validation_error(
                "Entreprise code cannot be empty",
            ));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(RepositoryError::database_error)?;

        let adresse = AdresseActiveModel {
            rue: Set(request.rue),
            ville: Set(request.ville),
            pays: Set(request.pays),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(RepositoryError::database_error)?;

        let entreprise = EntrepriseActiveModel {
            nom: Set(request.nom),
            telephone: Set(request.telephone),
            code_entreprise: Set(request.code_entreprise),
            adresse_id: Set(adresse.id),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(RepositoryError::database_error)?;

        txn.commit()
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(entreprise)
    }

    /// Load the adresse owned by an entreprise
    pub async fn adresse_for(
        &self,
        entreprise: &EntrepriseModel,
    ) -> Result<Option<adresse::Model>, RepositoryError> {
        let adresse = adresse::Entity::find_by_id(entreprise.adresse_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(adresse)
    }
}
