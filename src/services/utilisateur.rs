//! # Utilisateur Service
//!
//! Read helpers over the utilisateur aggregate, currently the allergy
//! name lookup feeding the filtered plat listing.

use sea_orm::{DatabaseConnection, ModelTrait};
use thiserror::Error;

use crate::error::RepositoryError;
use crate::models::Allergene;
use crate::repositories::UtilisateurRepository;

/// Errors surfaced by the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("User not found")]
    UserNotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Service composing utilisateur repository reads
pub struct UtilisateurService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UtilisateurService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Names of the allergenes associated with the given utilisateur.
    ///
    /// Pure read; fails with [`ServiceError::UserNotFound`] when the id
    /// does not resolve. The caller decides how to surface that (the plat
    /// listing maps it to a request-level error, not a server fault).
    pub async fn user_allergy_names(&self, user_id: i32) -> Result<Vec<String>, ServiceError> {
        let user = UtilisateurRepository::new(self.db)
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::UserNotFound)?;

        let allergenes = user.find_related(Allergene).all(self.db).await?;

        Ok(allergenes.into_iter().map(|a| a.nom).collect())
    }
}
