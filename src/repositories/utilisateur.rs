//! # Utilisateur Repository
//!
//! Repository for utilisateur rows, their allergene joins and password
//! upgrades. Callers hand over an already-hashed password; plaintext never
//! reaches this layer.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set, TransactionTrait,
};

use crate::error::RepositoryError;
use crate::models::utilisateur::{
    ActiveModel as UtilisateurActiveModel, Column, Entity as Utilisateur, Model as UtilisateurModel,
};
use crate::models::utilisateur_allergene::ActiveModel as UtilisateurAllergeneActiveModel;
use crate::models::UtilisateurAllergene;

/// Request data for creating a new utilisateur
#[derive(Debug, Clone)]
pub struct CreateUtilisateurRequest {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    /// PBKDF2 hash, produced by [`crate::password::hash_password`]
    pub password_hash: String,
    pub date_de_naissance: chrono::NaiveDate,
    pub telephone: String,
    pub roles: serde_json::Value,
    pub entreprise_id: i32,
    /// Already-resolved allergene ids to attach
    pub allergene_ids: Vec<i32>,
}

/// Request data for updating an utilisateur profile
#[derive(Debug, Clone)]
pub struct UpdateUtilisateurRequest {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub date_de_naissance: chrono::NaiveDate,
    pub telephone: String,
    pub roles: serde_json::Value,
    pub entreprise_id: i32,
}

/// Repository for utilisateur database operations
pub struct UtilisateurRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UtilisateurRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get an utilisateur by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<UtilisateurModel>, RepositoryError> {
        let user = Utilisateur::find_by_id(id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(user)
    }

    /// Get an utilisateur by email
    pub async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UtilisateurModel>, RepositoryError> {
        let user = Utilisateur::find()
            .filter(Column::Email.eq(email))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(user)
    }

    /// Create an utilisateur together with its allergene joins in one
    /// transaction.
    pub async fn create(
        &self,
        request: CreateUtilisateurRequest,
    ) -> Result<UtilisateurModel, RepositoryError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(RepositoryError::database_error)?;

        let user = UtilisateurActiveModel {
            nom: Set(request.nom),
            prenom: Set(request.prenom),
            email: Set(request.email),
            password: Set(request.password_hash),
            date_de_naissance: Set(request.date_de_naissance),
            telephone: Set(request.telephone),
            roles: Set(request.roles),
            entreprise_id: Set(request.entreprise_id),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(RepositoryError::database_error)?;

        if !request.allergene_ids.is_empty() {
            let joins = request
                .allergene_ids
                .iter()
                .map(|allergene_id| UtilisateurAllergeneActiveModel {
                    utilisateur_id: Set(user.id),
                    allergene_id: Set(*allergene_id),
                });

            UtilisateurAllergene::insert_many(joins)
                .exec(&txn)
                .await
                .map_err(RepositoryError::database_error)?;
        }

        txn.commit()
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(user)
    }

    /// Update profile fields of an existing utilisateur
    pub async fn update(
        &self,
        id: i32,
        request: UpdateUtilisateurRequest,
    ) -> Result<UtilisateurModel, RepositoryError> {
        let user = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("User not found".to_string()))?;

        let mut active = user.into_active_model();
        active.nom = Set(request.nom);
        active.prenom = Set(request.prenom);
        active.email = Set(request.email);
        active.date_de_naissance = Set(request.date_de_naissance);
        active.telephone = Set(request.telephone);
        active.roles = Set(request.roles);
        active.entreprise_id = Set(request.entreprise_id);

        let updated = active
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(updated)
    }

    /// Replace the stored password hash, e.g. after a transparent rehash
    /// at login.
    pub async fn upgrade_password(
        &self,
        id: i32,
        new_password_hash: String,
    ) -> Result<(), RepositoryError> {
        let user = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("User not found".to_string()))?;

        let mut active = user.into_active_model();
        active.password = Set(new_password_hash);

        active
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{AllergeneRepository, CreateEntrepriseRequest, EntrepriseRepository};
    use migration::MigratorTrait;
    use sea_orm::Database;

    async fn setup_test_db() -> DatabaseConnection {
        // A single connection keeps every query on the same in-memory
        // database.
        let mut options = sea_orm::ConnectOptions::new("sqlite::memory:");
        options.max_connections(1);

        let db = Database::connect(options)
            .await
            .expect("Failed to open in-memory database");
        migration::Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
        db
    }

    async fn seed_entreprise(db: &DatabaseConnection) -> i32 {
        EntrepriseRepository::new(db)
            .create(CreateEntrepriseRequest {
                nom: "Acme".to_string(),
                telephone: "0102030405".to_string(),
                code_entreprise: "AB12C".to_string(),
                rue: Some("1 rue des Lilas".to_string()),
                ville: Some("Lyon".to_string()),
                pays: Some("France".to_string()),
            })
            .await
            .unwrap()
            .id
    }

    fn create_request(entreprise_id: i32, allergene_ids: Vec<i32>) -> CreateUtilisateurRequest {
        CreateUtilisateurRequest {
            nom: "Martin".to_string(),
            prenom: "Alice".to_string(),
            email: "alice.martin@example.com".to_string(),
            password_hash: "pbkdf2:sha256:260000$salt$hash".to_string(),
            date_de_naissance: chrono::NaiveDate::from_ymd_opt(1990, 4, 2).unwrap(),
            telephone: "0601020304".to_string(),
            roles: serde_json::json!(["ROLE_USER"]),
            entreprise_id,
            allergene_ids,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_round_trip() {
        let db = setup_test_db().await;
        let entreprise_id = seed_entreprise(&db).await;

        let repo = UtilisateurRepository::new(&db);
        let created = repo.create(create_request(entreprise_id, vec![])).await.unwrap();

        let fetched = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.nom, "Martin");
        assert_eq!(fetched.prenom, "Alice");
        assert_eq!(fetched.email, "alice.martin@example.com");
        assert_eq!(fetched.telephone, "0601020304");

        let by_email = repo
            .find_by_email("alice.martin@example.com")
            .await
            .unwrap();
        assert_eq!(by_email.unwrap().id, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_by_store() {
        let db = setup_test_db().await;
        let entreprise_id = seed_entreprise(&db).await;

        let repo = UtilisateurRepository::new(&db);
        repo.create(create_request(entreprise_id, vec![]))
            .await
            .unwrap();

        let duplicate = repo.create(create_request(entreprise_id, vec![])).await;
        assert!(matches!(
            duplicate,
            Err(RepositoryError::Database { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_attaches_allergenes() {
        let db = setup_test_db().await;
        let entreprise_id = seed_entreprise(&db).await;

        let allergenes = AllergeneRepository::new(&db);
        let gluten = allergenes.create("Gluten").await.unwrap();
        let lactose = allergenes.create("Lactose").await.unwrap();

        let repo = UtilisateurRepository::new(&db);
        let user = repo
            .create(create_request(entreprise_id, vec![gluten.id, lactose.id]))
            .await
            .unwrap();

        let joins = UtilisateurAllergene::find().all(&db).await.unwrap();
        assert_eq!(joins.len(), 2);
        assert!(joins.iter().all(|j| j.utilisateur_id == user.id));
    }

    #[tokio::test]
    async fn test_upgrade_password() {
        let db = setup_test_db().await;
        let entreprise_id = seed_entreprise(&db).await;

        let repo = UtilisateurRepository::new(&db);
        let user = repo.create(create_request(entreprise_id, vec![])).await.unwrap();

        repo.upgrade_password(user.id, "pbkdf2:sha256:260000$new$hash".to_string())
            .await
            .unwrap();

        let fetched = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(fetched.password, "pbkdf2:sha256:260000$new$hash");

        let missing = repo
            .upgrade_password(9999, "pbkdf2:sha256:260000$x$y".to_string())
            .await;
        assert!(matches!(missing, Err(RepositoryError::NotFound(_))));
    }
}
