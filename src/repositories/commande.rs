//! # Commande Repository
//!
//! Repository for commandes and their plat line rows. Creation writes the
//! commande and every line row inside one transaction: either the whole
//! order lands or nothing does.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::error::RepositoryError;
use crate::models::commande::{
    ActiveModel as CommandeActiveModel, Entity as Commande, Model as CommandeModel,
};
use crate::models::commande_plat::{self, ActiveModel as CommandePlatActiveModel};
use crate::models::{plat, utilisateur, CommandePlat, Utilisateur};

/// Status stamped on a freshly created commande
pub const ETAT_EN_COURS: &str = "En cours";

/// Creation-time defaults that are not dictated by the request payload
#[derive(Debug, Clone)]
pub struct CommandeDefaults {
    /// Quantite stamped on new commandes (see `CANTINE_DEFAULT_QUANTITE`)
    pub quantite: i32,
}

/// Request data for updating an existing commande
#[derive(Debug, Clone, Default)]
pub struct UpdateCommandeRequest {
    pub etat: Option<String>,
    pub quantite: Option<i32>,
    pub note: Option<String>,
    pub commentaire: Option<String>,
    pub date_avis: Option<chrono::DateTime<chrono::FixedOffset>>,
}

/// Repository for commande database operations
pub struct CommandeRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CommandeRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get a commande by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<CommandeModel>, RepositoryError> {
        let commande = Commande::find_by_id(id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(commande)
    }

    /// List all commandes
    pub async fn find_all(&self) -> Result<Vec<CommandeModel>, RepositoryError> {
        let commandes = Commande::find()
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(commandes)
    }

    /// Create a commande owned by `utilisateur_id` referencing all plats in
    /// `plat_ids`, in the given order, duplicates included.
    ///
    /// Caller is expected to have resolved every plat id; the commande and
    /// its line rows are inserted in one transaction so an invalid id can
    /// never leave a partial order behind.
    pub async fn create(
        &self,
        utilisateur_id: i32,
        plat_ids: &[i32],
        defaults: CommandeDefaults,
    ) -> Result<CommandeModel, RepositoryError> {
        if plat_ids.is_empty() {
            return Err(RepositoryError::validation_error("No plats provided"));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(RepositoryError::database_error)?;

        let commande = CommandeActiveModel {
            date_commande: Set(Utc::now().into()),
            etat: Set(ETAT_EN_COURS.to_string()),
            quantite: Set(defaults.quantite),
            note: Set(String::new()),
            date_avis: Set(None),
            commentaire: Set(String::new()),
            utilisateur_id: Set(utilisateur_id),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(RepositoryError::database_error)?;

        let lines = plat_ids.iter().map(|plat_id| CommandePlatActiveModel {
            commande_id: Set(commande.id),
            plat_id: Set(*plat_id),
            ..Default::default()
        });

        CommandePlat::insert_many(lines)
            .exec(&txn)
            .await
            .map_err(RepositoryError::database_error)?;

        txn.commit()
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(commande)
    }

    /// Update fields of an existing commande
    pub async fn update(
        &self,
        id: i32,
        request: UpdateCommandeRequest,
    ) -> Result<CommandeModel, RepositoryError> {
        let commande = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Commande not found".to_string()))?;

        let mut active = commande.into_active_model();
        if let Some(etat) = request.etat {
            active.etat = Set(etat);
        }
        if let Some(quantite) = request.quantite {
            active.quantite = Set(quantite);
        }
        if let Some(note) = request.note {
            active.note = Set(note);
        }
        if let Some(commentaire) = request.commentaire {
            active.commentaire = Set(commentaire);
        }
        if let Some(date_avis) = request.date_avis {
            active.date_avis = Set(Some(date_avis));
        }

        let updated = active
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(updated)
    }

    /// Delete a commande and its line rows
    pub async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        let commande = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Commande not found".to_string()))?;

        commande
            .delete(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }

    /// Load the plats referenced by a commande, in line order, duplicates
    /// included.
    pub async fn plats_for(&self, commande_id: i32) -> Result<Vec<plat::Model>, RepositoryError> {
        let lines = CommandePlat::find()
            .filter(commande_plat::Column::CommandeId.eq(commande_id))
            .order_by_asc(commande_plat::Column::Id)
            .find_also_related(plat::Entity)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(lines.into_iter().filter_map(|(_, plat)| plat).collect())
    }

    /// Load the utilisateur owning a commande
    pub async fn utilisateur_for(
        &self,
        commande: &CommandeModel,
    ) -> Result<Option<utilisateur::Model>, RepositoryError> {
        let user = commande
            .find_related(Utilisateur)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{
        CategorieRepository, CreateEntrepriseRequest, CreatePlatRequest, CreateUtilisateurRequest,
        EntrepriseRepository, PlatRepository, UtilisateurRepository,
    };
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

    async fn seed_user(db: &DatabaseConnection) -> i32 {
        let entreprise = EntrepriseRepository::new(db)
            .create(CreateEntrepriseRequest {
                nom: "Acme".to_string(),
                telephone: "0102030405".to_string(),
                code_entreprise: "AB12C".to_string(),
                rue: None,
                ville: None,
                pays: None,
            })
            .await
            .unwrap();

        UtilisateurRepository::new(db)
            .create(CreateUtilisateurRequest {
                nom: "Martin".to_string(),
                prenom: "Alice".to_string(),
                email: "alice.martin@example.com".to_string(),
                password_hash: "pbkdf2:sha256:260000$salt$hash".to_string(),
                date_de_naissance: chrono::NaiveDate::from_ymd_opt(1990, 4, 2).unwrap(),
                telephone: "0601020304".to_string(),
                roles: serde_json::json!(["ROLE_USER"]),
                entreprise_id: entreprise.id,
                allergene_ids: vec![],
            })
            .await
            .unwrap()
            .id
    }

    async fn seed_plats(db: &DatabaseConnection, count: usize) -> Vec<i32> {
        let categorie = CategorieRepository::new(db).create("Plat").await.unwrap();
        let plats = PlatRepository::new(db);

        let mut ids = Vec::new();
        for index in 0..count {
            let plat = plats
                .create(CreatePlatRequest {
                    nom: format!("Plat {}", index),
                    image: None,
                    ingredients: None,
                    date_disponibilite: chrono::NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
                    categorie_id: categorie.id,
                    allergene_ids: vec![],
                })
                .await
                .unwrap();
            ids.push(plat.id);
        }
        ids
    }

    #[tokio::test]
    async fn test_create_sets_defaults_and_lines() {
        let db = setup_test_db().await;
        let user_id = seed_user(&db).await;
        let plat_ids = seed_plats(&db, 2).await;

        let repo = CommandeRepository::new(&db);
        let commande = repo
            .create(user_id, &plat_ids, CommandeDefaults { quantite: 5 })
            .await
            .unwrap();

        assert_eq!(commande.etat, ETAT_EN_COURS);
        assert_eq!(commande.quantite, 5);
        assert_eq!(commande.note, "");
        assert_eq!(commande.commentaire, "");
        assert!(commande.date_avis.is_none());
        assert_eq!(commande.utilisateur_id, user_id);

        let plats = repo.plats_for(commande.id).await.unwrap();
        assert_eq!(plats.len(), 2);
    }

    #[tokio::test]
    async fn test_create_preserves_duplicate_lines_in_order() {
        let db = setup_test_db().await;
        let user_id = seed_user(&db).await;
        let plat_ids = seed_plats(&db, 2).await;

        let repo = CommandeRepository::new(&db);
        let order = vec![plat_ids[1], plat_ids[0], plat_ids[1]];
        let commande = repo
            .create(user_id, &order, CommandeDefaults { quantite: 5 })
            .await
            .unwrap();

        let plats = repo.plats_for(commande.id).await.unwrap();
        let ids: Vec<i32> = plats.iter().map(|p| p.id).collect();
        assert_eq!(ids, order);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_plat_list() {
        let db = setup_test_db().await;
        let user_id = seed_user(&db).await;

        let repo = CommandeRepository::new(&db);
        let result = repo
            .create(user_id, &[], CommandeDefaults { quantite: 5 })
            .await;

        assert!(matches!(result, Err(RepositoryError::Validation(_))));
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_with_unknown_plat_leaves_nothing_behind() {
        let db = setup_test_db().await;
        let user_id = seed_user(&db).await;
        let mut plat_ids = seed_plats(&db, 1).await;
        plat_ids.push(9999); // unknown, violates the line FK

        let repo = CommandeRepository::new(&db);
        let result = repo
            .create(user_id, &plat_ids, CommandeDefaults { quantite: 5 })
            .await;

        assert!(result.is_err());
        assert!(repo.find_all().await.unwrap().is_empty());
        assert!(CommandePlat::find().all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = setup_test_db().await;
        let user_id = seed_user(&db).await;
        let plat_ids = seed_plats(&db, 1).await;

        let repo = CommandeRepository::new(&db);
        let commande = repo
            .create(user_id, &plat_ids, CommandeDefaults { quantite: 5 })
            .await
            .unwrap();

        let updated = repo
            .update(
                commande.id,
                UpdateCommandeRequest {
                    etat: Some("Livrée".to_string()),
                    note: Some("Très bon".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.etat, "Livrée");
        assert_eq!(updated.note, "Très bon");
        assert_eq!(updated.quantite, 5);

        repo.delete(commande.id).await.unwrap();
        assert!(repo.find_by_id(commande.id).await.unwrap().is_none());
        assert!(CommandePlat::find().all(&db).await.unwrap().is_empty());

        let missing = repo.delete(commande.id).await;
        assert!(matches!(missing, Err(RepositoryError::NotFound(_))));
    }
}
