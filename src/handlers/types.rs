//! Shared response projections.
//!
//! Entities are never serialized directly; every endpoint builds one of
//! these views so the persisted shape (password hashes, back-references)
//! stays out of responses.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{allergene, commande, plat, utilisateur};

/// Utilisateur projection without password or relation back-references
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UtilisateurView {
    pub id: i32,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    /// ISO 8601 date
    #[schema(example = "1990-04-02")]
    pub date_de_naissance: chrono::NaiveDate,
    pub telephone: String,
    /// Role strings
    #[schema(value_type = Vec<String>)]
    pub roles: serde_json::Value,
    pub entreprise_id: i32,
    /// Attached allergenes; only present on registration responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergenes: Option<Vec<AllergeneView>>,
}

impl UtilisateurView {
    pub fn from_model(user: &utilisateur::Model) -> Self {
        Self {
            id: user.id,
            nom: user.nom.clone(),
            prenom: user.prenom.clone(),
            email: user.email.clone(),
            date_de_naissance: user.date_de_naissance,
            telephone: user.telephone.clone(),
            roles: user.roles.clone(),
            entreprise_id: user.entreprise_id,
            allergenes: None,
        }
    }

    pub fn with_allergenes(mut self, allergenes: Vec<AllergeneView>) -> Self {
        self.allergenes = Some(allergenes);
        self
    }
}

/// Allergene projection
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AllergeneView {
    pub id: i32,
    pub nom: String,
}

impl AllergeneView {
    pub fn from_model(allergene: &allergene::Model) -> Self {
        Self {
            id: allergene.id,
            nom: allergene.nom.clone(),
        }
    }
}

/// Plat projection for listings and details; commande, categorie and
/// allergene back-references are stripped
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlatView {
    pub id: i32,
    pub nom: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Structured ingredient list
    #[schema(value_type = Option<Vec<String>>)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<serde_json::Value>,
    /// Day this plat is on the menu
    #[schema(example = "2024-06-10")]
    pub date_disponibilite: chrono::NaiveDate,
}

impl PlatView {
    pub fn from_model(plat: &plat::Model) -> Self {
        Self {
            id: plat.id,
            nom: plat.nom.clone(),
            image: plat.image.clone(),
            ingredients: plat.ingredients.clone(),
            date_disponibilite: plat.date_disponibilite,
        }
    }
}

/// Commande projection carrying its owning utilisateur and plat lines
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommandeView {
    pub id: i32,
    /// Creation timestamp (ISO 8601)
    pub date_commande: chrono::DateTime<chrono::FixedOffset>,
    pub etat: String,
    pub quantite: i32,
    pub note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_avis: Option<chrono::DateTime<chrono::FixedOffset>>,
    pub commentaire: String,
    pub utilisateur: UtilisateurView,
    /// Plat lines in order, duplicates included
    pub plats: Vec<PlatView>,
}

impl CommandeView {
    pub fn from_parts(
        commande: &commande::Model,
        utilisateur: &utilisateur::Model,
        plats: &[plat::Model],
    ) -> Self {
        Self {
            id: commande.id,
            date_commande: commande.date_commande,
            etat: commande.etat.clone(),
            quantite: commande.quantite,
            note: commande.note.clone(),
            date_avis: commande.date_avis,
            commentaire: commande.commentaire.clone(),
            utilisateur: UtilisateurView::from_model(utilisateur),
            plats: plats.iter().map(PlatView::from_model).collect(),
        }
    }
}

/// Response payload for register and login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UtilisateurView,
    /// Issued bearer token
    pub token: String,
}
