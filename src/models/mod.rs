//! # Data Models
//!
//! This module contains the SeaORM entity models used throughout the
//! Cantine API. Entities are persistence shapes only; response
//! projections live next to the handlers that build them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod adresse;
pub mod allergene;
pub mod categorie;
pub mod commande;
pub mod commande_plat;
pub mod entreprise;
pub mod plat;
pub mod plat_allergene;
pub mod utilisateur;
pub mod utilisateur_allergene;

pub use adresse::Entity as Adresse;
pub use allergene::Entity as Allergene;
pub use categorie::Entity as Categorie;
pub use commande::Entity as Commande;
pub use commande_plat::Entity as CommandePlat;
pub use entreprise::Entity as Entreprise;
pub use plat::Entity as Plat;
pub use plat_allergene::Entity as PlatAllergene;
pub use utilisateur::Entity as Utilisateur;
pub use utilisateur_allergene::Entity as UtilisateurAllergene;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "cantine".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
