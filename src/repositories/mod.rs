//! # Repository Layer
//!
//! This module contains repository implementations that encapsulate SeaORM
//! operations for database entities. Relationship loading is always an
//! explicit repository call returning a snapshot collection; nothing is
//! loaded lazily on attribute access.

pub mod allergene;
pub mod categorie;
pub mod commande;
pub mod entreprise;
pub mod plat;
pub mod utilisateur;

pub use allergene::AllergeneRepository;
pub use categorie::CategorieRepository;
pub use commande::{CommandeDefaults, CommandeRepository, UpdateCommandeRequest};
pub use entreprise::{CreateEntrepriseRequest, EntrepriseRepository};
pub use plat::{CreatePlatRequest, PlatRepository};
pub use utilisateur::{CreateUtilisateurRequest, UpdateUtilisateurRequest, UtilisateurRepository};
