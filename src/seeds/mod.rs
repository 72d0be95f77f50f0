//! Database seeding functionality
//!
//! This module provides functionality to seed the database with demo data
//! for local development: an entreprise with a known join code, the base
//! categories and the common allergenes.

use anyhow::Result;
use sea_orm::DatabaseConnection;

use crate::repositories::{
    AllergeneRepository, CategorieRepository, CreateEntrepriseRequest, EntrepriseRepository,
};

const DEMO_CODE_ENTREPRISE: &str = "AB12C";
const CATEGORIES: &[&str] = &["Entrée", "Plat", "Dessert"];
const ALLERGENES: &[&str] = &["Gluten", "Lactose", "Arachide", "Oeuf"];

/// Seeds the database with demo data, skipping anything already present.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<()> {
    let entreprises = EntrepriseRepository::new(db);
    match entreprises.find_by_code(DEMO_CODE_ENTREPRISE).await? {
        Some(_) => {
            log::info!(
                "Entreprise '{}' already exists, skipping",
                DEMO_CODE_ENTREPRISE
            );
        }
        None => {
            entreprises
                .create(CreateEntrepriseRequest {
                    nom: "Cantine Demo".to_string(),
                    telephone: "0102030405".to_string(),
                    code_entreprise: DEMO_CODE_ENTREPRISE.to_string(),
                    rue: Some("1 rue des Lilas".to_string()),
                    ville: Some("Lyon".to_string()),
                    pays: Some("France".to_string()),
                })
                .await?;
            log::info!("Seeded entreprise '{}'", DEMO_CODE_ENTREPRISE);
        }
    }

    let categories = CategorieRepository::new(db);
    for nom in CATEGORIES {
        if categories.find_by_nom(nom).await?.is_none() {
            categories.create(nom).await?;
            log::info!("Seeded categorie '{}'", nom);
        }
    }

    let allergenes = AllergeneRepository::new(db);
    let existing: Vec<String> = allergenes
        .find_all()
        .await?
        .into_iter()
        .map(|a| a.nom)
        .collect();
    for nom in ALLERGENES {
        if !existing.iter().any(|e| e == nom) {
            allergenes.create(nom).await?;
            log::info!("Seeded allergene '{}'", nom);
        }
    }

    Ok(())
}
