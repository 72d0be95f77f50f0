//! Database migrations for the Cantine API.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2024_06_06_100000_create_adresses;
mod m2024_06_06_100100_create_entreprises;
mod m2024_06_06_100200_create_categories;
mod m2024_06_06_100300_create_allergenes;
mod m2024_06_06_100400_create_utilisateurs;
mod m2024_06_06_100500_create_plats;
mod m2024_06_06_100600_create_commandes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2024_06_06_100000_create_adresses::Migration),
            Box::new(m2024_06_06_100100_create_entreprises::Migration),
            Box::new(m2024_06_06_100200_create_categories::Migration),
            Box::new(m2024_06_06_100300_create_allergenes::Migration),
            Box::new(m2024_06_06_100400_create_utilisateurs::Migration),
            Box::new(m2024_06_06_100500_create_plats::Migration),
            Box::new(m2024_06_06_100600_create_commandes::Migration),
        ]
    }
}
