//! # Cantine API Library
//!
//! This library provides the core functionality for the Cantine API
//! service: a REST backend for a corporate meal-ordering application,
//! backed by a relational database through SeaORM.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod password;
pub mod repositories;
pub mod seeds;
pub mod server;
pub mod services;
pub mod telemetry;
pub use migration;
