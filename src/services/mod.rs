//! # Domain Services
//!
//! Small helpers composing repository calls into higher-level read
//! operations.

pub mod utilisateur;

pub use utilisateur::{ServiceError, UtilisateurService};
