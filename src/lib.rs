//! # Medequip Service
//!
//! REST backend for tracking medical equipment and their scheduled
//! maintenance.
//!
//! ## Architecture
//!
//! - **domain**: Core models and collaborator contracts (credential and
//!   maintenance stores)
//! - **auth**: Password hashing, JWT tokens, the login/identity service and
//!   the Axum middleware that guards protected routes
//! - **alerts**: Classification of maintenance records into overdue /
//!   upcoming notifications
//! - **infrastructure**: SeaORM database layer (entities, migrations,
//!   repositories)
//! - **api**: REST API with Swagger documentation

pub mod alerts;
pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::{init_database, DatabaseConfig};

// Re-export API router
pub use api::create_api_router;
