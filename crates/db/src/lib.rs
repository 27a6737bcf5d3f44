//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! Persistence is optional for the service: calculations work without a
//! database and only the history endpoints need one.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{CalculationRepository, HistoryError, NewCalculation};

use std::time::Duration;

use fiscus_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    Database::connect(options).await
}
