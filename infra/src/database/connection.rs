//! Database connection pool management

use std::time::Duration;

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::info;

use cs_shared::config::DatabaseConfig;

use crate::InfrastructureError;

/// Snapshot of pool usage for logging and health reporting
#[derive(Debug, Clone, Copy)]
pub struct PoolStatistics {
    /// Connections currently open
    pub connections: u32,
    /// Open connections not checked out
    pub idle_connections: u32,
    /// Configured pool ceiling
    pub max_connections: u32,
}

impl std::fmt::Display for PoolStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} connections ({} idle)",
            self.connections, self.max_connections, self.idle_connections
        )
    }
}

/// MySQL connection pool wrapper
///
/// Owns the SQLx pool and the knowledge of how it was configured.
/// Repositories borrow the inner pool via [`pool`](Self::pool).
pub struct DatabasePool {
    pool: MySqlPool,
    max_connections: u32,
}

impl DatabasePool {
    /// Create a new connection pool from configuration
    ///
    /// # Arguments
    /// * `config` - Connection URL and pool sizing
    ///
    /// # Returns
    /// * `Ok(DatabasePool)` - Pool connected and ready
    /// * `Err(InfrastructureError)` - URL invalid or database unreachable
    pub async fn new(config: DatabaseConfig) -> Result<Self, InfrastructureError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .idle_timeout(Duration::from_secs(config.idle_timeout))
            .max_lifetime(Duration::from_secs(config.max_lifetime))
            .test_before_acquire(true)
            .connect(&config.url)
            .await?;

        info!(
            max_connections = config.max_connections,
            "database pool created"
        );

        Ok(Self {
            pool,
            max_connections: config.max_connections,
        })
    }

    /// Borrow the underlying SQLx pool
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Cheap round trip confirming the database answers
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(true)
    }

    /// Current pool usage
    pub fn statistics(&self) -> PoolStatistics {
        PoolStatistics {
            connections: self.pool.size(),
            idle_connections: self.pool.num_idle() as u32,
            max_connections: self.max_connections,
        }
    }

    /// Close all connections
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
