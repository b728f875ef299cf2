//! Test database utilities for in-memory SQLite testing

use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::sync::Arc;

use manager::database::Database;

/// In-memory database running the real schema initialization
pub struct TestDatabase {
    database: Arc<Database>,
}

impl TestDatabase {
    /// Create a new in-memory test database
    pub async fn new() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let database = Arc::new(Database::from_pool(pool).await?);
        Ok(Self { database })
    }

    pub fn database(&self) -> Arc<Database> {
        self.database.clone()
    }

    /// Get the underlying pool for raw verification queries
    pub fn pool(&self) -> &Pool<Sqlite> {
        self.database.pool()
    }

    /// Clear all data from tables (useful between tests)
    pub async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM scheduled_comments")
            .execute(self.pool())
            .await?;
        sqlx::query("DELETE FROM ticket_notes")
            .execute(self.pool())
            .await?;
        sqlx::query("DELETE FROM global_settings")
            .execute(self.pool())
            .await?;
        Ok(())
    }
}
