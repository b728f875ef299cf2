//! Database layer for the handover manager.
//!
//! This module provides SQLite persistence for:
//! - Scheduled comments (the schedule store consumed by the poller)
//! - Ticket notes (operator status/action annotations)
//! - Global settings (scheduler flag, trigger times, tokens, channel)
//!
//! The module is organized into submodules:
//! - `records` - All record types (entities)
//! - `schedules` - Scheduled comment CRUD and fire-state commits
//! - `tickets` - Ticket note operations
//! - `settings` - Global settings key/value operations

mod records;
mod schedules;
mod settings;
mod tickets;

pub use records::*;

use anyhow::Result;
use sqlx::{Pool, Sqlite, SqlitePool};
use std::path::Path;
use tracing::{error, info};

pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Expose pool for integration test queries
    #[allow(dead_code)]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn new(database_path: &str) -> Result<Self> {
        info!("Database path: {}", database_path);

        // Ensure parent directory exists
        if let Some(parent) = Path::new(database_path).parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                error!("Failed to create parent directory {:?}: {}", parent, e);
                return Err(e.into());
            }
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path);
        let pool = match SqlitePool::connect(&database_url).await {
            Ok(pool) => pool,
            Err(e) => {
                error!("Failed to connect to database at {}: {}", database_url, e);
                return Err(e.into());
            }
        };

        let database = Self { pool };
        database.initialize_tables().await?;
        info!("Database initialized at {}", database_path);

        Ok(database)
    }

    /// Wrap an existing pool (used by tests with in-memory SQLite)
    pub async fn from_pool(pool: Pool<Sqlite>) -> Result<Self> {
        let database = Self { pool };
        database.initialize_tables().await?;
        Ok(database)
    }

    async fn initialize_tables(&self) -> Result<()> {
        let scheduled_comments_sql = r#"
            CREATE TABLE IF NOT EXISTS scheduled_comments (
                id TEXT PRIMARY KEY,
                comment_type TEXT NOT NULL,
                ticket_key TEXT,
                comment_text TEXT NOT NULL,
                cron_schedule TEXT NOT NULL,
                enabled BOOLEAN NOT NULL DEFAULT 1,
                last_posted_at DATETIME,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
        "#;
        if let Err(e) = sqlx::query(scheduled_comments_sql).execute(&self.pool).await {
            error!("Failed to create scheduled_comments table: {}", e);
            return Err(e.into());
        }

        let comments_enabled_idx = "CREATE INDEX IF NOT EXISTS idx_scheduled_comments_enabled ON scheduled_comments(enabled, comment_type)";
        if let Err(e) = sqlx::query(comments_enabled_idx).execute(&self.pool).await {
            error!("Failed to create scheduled_comments index: {}", e);
            return Err(e.into());
        }

        let ticket_notes_sql = r#"
            CREATE TABLE IF NOT EXISTS ticket_notes (
                ticket_key TEXT PRIMARY KEY,
                status TEXT NOT NULL DEFAULT '',
                action TEXT NOT NULL DEFAULT '',
                updated_at DATETIME NOT NULL
            )
        "#;
        if let Err(e) = sqlx::query(ticket_notes_sql).execute(&self.pool).await {
            error!("Failed to create ticket_notes table: {}", e);
            return Err(e.into());
        }

        let settings_sql = r#"
            CREATE TABLE IF NOT EXISTS global_settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at DATETIME NOT NULL
            )
        "#;
        if let Err(e) = sqlx::query(settings_sql).execute(&self.pool).await {
            error!("Failed to create global_settings table: {}", e);
            return Err(e.into());
        }

        Ok(())
    }
}
