//! Scheduled comment CRUD and fire-state commits.
//!
//! This is the schedule store consumed by the poller: schedules are created
//! and edited through the API, and only `mark_comment_posted` mutates
//! `last_posted_at` - strictly after the corresponding action succeeded.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::records::{CommentType, ScheduledCommentRecord};
use super::Database;

const COMMENT_COLUMNS: &str = "id, comment_type, ticket_key, comment_text, cron_schedule, \
                               enabled, last_posted_at, created_at, updated_at";

fn row_to_comment(row: &sqlx::sqlite::SqliteRow) -> Result<ScheduledCommentRecord> {
    let type_str: String = row.try_get("comment_type")?;
    let comment_type = CommentType::parse(&type_str)
        .ok_or_else(|| anyhow!("Unknown comment_type in database: '{}'", type_str))?;

    Ok(ScheduledCommentRecord {
        id: row.try_get("id")?,
        comment_type,
        ticket_key: row.try_get("ticket_key")?,
        comment_text: row.try_get("comment_text")?,
        cron_schedule: row.try_get("cron_schedule")?,
        enabled: row.try_get("enabled")?,
        last_posted_at: row.try_get("last_posted_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl Database {
    pub async fn get_all_scheduled_comments(&self) -> Result<Vec<ScheduledCommentRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM scheduled_comments ORDER BY created_at DESC",
            COMMENT_COLUMNS
        ))
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(row_to_comment).collect()
    }

    pub async fn get_enabled_scheduled_comments(&self) -> Result<Vec<ScheduledCommentRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM scheduled_comments WHERE enabled = 1 ORDER BY created_at DESC",
            COMMENT_COLUMNS
        ))
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(row_to_comment).collect()
    }

    pub async fn get_scheduled_comment(
        &self,
        id: &str,
    ) -> Result<Option<ScheduledCommentRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM scheduled_comments WHERE id = ?",
            COMMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(row_to_comment).transpose()
    }

    pub async fn create_scheduled_comment(
        &self,
        comment_type: CommentType,
        ticket_key: Option<&str>,
        comment_text: &str,
        cron_schedule: &str,
        enabled: bool,
    ) -> Result<ScheduledCommentRecord> {
        let now = Utc::now();
        let record = ScheduledCommentRecord {
            id: Uuid::new_v4().to_string(),
            comment_type,
            ticket_key: ticket_key.map(|s| s.to_string()),
            comment_text: comment_text.to_string(),
            cron_schedule: cron_schedule.to_string(),
            enabled,
            last_posted_at: None,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO scheduled_comments
                (id, comment_type, ticket_key, comment_text, cron_schedule,
                 enabled, last_posted_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, NULL, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(record.comment_type.as_str())
        .bind(&record.ticket_key)
        .bind(&record.comment_text)
        .bind(&record.cron_schedule)
        .bind(record.enabled)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(self.pool())
        .await?;

        Ok(record)
    }

    pub async fn update_scheduled_comment(
        &self,
        id: &str,
        comment_type: CommentType,
        ticket_key: Option<&str>,
        comment_text: &str,
        cron_schedule: &str,
        enabled: bool,
    ) -> Result<Option<ScheduledCommentRecord>> {
        let result = sqlx::query(
            r#"
            UPDATE scheduled_comments
            SET comment_type = ?,
                ticket_key = ?,
                comment_text = ?,
                cron_schedule = ?,
                enabled = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(comment_type.as_str())
        .bind(ticket_key)
        .bind(comment_text)
        .bind(cron_schedule)
        .bind(enabled)
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_scheduled_comment(id).await
    }

    pub async fn delete_scheduled_comment(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM scheduled_comments WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Commit a successful firing. Callers must only invoke this after the
    /// action was confirmed successful by the external system. The WHERE
    /// clause keeps `last_posted_at` monotonically non-decreasing even if a
    /// stale caller passes an older timestamp.
    pub async fn mark_comment_posted(&self, id: &str, posted_at: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE scheduled_comments
            SET last_posted_at = ?, updated_at = ?
            WHERE id = ?
              AND (last_posted_at IS NULL OR last_posted_at <= ?)
            "#,
        )
        .bind(posted_at)
        .bind(Utc::now())
        .bind(id)
        .bind(posted_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }
}
