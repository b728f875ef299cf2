//! Ticket note operations.
//!
//! Operator-entered status/action annotations keyed by ticket key. These are
//! merged into handover reports alongside live Jira data.

use anyhow::Result;
use chrono::Utc;
use sqlx::Row;
use std::collections::HashMap;

use super::records::TicketNoteRecord;
use super::Database;

impl Database {
    pub async fn get_all_ticket_notes(&self) -> Result<Vec<TicketNoteRecord>> {
        let rows = sqlx::query(
            "SELECT ticket_key, status, action, updated_at FROM ticket_notes ORDER BY ticket_key",
        )
        .fetch_all(self.pool())
        .await?;

        let mut notes = Vec::new();
        for row in rows {
            notes.push(TicketNoteRecord {
                ticket_key: row.try_get("ticket_key")?,
                status: row.try_get("status")?,
                action: row.try_get("action")?,
                updated_at: row.try_get("updated_at")?,
            });
        }
        Ok(notes)
    }

    /// Notes keyed by ticket key, for merging into a report
    pub async fn get_ticket_notes_map(&self) -> Result<HashMap<String, TicketNoteRecord>> {
        let notes = self.get_all_ticket_notes().await?;
        Ok(notes
            .into_iter()
            .map(|note| (note.ticket_key.clone(), note))
            .collect())
    }

    pub async fn upsert_ticket_note(
        &self,
        ticket_key: &str,
        status: &str,
        action: &str,
    ) -> Result<TicketNoteRecord> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO ticket_notes (ticket_key, status, action, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(ticket_key) DO UPDATE SET
                status = excluded.status,
                action = excluded.action,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(ticket_key)
        .bind(status)
        .bind(action)
        .bind(now)
        .execute(self.pool())
        .await?;

        Ok(TicketNoteRecord {
            ticket_key: ticket_key.to_string(),
            status: status.to_string(),
            action: action.to_string(),
            updated_at: now,
        })
    }

    pub async fn delete_ticket_note(&self, ticket_key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM ticket_notes WHERE ticket_key = ?")
            .bind(ticket_key)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
