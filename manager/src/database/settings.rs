//! Global settings key/value operations.
//!
//! Generic get/set plus typed accessors for the settings the scheduler and
//! dispatcher read: the global enabled flag, shift trigger times, shift user
//! tokens, shift last-fired timestamps, channel override, and mentions.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::constants::{defaults, settings};

use super::records::GlobalSettingRecord;
use super::Database;

impl Database {
    pub async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM global_settings WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool())
            .await?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    pub async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO global_settings (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(self.pool())
        .await?;
        Ok(())
    }

    pub async fn get_all_settings(&self) -> Result<Vec<GlobalSettingRecord>> {
        let rows = sqlx::query("SELECT key, value, updated_at FROM global_settings ORDER BY key")
            .fetch_all(self.pool())
            .await?;

        let mut records = Vec::new();
        for row in rows {
            records.push(GlobalSettingRecord {
                key: row.try_get("key")?,
                value: row.try_get("value")?,
                updated_at: row.try_get("updated_at")?,
            });
        }
        Ok(records)
    }

    // ========================================================================
    // Typed accessors
    // ========================================================================

    /// Global kill-switch, read once per poller tick. Defaults to enabled
    /// when the setting has never been written.
    pub async fn get_scheduler_enabled(&self) -> Result<bool> {
        Ok(self
            .get_setting(settings::SCHEDULER_ENABLED)
            .await?
            .map(|v| v == "true")
            .unwrap_or(true))
    }

    pub async fn set_scheduler_enabled(&self, enabled: bool) -> Result<()> {
        self.set_setting(settings::SCHEDULER_ENABLED, if enabled { "true" } else { "false" })
            .await
    }

    /// Shift trigger times as ("HH:MM", "HH:MM"), with defaults
    pub async fn get_trigger_times(&self) -> Result<(String, String)> {
        let time1 = self
            .get_setting(settings::TRIGGER_TIME_1)
            .await?
            .unwrap_or_else(|| defaults::TRIGGER_TIME_1.to_string());
        let time2 = self
            .get_setting(settings::TRIGGER_TIME_2)
            .await?
            .unwrap_or_else(|| defaults::TRIGGER_TIME_2.to_string());
        Ok((time1, time2))
    }

    pub async fn set_trigger_times(&self, time1: &str, time2: &str) -> Result<()> {
        self.set_setting(settings::TRIGGER_TIME_1, time1).await?;
        self.set_setting(settings::TRIGGER_TIME_2, time2).await
    }

    pub async fn get_custom_channel_id(&self) -> Result<Option<String>> {
        let value = self.get_setting(settings::CUSTOM_CHANNEL_ID).await?;
        Ok(value.filter(|v| !v.is_empty()))
    }

    pub async fn get_member_mentions(&self) -> Result<Option<String>> {
        let value = self.get_setting(settings::MEMBER_MENTIONS).await?;
        Ok(value.filter(|v| !v.is_empty()))
    }

    pub async fn get_shift_user_token(&self, token_key: &str) -> Result<Option<String>> {
        let value = self.get_setting(token_key).await?;
        Ok(value.filter(|v| !v.is_empty()))
    }

    /// Last-fired timestamp for a shift, persisted so the due gate's spacing
    /// floor holds across restarts
    pub async fn get_shift_last_fired(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let value = self.get_setting(key).await?;
        Ok(value.and_then(|v| DateTime::parse_from_rfc3339(&v).ok().map(|dt| dt.with_timezone(&Utc))))
    }

    pub async fn set_shift_last_fired(&self, key: &str, fired_at: DateTime<Utc>) -> Result<()> {
        self.set_setting(key, &fired_at.to_rfc3339()).await
    }
}
