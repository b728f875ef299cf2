//! Integration tests for the database layer.
//!
//! Exercises schedule CRUD, fire-state commits, ticket notes, and the
//! typed settings accessors against in-memory SQLite.

mod common;

use chrono::{Duration, Utc};
use common::fixtures::TestDatabase;
use manager::database::CommentType;
use sqlx::Row;

#[tokio::test]
async fn initialization_creates_tables() {
    let db = TestDatabase::new().await.expect("create test database");

    let rows = sqlx::query("SELECT name FROM sqlite_master WHERE type='table'")
        .fetch_all(db.pool())
        .await
        .expect("query tables");

    let table_names: Vec<String> = rows.iter().map(|r| r.get::<String, _>("name")).collect();
    assert!(table_names.contains(&"scheduled_comments".to_string()));
    assert!(table_names.contains(&"ticket_notes".to_string()));
    assert!(table_names.contains(&"global_settings".to_string()));
}

#[tokio::test]
async fn schedule_crud_roundtrip() {
    let db = TestDatabase::new().await.unwrap();
    let database = db.database();

    let created = database
        .create_scheduled_comment(
            CommentType::Jira,
            Some("TCP-123"),
            "Daily status check",
            "0 9 * * 1-5",
            true,
        )
        .await
        .unwrap();

    assert!(created.last_posted_at.is_none());

    let fetched = database
        .get_scheduled_comment(&created.id)
        .await
        .unwrap()
        .expect("schedule exists");
    assert_eq!(fetched.ticket_key.as_deref(), Some("TCP-123"));
    assert_eq!(fetched.cron_schedule, "0 9 * * 1-5");
    assert_eq!(fetched.comment_type, CommentType::Jira);

    let updated = database
        .update_scheduled_comment(
            &created.id,
            CommentType::Jira,
            Some("TCP-123"),
            "Daily status check",
            "30 9 * * 1-5",
            false,
        )
        .await
        .unwrap()
        .expect("update hits existing row");
    assert_eq!(updated.cron_schedule, "30 9 * * 1-5");
    assert!(!updated.enabled);

    assert!(database.delete_scheduled_comment(&created.id).await.unwrap());
    assert!(database
        .get_scheduled_comment(&created.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn enabled_filter_excludes_disabled_schedules() {
    let db = TestDatabase::new().await.unwrap();
    let database = db.database();

    database
        .create_scheduled_comment(CommentType::Slack, None, "handover", "0 17 * * *", true)
        .await
        .unwrap();
    database
        .create_scheduled_comment(CommentType::Slack, None, "handover-off", "0 23 * * *", false)
        .await
        .unwrap();

    let enabled = database.get_enabled_scheduled_comments().await.unwrap();
    assert_eq!(enabled.len(), 1);
    assert_eq!(enabled[0].comment_text, "handover");

    let all = database.get_all_scheduled_comments().await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn mark_posted_sets_and_keeps_latest_timestamp() {
    let db = TestDatabase::new().await.unwrap();
    let database = db.database();

    let schedule = database
        .create_scheduled_comment(CommentType::Jira, Some("TCP-1"), "x", "* * * * *", true)
        .await
        .unwrap();

    let first = Utc::now();
    database.mark_comment_posted(&schedule.id, first).await.unwrap();

    let fetched = database
        .get_scheduled_comment(&schedule.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.last_posted_at, Some(first));

    // A later commit advances the timestamp
    let later = first + Duration::seconds(120);
    database.mark_comment_posted(&schedule.id, later).await.unwrap();
    let fetched = database
        .get_scheduled_comment(&schedule.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.last_posted_at, Some(later));

    // A stale commit with an older timestamp is a no-op
    let stale = first - Duration::seconds(300);
    database.mark_comment_posted(&schedule.id, stale).await.unwrap();
    let fetched = database
        .get_scheduled_comment(&schedule.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.last_posted_at, Some(later));
}

#[tokio::test]
async fn ticket_note_upsert_overwrites() {
    let db = TestDatabase::new().await.unwrap();
    let database = db.database();

    database
        .upsert_ticket_note("TCP-7", "investigating", "waiting on vendor")
        .await
        .unwrap();
    database
        .upsert_ticket_note("TCP-7", "resolved", "closing tomorrow")
        .await
        .unwrap();

    let notes = database.get_all_ticket_notes().await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].status, "resolved");

    let map = database.get_ticket_notes_map().await.unwrap();
    assert_eq!(map.get("TCP-7").unwrap().action, "closing tomorrow");

    assert!(database.delete_ticket_note("TCP-7").await.unwrap());
    assert!(!database.delete_ticket_note("TCP-7").await.unwrap());
}

#[tokio::test]
async fn scheduler_enabled_defaults_to_true() {
    let db = TestDatabase::new().await.unwrap();
    let database = db.database();

    assert!(database.get_scheduler_enabled().await.unwrap());

    database.set_scheduler_enabled(false).await.unwrap();
    assert!(!database.get_scheduler_enabled().await.unwrap());

    database.set_scheduler_enabled(true).await.unwrap();
    assert!(database.get_scheduler_enabled().await.unwrap());
}

#[tokio::test]
async fn trigger_times_fall_back_to_defaults() {
    let db = TestDatabase::new().await.unwrap();
    let database = db.database();

    let (time1, time2) = database.get_trigger_times().await.unwrap();
    assert_eq!(time1, "17:00");
    assert_eq!(time2, "23:00");

    database.set_trigger_times("16:30", "22:30").await.unwrap();
    let (time1, time2) = database.get_trigger_times().await.unwrap();
    assert_eq!(time1, "16:30");
    assert_eq!(time2, "22:30");
}

#[tokio::test]
async fn shift_last_fired_roundtrips_through_settings() {
    let db = TestDatabase::new().await.unwrap();
    let database = db.database();

    assert!(database
        .get_shift_last_fired("evening_last_fired_at")
        .await
        .unwrap()
        .is_none());

    let fired = Utc::now();
    database
        .set_shift_last_fired("evening_last_fired_at", fired)
        .await
        .unwrap();

    let loaded = database
        .get_shift_last_fired("evening_last_fired_at")
        .await
        .unwrap()
        .expect("timestamp stored");
    // RFC3339 storage keeps sub-second precision
    assert_eq!(loaded.timestamp_micros(), fired.timestamp_micros());
}

#[tokio::test]
async fn empty_setting_values_read_as_unset() {
    let db = TestDatabase::new().await.unwrap();
    let database = db.database();

    database.set_setting("custom_channel_id", "").await.unwrap();
    assert!(database.get_custom_channel_id().await.unwrap().is_none());

    database.set_setting("custom_channel_id", "C0OVERRIDE").await.unwrap();
    assert_eq!(
        database.get_custom_channel_id().await.unwrap().as_deref(),
        Some("C0OVERRIDE")
    );
}
