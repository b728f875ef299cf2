//! CRUD endpoints for scheduled comments.
//!
//! Cron expressions are validated at write time so a malformed expression is
//! rejected with 400 instead of silently never firing.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::{error, info};

use super::common::{bad_request, internal_error, not_found, ApiResponse, ApiResult};
use crate::database::{CommentType, ScheduledCommentRecord};
use crate::scheduler::CronSchedule;
use crate::web::AppState;

#[derive(Deserialize)]
pub struct ScheduleRequest {
    pub comment_type: String,
    pub ticket_key: Option<String>,
    pub comment_text: String,
    pub cron_schedule: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

fn validate_request(req: &ScheduleRequest) -> Result<CommentType, String> {
    let comment_type = CommentType::parse(&req.comment_type)
        .ok_or_else(|| format!("Unknown comment type '{}'", req.comment_type))?;

    if comment_type == CommentType::Jira
        && req.ticket_key.as_deref().map(str::trim).unwrap_or("").is_empty()
    {
        return Err("Jira schedules require a ticket key".to_string());
    }

    CronSchedule::parse(&req.cron_schedule)
        .map_err(|e| format!("Invalid cron expression: {}", e))?;

    Ok(comment_type)
}

pub async fn get_all_schedules(
    State(state): State<AppState>,
) -> ApiResult<Vec<ScheduledCommentRecord>> {
    match state.database.get_all_scheduled_comments().await {
        Ok(schedules) => Ok(Json(ApiResponse::success(schedules))),
        Err(e) => {
            error!("Failed to get schedules: {}", e);
            Err(internal_error(e))
        }
    }
}

pub async fn get_schedule(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<ScheduledCommentRecord> {
    match state.database.get_scheduled_comment(&id).await {
        Ok(Some(schedule)) => Ok(Json(ApiResponse::success(schedule))),
        Ok(None) => Err(not_found(format!("Schedule {} not found", id))),
        Err(e) => {
            error!("Failed to get schedule {}: {}", id, e);
            Err(internal_error(e))
        }
    }
}

pub async fn create_schedule(
    State(state): State<AppState>,
    Json(req): Json<ScheduleRequest>,
) -> ApiResult<ScheduledCommentRecord> {
    let comment_type = validate_request(&req).map_err(bad_request)?;

    match state
        .database
        .create_scheduled_comment(
            comment_type,
            req.ticket_key.as_deref(),
            &req.comment_text,
            &req.cron_schedule,
            req.enabled,
        )
        .await
    {
        Ok(schedule) => {
            info!("Created schedule {} ({})", schedule.id, schedule.cron_schedule);
            Ok(Json(ApiResponse::success(schedule)))
        }
        Err(e) => {
            error!("Failed to create schedule: {}", e);
            Err(internal_error(e))
        }
    }
}

pub async fn update_schedule(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<ScheduleRequest>,
) -> ApiResult<ScheduledCommentRecord> {
    let comment_type = validate_request(&req).map_err(bad_request)?;

    match state
        .database
        .update_scheduled_comment(
            &id,
            comment_type,
            req.ticket_key.as_deref(),
            &req.comment_text,
            &req.cron_schedule,
            req.enabled,
        )
        .await
    {
        Ok(Some(schedule)) => {
            info!("Updated schedule {}", id);
            Ok(Json(ApiResponse::success(schedule)))
        }
        Ok(None) => Err(not_found(format!("Schedule {} not found", id))),
        Err(e) => {
            error!("Failed to update schedule {}: {}", id, e);
            Err(internal_error(e))
        }
    }
}

pub async fn delete_schedule(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<String> {
    match state.database.delete_scheduled_comment(&id).await {
        Ok(true) => {
            info!("Deleted schedule {}", id);
            Ok(Json(ApiResponse::success(format!("Schedule {} deleted", id))))
        }
        Ok(false) => Err(not_found(format!("Schedule {} not found", id))),
        Err(e) => {
            error!("Failed to delete schedule {}: {}", id, e);
            Err(internal_error(e))
        }
    }
}
