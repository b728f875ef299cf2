//! Global settings endpoints.
//!
//! Shift user tokens are stored in settings but never echoed back; reads
//! report only whether a token is configured.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use super::common::{bad_request, internal_error, ApiResponse, ApiResult};
use crate::constants::settings;
use crate::scheduler::poller::time_to_cron;
use crate::web::AppState;

const SECRET_KEYS: &[&str] = &[settings::EVENING_USER_TOKEN, settings::NIGHT_USER_TOKEN];

pub async fn get_all_settings(State(state): State<AppState>) -> ApiResult<Value> {
    match state.database.get_all_settings().await {
        Ok(records) => {
            let settings_json: Vec<Value> = records
                .iter()
                .map(|r| {
                    if SECRET_KEYS.contains(&r.key.as_str()) {
                        json!({
                            "key": r.key,
                            "configured": !r.value.is_empty(),
                            "updated_at": r.updated_at.to_rfc3339()
                        })
                    } else {
                        json!({
                            "key": r.key,
                            "value": r.value,
                            "updated_at": r.updated_at.to_rfc3339()
                        })
                    }
                })
                .collect();
            Ok(Json(ApiResponse::success(json!(settings_json))))
        }
        Err(e) => {
            error!("Failed to get settings: {}", e);
            Err(internal_error(e))
        }
    }
}

pub async fn get_scheduler_state(State(state): State<AppState>) -> ApiResult<Value> {
    match state.database.get_scheduler_enabled().await {
        Ok(enabled) => Ok(Json(ApiResponse::success(json!({ "enabled": enabled })))),
        Err(e) => {
            error!("Failed to get scheduler state: {}", e);
            Err(internal_error(e))
        }
    }
}

#[derive(Deserialize)]
pub struct SchedulerStateRequest {
    pub enabled: bool,
}

pub async fn set_scheduler_state(
    State(state): State<AppState>,
    Json(req): Json<SchedulerStateRequest>,
) -> ApiResult<Value> {
    match state.database.set_scheduler_enabled(req.enabled).await {
        Ok(()) => {
            info!(
                "Scheduler {}",
                if req.enabled { "enabled" } else { "disabled" }
            );
            Ok(Json(ApiResponse::success(json!({ "enabled": req.enabled }))))
        }
        Err(e) => {
            error!("Failed to set scheduler state: {}", e);
            Err(internal_error(e))
        }
    }
}

pub async fn get_trigger_times(State(state): State<AppState>) -> ApiResult<Value> {
    match state.database.get_trigger_times().await {
        Ok((time1, time2)) => Ok(Json(ApiResponse::success(json!({
            "trigger_time_1": time1,
            "trigger_time_2": time2
        })))),
        Err(e) => {
            error!("Failed to get trigger times: {}", e);
            Err(internal_error(e))
        }
    }
}

#[derive(Deserialize)]
pub struct TriggerTimesRequest {
    pub trigger_time_1: String,
    pub trigger_time_2: String,
}

pub async fn set_trigger_times(
    State(state): State<AppState>,
    Json(req): Json<TriggerTimesRequest>,
) -> ApiResult<Value> {
    for time in [&req.trigger_time_1, &req.trigger_time_2] {
        if time_to_cron(time).is_none() {
            return Err(bad_request(format!(
                "Invalid trigger time '{}', expected HH:MM",
                time
            )));
        }
    }

    match state
        .database
        .set_trigger_times(&req.trigger_time_1, &req.trigger_time_2)
        .await
    {
        Ok(()) => {
            info!(
                "Trigger times set to {} / {}",
                req.trigger_time_1, req.trigger_time_2
            );
            Ok(Json(ApiResponse::success(json!({
                "trigger_time_1": req.trigger_time_1,
                "trigger_time_2": req.trigger_time_2
            }))))
        }
        Err(e) => {
            error!("Failed to set trigger times: {}", e);
            Err(internal_error(e))
        }
    }
}

#[derive(Deserialize)]
pub struct SettingValueRequest {
    pub value: String,
}

pub async fn set_setting(
    Path(key): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<SettingValueRequest>,
) -> ApiResult<Value> {
    if key.trim().is_empty() {
        return Err(bad_request("Setting key cannot be empty".to_string()));
    }

    match state.database.set_setting(&key, &req.value).await {
        Ok(()) => {
            if SECRET_KEYS.contains(&key.as_str()) {
                info!("Setting '{}' updated", key);
                Ok(Json(ApiResponse::success(json!({ "key": key }))))
            } else {
                info!("Setting '{}' = '{}'", key, req.value);
                Ok(Json(ApiResponse::success(json!({
                    "key": key,
                    "value": req.value
                }))))
            }
        }
        Err(e) => {
            error!("Failed to set setting '{}': {}", key, e);
            Err(internal_error(e))
        }
    }
}
