//! Manual handover dispatch trigger.

use axum::{extract::State, Json};
use tracing::info;

use super::common::{ApiResponse, ApiResult};
use crate::dispatch::DispatchResult;
use crate::web::AppState;

/// Run one scan-and-reply cycle immediately. The dispatcher's own
/// serialization and anchor checks apply, so triggering this while a
/// scheduled cycle is running just queues behind it.
pub async fn scan_and_reply_handover(State(state): State<AppState>) -> ApiResult<DispatchResult> {
    info!("Manual scan-and-reply requested");
    let result = state.dispatcher.scan_and_reply().await;
    Ok(Json(ApiResponse::success(result)))
}
