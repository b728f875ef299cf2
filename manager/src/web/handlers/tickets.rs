//! Open ticket listing and ticket note endpoints.
//!
//! `get_open_tickets` merges the live Jira search with locally saved notes
//! so the dashboard shows the same rows the handover report will contain.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use super::common::{bad_request, internal_error, not_found, ApiResponse, ApiResult};
use crate::database::TicketNoteRecord;
use crate::web::AppState;

pub async fn get_open_tickets(State(state): State<AppState>) -> ApiResult<Value> {
    let tickets = match state.jira.fetch_open_tickets().await {
        Ok(tickets) => tickets,
        Err(e) => {
            error!("Failed to fetch open tickets: {}", e);
            return Err(internal_error(e));
        }
    };

    let notes = match state.database.get_ticket_notes_map().await {
        Ok(notes) => notes,
        Err(e) => {
            error!("Failed to load ticket notes: {}", e);
            return Err(internal_error(e));
        }
    };

    let tickets_json: Vec<Value> = tickets
        .iter()
        .map(|t| {
            let note = notes.get(&t.key);
            json!({
                "key": t.key,
                "summary": t.summary,
                "wl_main_type": t.wl_main_type,
                "wl_sub_type": t.wl_sub_type,
                "status": note.map(|n| n.status.clone()),
                "action": note.map(|n| n.action.clone())
            })
        })
        .collect();

    Ok(Json(ApiResponse::success(json!(tickets_json))))
}

pub async fn get_all_ticket_notes(
    State(state): State<AppState>,
) -> ApiResult<Vec<TicketNoteRecord>> {
    match state.database.get_all_ticket_notes().await {
        Ok(notes) => Ok(Json(ApiResponse::success(notes))),
        Err(e) => {
            error!("Failed to get ticket notes: {}", e);
            Err(internal_error(e))
        }
    }
}

#[derive(Deserialize)]
pub struct TicketNoteRequest {
    pub ticket_key: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub action: String,
}

pub async fn upsert_ticket_note(
    State(state): State<AppState>,
    Json(req): Json<TicketNoteRequest>,
) -> ApiResult<TicketNoteRecord> {
    if req.ticket_key.trim().is_empty() {
        return Err(bad_request("Ticket key cannot be empty".to_string()));
    }

    match state
        .database
        .upsert_ticket_note(&req.ticket_key, &req.status, &req.action)
        .await
    {
        Ok(note) => {
            info!("Saved note for {}", note.ticket_key);
            Ok(Json(ApiResponse::success(note)))
        }
        Err(e) => {
            error!("Failed to save note for {}: {}", req.ticket_key, e);
            Err(internal_error(e))
        }
    }
}

pub async fn delete_ticket_note(
    Path(ticket_key): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<String> {
    match state.database.delete_ticket_note(&ticket_key).await {
        Ok(true) => {
            info!("Deleted note for {}", ticket_key);
            Ok(Json(ApiResponse::success(format!(
                "Note for {} deleted",
                ticket_key
            ))))
        }
        Ok(false) => Err(not_found(format!("No note for {}", ticket_key))),
        Err(e) => {
            error!("Failed to delete note for {}: {}", ticket_key, e);
            Err(internal_error(e))
        }
    }
}
