// File: manager/src/web/server.rs
use crate::config::Config;
use crate::database::Database;
use crate::dispatch::HandoverDispatcher;
use crate::jira::JiraClient;
use crate::web::{handlers, AppState};
use anyhow::Result;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub async fn start_web_server(
    config: Arc<Config>,
    database: Arc<Database>,
    dispatcher: Arc<HandoverDispatcher>,
    jira: Arc<JiraClient>,
) -> Result<()> {
    let state = AppState::new(config.clone(), database, dispatcher, jira);

    let app = create_router(state);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // === SCHEDULED COMMENT ROUTES ===
        .route("/api/schedules", get(handlers::get_all_schedules))
        .route("/api/schedules", post(handlers::create_schedule))
        .route("/api/schedules/{id}", get(handlers::get_schedule))
        .route("/api/schedules/{id}", put(handlers::update_schedule))
        .route("/api/schedules/{id}", delete(handlers::delete_schedule))
        // === SETTINGS ROUTES ===
        .route("/api/settings", get(handlers::get_all_settings))
        .route(
            "/api/settings/scheduler-state",
            get(handlers::get_scheduler_state),
        )
        .route(
            "/api/settings/scheduler-state",
            put(handlers::set_scheduler_state),
        )
        .route(
            "/api/settings/trigger-times",
            get(handlers::get_trigger_times),
        )
        .route(
            "/api/settings/trigger-times",
            put(handlers::set_trigger_times),
        )
        .route("/api/settings/{key}", put(handlers::set_setting))
        // === TICKET ROUTES ===
        .route("/api/tickets", get(handlers::get_open_tickets))
        .route("/api/tickets/notes", get(handlers::get_all_ticket_notes))
        .route("/api/tickets/notes", put(handlers::upsert_ticket_note))
        .route(
            "/api/tickets/notes/{ticket_key}",
            delete(handlers::delete_ticket_note),
        )
        // === HANDOVER DISPATCH ROUTES ===
        .route(
            "/api/handover/scan-and-reply",
            post(handlers::scan_and_reply_handover),
        )
        // Add middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
