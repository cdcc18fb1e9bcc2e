use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use deck_app::TurnOutcome;
use deck_domain::{FieldValues, FormSchema};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::{ApiResult, AppState, render_page};

const SCRIPT: &str = include_str!("../assets/app.js");
const STYLESHEET: &str = include_str!("../assets/style.css");

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/app.js", get(script))
        .route("/style.css", get(stylesheet))
        .route("/form.json", get(form_schema))
        .route("/health", get(health))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", get(session_state).delete(close_session))
        .route("/api/sessions/{id}/fields/{name}", put(update_field))
        .route("/api/sessions/{id}/chat", post(chat))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedSession {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionState {
    pub values: FieldValues,
    pub preview: String,
    pub transcript: String,
    pub busy: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FieldUpdate {
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PreviewUpdate {
    pub preview: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub ok: bool,
    pub values: FieldValues,
    pub preview: String,
    pub transcript: String,
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let handle = state.store.create().await;
    let session = handle.lock().await;
    Html(render_page(&session))
}

async fn script() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/javascript; charset=utf-8")], SCRIPT)
}

async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET)
}

async fn form_schema(State(state): State<AppState>) -> Json<FormSchema> {
    Json(state.form().schema.clone())
}

async fn health() -> &'static str {
    "ok"
}

async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<CreatedSession>) {
    let handle = state.store.create().await;
    (StatusCode::CREATED, Json(CreatedSession { id: handle.id().into_string() }))
}

async fn session_state(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionState>> {
    let handle = state.session(&id).await?;
    let session = handle.lock().await;
    Ok(Json(SessionState {
        values: session.values().clone(),
        preview: session.preview().to_string(),
        transcript: session.transcript_html(),
        busy: handle.is_busy(),
    }))
}

async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let handle = state.session(&id).await?;
    state.store.remove(handle.id()).await;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_field(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
    Json(update): Json<FieldUpdate>,
) -> ApiResult<Json<PreviewUpdate>> {
    let handle = state.session(&id).await?;
    let mut session = handle.lock().await;
    session.set_field(&name, update.value)?;
    Ok(Json(PreviewUpdate { preview: session.preview().to_string() }))
}

async fn chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let handle = state.session(&id).await?;
    let outcome = state.agent.run_turn(&handle, &request.message).await?;

    let session = handle.lock().await;
    Ok(Json(ChatResponse {
        ok: matches!(outcome, TurnOutcome::Replied { .. }),
        values: session.values().clone(),
        preview: session.preview().to_string(),
        transcript: session.transcript_html(),
    }))
}
