//! Note endpoints
//!
//! - `POST /notes/create-note` → 201 `{success, message, note}`
//! - `GET  /notes`             → 200 `{success, message, notes}`
//! - `GET  /notes/{note_id}`   → 200 `{success, message, note}` or 404

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, NoteIdPath};
use crate::http::server::AppState;
use crate::models::{NewNote, Note, NoteDraft};

/// Envelope around a single note
#[derive(Debug, Serialize)]
pub struct NoteEnvelope {
    pub success: bool,
    pub message: &'static str,
    pub note: Note,
}

/// Envelope around the full note list
#[derive(Debug, Serialize)]
pub struct NotesEnvelope {
    pub success: bool,
    pub message: &'static str,
    pub notes: Vec<Note>,
}

/// POST /notes/create-note - validate and persist a new note
async fn create_note(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<Value>,
) -> Result<(StatusCode, Json<NoteEnvelope>), ApiError> {
    let draft = NoteDraft::new(NewNote::from_json(body)?)?;
    let note = state.store.insert(draft).await?;
    tracing::debug!(note_id = %note.id, "Note created");

    Ok((
        StatusCode::CREATED,
        Json(NoteEnvelope {
            success: true,
            message: "Note created successfully",
            note,
        }),
    ))
}

/// GET /notes - every stored note, no pagination
async fn list_notes(State(state): State<Arc<AppState>>) -> Result<Json<NotesEnvelope>, ApiError> {
    let notes = state.store.find_all().await?;

    Ok(Json(NotesEnvelope {
        success: true,
        message: "Notes retrieved successfully",
        notes,
    }))
}

/// GET /notes/{note_id} - a single note
async fn get_note(
    State(state): State<Arc<AppState>>,
    NoteIdPath(id): NoteIdPath,
) -> Result<Json<NoteEnvelope>, ApiError> {
    let note = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "note",
            id: id.to_string(),
        })?;

    Ok(Json(NoteEnvelope {
        success: true,
        message: "Note retrieved successfully",
        note,
    }))
}

/// Note routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/notes", get(list_notes))
        .route("/notes/create-note", post(create_note))
        .route("/notes/{note_id}", get(get_note))
}
