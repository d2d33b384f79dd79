use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::Document;
use crate::llm_client::ApiKey;
use crate::session::{SessionHandle, SessionStore};
use crate::state::AppState;

/// Multipart field carrying the resume.
const DOCUMENT_FIELD: &str = "resume";
const DEFAULT_FILENAME: &str = "resume.pdf";

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CredentialRequest {
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentAccepted {
    pub filename: String,
    pub size_bytes: usize,
}

/// Session ids arrive as raw path segments so a malformed id gets the JSON
/// error envelope rather than axum's plain-text rejection.
pub(crate) fn parse_session_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::Validation(format!("'{raw}' is not a valid session id")))
}

pub(crate) async fn find_session(store: &SessionStore, id: Uuid) -> Result<Arc<SessionHandle>, AppError> {
    store
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

/// POST /api/v1/sessions
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionCreated>) {
    let session = state.sessions.create().await;
    info!(session_id = %session.id, "Session started");
    (
        StatusCode::CREATED,
        Json(SessionCreated {
            session_id: session.id,
            created_at: session.created_at,
        }),
    )
}

/// DELETE /api/v1/sessions/:id
pub async fn end_session(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, AppError> {
    let id = parse_session_id(&id)?;
    if !state.sessions.remove(id).await {
        return Err(AppError::NotFound(format!("Session {id} not found")));
    }
    info!(session_id = %id, "Session ended");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/sessions/:id/credential
pub async fn set_credential(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CredentialRequest>,
) -> Result<StatusCode, AppError> {
    let id = parse_session_id(&id)?;
    let session = find_session(&state.sessions, id).await?;
    let api_key = ApiKey::new(&req.api_key).ok_or_else(|| AppError::Validation("api_key cannot be empty".to_string()))?;
    session.set_api_key(api_key).await;
    info!(session_id = %id, "API key set");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/sessions/:id/document
pub async fn upload_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<DocumentAccepted>, AppError> {
    let id = parse_session_id(&id)?;
    let session = find_session(&state.sessions, id).await?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(DOCUMENT_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_FILENAME)
            .to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;

        if !Document::looks_like_pdf(&bytes) {
            return Err(AppError::Validation(format!("{filename} is not a PDF document")));
        }

        let document = Document::new(filename, bytes);
        let accepted = DocumentAccepted {
            filename: document.filename.clone(),
            size_bytes: document.size_bytes(),
        };
        session.set_document(document).await;
        info!(session_id = %id, filename = %accepted.filename, size_bytes = accepted.size_bytes, "Resume uploaded");
        return Ok(Json(accepted));
    }

    Err(AppError::Validation(format!("multipart field '{DOCUMENT_FIELD}' is required")))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(e.body_text())
    }
}
