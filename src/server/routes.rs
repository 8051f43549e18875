//! API routes: liveness, chat, and file upload.

use std::path::Path;
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::ingest::{self, IngestError, Inspection};
use crate::llm::ChatMessage;

use super::AppState;

type AppStateArc = Arc<AppState>;

pub async fn root() -> Json<Value> {
    info!("root endpoint was accessed");
    Json(json!({ "message": "datachat is running" }))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub user_input: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub plot_path: Option<String>,
}

/// One conversation turn. Pipeline faults are already folded into the
/// reply text, so this handler has no error branch of its own.
pub async fn chat(
    State(state): State<AppStateArc>,
    Json(req): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let reply = state.pipeline.respond(req.history, &req.user_input).await;

    Json(ChatResponse {
        response: reply.text,
        plot_path: reply.plot_path.map(|p| p.display().to_string()),
    })
}

/// Accept a multipart upload, persist it under the upload directory,
/// and answer with the file's inspection (CSV headers or PDF text).
pub async fn upload(
    State(state): State<AppStateArc>,
    mut multipart: Multipart,
) -> Result<Json<Value>, (StatusCode, String)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("malformed upload: {}", e)))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        // Strip any client-supplied directory components.
        let Some(name) = Path::new(&filename)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
        else {
            return Err((StatusCode::BAD_REQUEST, "invalid file name".to_string()));
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, format!("upload read failed: {}", e)))?;

        let dir = state.cfg.upload_dir();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            error!(error = %e, "could not create upload directory");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
        let dest = dir.join(&name);
        tokio::fs::write(&dest, &data).await.map_err(|e| {
            error!(error = %e, "could not persist upload");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
        info!(file = %name, bytes = data.len(), "file uploaded");

        // Parsing is blocking work (filesystem + PDF decoding).
        let inspection = tokio::task::spawn_blocking(move || ingest::inspect(&dest))
            .await
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
            .map_err(ingest_status)?;

        return Ok(Json(match inspection {
            Inspection::CsvHeaders(headers) => json!({ "data": headers }),
            Inspection::PdfText(text) => json!({ "text": text }),
        }));
    }

    Err((StatusCode::BAD_REQUEST, "no file in upload".to_string()))
}

fn ingest_status(err: IngestError) -> (StatusCode, String) {
    let status = match err {
        IngestError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    };
    (status, err.to_string())
}
