use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::post,
    Extension, Json, Router,
};
use rentcar_core::document::DocumentKind;
use rentcar_core::{authorize, is_allowed, Action, Actor};
use serde::Serialize;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub kind: DocumentKind,
    pub url: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/documents/{kind}", post(upload_document))
}

/// POST /v1/documents/{kind}
/// Multipart body; the first part carrying a file name is stored.
async fn upload_document(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(kind): Path<DocumentKind>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    if kind == DocumentKind::CarImage && !is_allowed(actor.role, Action::EditCar, false) {
        authorize(actor.role, Action::CreateCar, false)?;
    }

    while let Some(field) = multipart.next_field().await? {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field.bytes().await?;
        let url = state.documents.store(kind, &file_name, &bytes).await?;
        tracing::info!("Actor {} uploaded {:?} ({} bytes)", actor.id, kind, bytes.len());
        return Ok((StatusCode::CREATED, Json(UploadResponse { kind, url })));
    }

    Err(AppError::ValidationError("No file part in upload".to_string()))
}
