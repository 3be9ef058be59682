//! Document upload.
//!
//! Multipart upload: the file lands in the uploads directory under a
//! unique name and a `document` row records its metadata. Stored files
//! are served statically under `/uploads`.

use std::path::Path as FsPath;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository::document::{insert_document, NewDocument};

#[derive(Serialize)]
pub struct UploadResponse {
    pub document_id: i64,
    pub message: String,
    pub file_name: String,
    pub file_url: String,
    pub content_type: String,
}

/// `POST /api/upload` — multipart form with `documentFile`, `title`,
/// `patient_id` and optional `document_type`.
pub async fn upload(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut original_name: Option<String> = None;
    let mut title: Option<String> = None;
    let mut patient_id: Option<i64> = None;
    let mut document_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("documentFile") => {
                original_name = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("failed to read file: {e}")))?;
                file_bytes = Some(bytes.to_vec());
            }
            Some("title") => {
                title = Some(read_text(field).await?);
            }
            Some("patient_id") => {
                let raw = read_text(field).await?;
                patient_id = Some(
                    raw.trim()
                        .parse()
                        .map_err(|_| ApiError::BadRequest("Valid patient_id is required".into()))?,
                );
            }
            Some("document_type") => {
                document_type = Some(read_text(field).await?);
            }
            _ => {}
        }
    }

    let file_bytes = file_bytes.ok_or(ApiError::BadRequest("No file uploaded".into()))?;
    let (title, patient_id) = match (title, patient_id) {
        (Some(t), Some(p)) if !t.trim().is_empty() => (t, p),
        _ => {
            return Err(ApiError::BadRequest(
                "Title and patient_id are required fields".into(),
            ))
        }
    };

    // Unique stored name keeps the original extension for mime detection
    let extension = original_name
        .as_deref()
        .and_then(|n| FsPath::new(n).extension())
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    let file_name = format!("document-{}{extension}", Uuid::new_v4());

    std::fs::create_dir_all(&ctx.config.uploads_dir)
        .map_err(|e| ApiError::Internal(format!("cannot create uploads dir: {e}")))?;
    let dest = ctx.config.uploads_dir.join(&file_name);
    std::fs::write(&dest, &file_bytes)
        .map_err(|e| ApiError::Internal(format!("cannot store upload: {e}")))?;

    let conn = ctx.open_db()?;
    let document_id = insert_document(
        &conn,
        &NewDocument {
            patient_id,
            title,
            document_type,
            file_path: format!("uploads/{file_name}"),
        },
    )
    .map_err(|e| {
        // The row never landed; don't leave the file behind.
        let _ = std::fs::remove_file(&dest);
        ApiError::from(e)
    })?;

    let content_type = mime_guess::from_path(&dest)
        .first_or_octet_stream()
        .to_string();

    tracing::info!(document_id, patient_id, "document uploaded");

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            document_id,
            message: "File uploaded and record created successfully".into(),
            file_url: format!("/uploads/{file_name}"),
            file_name,
            content_type,
        }),
    ))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart field: {e}")))
}
