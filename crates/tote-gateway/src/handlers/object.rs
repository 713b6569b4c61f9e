//! Object operation handlers

use crate::{ApiError, AppState};
use axum::{
    Json,
    body::Body,
    extract::{Multipart, Path, State, multipart::MultipartRejection},
    http::{HeaderValue, header},
    response::Response,
};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Multipart field carrying the uploaded file
pub const UPLOAD_FIELD: &str = "file";

/// Acknowledgement body for mutating operations
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of GET /list
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListObjectsResponse {
    pub objects: Vec<String>,
}

/// POST /upload - Store the `file` field under its filename
pub async fn upload_object(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::bad_request(e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let key = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ApiError::bad_request("upload field `file` has no filename"))?;
        let content_type = field.content_type().map(str::to_string);

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        tracing::debug!(key = %key, size = data.len(), "Storing object");
        state
            .store
            .put_object(&key, data, content_type.as_deref())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, key = %key, "Failed to put object");
                e
            })?;

        return Ok(Json(MessageResponse {
            message: "File uploaded successfully".to_string(),
        }));
    }

    Err(ApiError::bad_request("missing multipart field `file`"))
}

/// GET /download/{key} - Stream an object back as an attachment
///
/// If the store stream fails after the response has started, the error is
/// logged and the connection aborted; the caller sees a truncated body and
/// nothing is appended to it.
pub async fn download_object(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    let object = state.store.get_object(&key).await.map_err(|e| {
        tracing::error!(error = %e, key = %key, "Failed to get object");
        e
    })?;

    let content_disposition = HeaderValue::from_str(&format!("attachment; filename={}", key))
        .map_err(|_| ApiError::bad_request("key cannot be used as a download filename"))?;
    let content_type = object
        .content_type
        .as_deref()
        .and_then(|ct| HeaderValue::from_str(ct).ok())
        .unwrap_or_else(|| HeaderValue::from_static(""));

    let stream_key = key.clone();
    let body = object.body.inspect_err(move |e| {
        tracing::error!(error = %e, key = %stream_key, "Download stream failed, response truncated");
    });

    let mut response = Response::new(Body::from_stream(body));
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_DISPOSITION, content_disposition);
    headers.insert(header::CONTENT_TYPE, content_type);
    if let Some(len) = object.content_length {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    }

    Ok(response)
}

/// GET /list - List keys in the bucket (first page only)
pub async fn list_objects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListObjectsResponse>, ApiError> {
    let objects = state.store.list_objects().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to list objects");
        e
    })?;

    Ok(Json(ListObjectsResponse { objects }))
}

/// DELETE /delete/{key} - Delete object
pub async fn delete_object(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.delete_object(&key).await.map_err(|e| {
        tracing::error!(error = %e, key = %key, "Failed to delete object");
        e
    })?;

    Ok(Json(MessageResponse {
        message: format!("File {} deleted successfully", key),
    }))
}
