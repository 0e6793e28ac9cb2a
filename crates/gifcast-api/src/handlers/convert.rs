//! Video-to-GIF conversion handler.

use axum::extract::{Multipart, State};
use axum::Json;
use tracing::info;

use gifcast_models::{ConvertResponse, UploadRequest};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// `POST /upload-video/` — multipart form with `file` and `text`.
///
/// Publishing failures do not fail the call: the response then carries
/// `giphy_url: null` alongside the local artifact path.
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ConvertResponse>> {
    let mut video: Option<(Vec<u8>, String)> = None;
    let mut caption: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let filename = field
                    .file_name()
                    .unwrap_or("upload.bin")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {e}")))?;
                video = Some((bytes.to_vec(), filename));
            }
            Some("text") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read caption: {e}")))?;
                caption = Some(text);
            }
            _ => {}
        }
    }

    let (video_bytes, filename) =
        video.ok_or_else(|| ApiError::bad_request("Missing 'file' field"))?;
    let caption = caption.ok_or_else(|| ApiError::bad_request("Missing 'text' field"))?;

    info!(
        "Converting '{}' ({} bytes, caption {} chars)",
        filename,
        video_bytes.len(),
        caption.chars().count()
    );

    let request = UploadRequest::new(video_bytes, filename, caption);
    let outcome = state.pipeline.run(&request).await?;

    Ok(Json(outcome.into()))
}
