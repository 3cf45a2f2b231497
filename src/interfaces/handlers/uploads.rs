use actix_multipart::Multipart;
use actix_web::{web, Responder};
use futures::{StreamExt, TryStreamExt};
use tracing::instrument;

use crate::{
    constants::MAX_UPLOAD_BYTES,
    errors::AppError,
    handlers::{created, ok},
    AppState,
};

const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/gif", "image/webp"];

/// Accepts a multipart form with a single `file` part and forwards the
/// bytes to the CDN after sniffing the content type.
#[instrument(skip(state, payload))]
pub async fn upload_image(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<impl Responder, AppError> {
    let Some(cdn) = &state.cdn else {
        return Err(AppError::InternalError(
            "Image uploads are not configured".to_string(),
        ));
    };

    let mut file: Option<(Vec<u8>, String)> = None;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Malformed multipart payload: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or("upload")
            .to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::InvalidInput(format!("Upload read failed: {}", e)))?;
            if bytes.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(AppError::InvalidInput(
                    "Image exceeds the 5 MB upload limit".to_string(),
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        file = Some((bytes, filename));
        break;
    }

    let Some((bytes, filename)) = file else {
        return Err(AppError::InvalidInput("Missing file part".to_string()));
    };
    if bytes.is_empty() {
        return Err(AppError::InvalidInput("Uploaded file is empty".to_string()));
    }

    // Trust the sniffed type over whatever the client declared.
    let mime = infer::get(&bytes)
        .map(|kind| kind.mime_type())
        .ok_or_else(|| AppError::InvalidInput("Unrecognized file type".to_string()))?;
    if !ALLOWED_IMAGE_TYPES.contains(&mime) {
        return Err(AppError::InvalidInput(format!(
            "Unsupported image type: {}",
            mime
        )));
    }

    let uploaded = cdn.upload_image(bytes, &filename, mime).await?;
    Ok(created(uploaded))
}

#[instrument(skip(state))]
pub async fn delete_image(
    public_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let Some(cdn) = &state.cdn else {
        return Err(AppError::InternalError(
            "Image uploads are not configured".to_string(),
        ));
    };

    cdn.delete_image(&public_id).await?;
    Ok(ok(serde_json::json!({ "deleted": true })))
}
