// src/handlers/upload_handlers.rs
use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use futures::StreamExt;

use crate::AppState;
use crate::dtos::upload_dtos::UploadOut;
use crate::error::{ApiError, ApiResult, MessageOut};
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::services::upload_services::UploadService;

const IMAGE_FIELD: &str = "image";

/// POST /api/upload
/// Accepts one image in the `image` multipart field and returns its URL path.
#[post("/upload")]
pub async fn upload_image(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> ApiResult<HttpResponse> {
    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| ApiError::validation(format!("Invalid multipart body: {}", e)))?;

        if field.name() != Some(IMAGE_FIELD) {
            // drain unrelated parts so the stream can advance
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| ApiError::validation(format!("Invalid multipart body: {}", e)))?;
            }
            continue;
        }

        let content_type = UploadService::check_content_type(field.content_type())?;
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| {
                log::error!("error reading upload field: {}", e);
                ApiError::validation(format!("Invalid multipart body: {}", e))
            })?;
            bytes.extend_from_slice(&chunk);
            UploadService::check_size(bytes.len())?;
        }

        let image_url = state
            .uploads
            .store(filename.as_deref(), &content_type, &bytes)
            .await?;
        log::info!("user {} uploaded {}", user.user_id, image_url);

        return Ok(HttpResponse::Ok().json(UploadOut { image_url }));
    }

    Err(ApiError::validation("No image file provided"))
}

/// GET /uploads/{filename}
#[get("/uploads/{filename}")]
pub async fn serve_upload(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    match state.uploads.open(&path).await {
        Some(file) => file.into_response(&req),
        None => HttpResponse::NotFound().json(MessageOut::new("File not found")),
    }
}
