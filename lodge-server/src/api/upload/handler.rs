//! Room Image Upload Handler
//!
//! Handles room image uploads from admins and serves stored files.
//! Supports multiple image formats (PNG, JPEG, WebP) and converts to JPG.
//! Files are named by content hash, so re-uploading the same picture never
//! duplicates it on disk.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use crate::core::ServerState;
use crate::db::models::RoomImage;
use crate::db::repository::{RoomRepository, parse_id};
use crate::utils::{AppError, AppResult};

/// Maximum file size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality for room photos (85% keeps the gallery attractive while
/// controlling file size)
const JPEG_QUALITY: u8 = 85;

/// Calculate SHA256 hash of data
fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Validate image file
fn validate_image(data: &[u8], ext: &str) -> Result<(), AppError> {
    // Check file size
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation(format!(
            "File too large. Maximum size is {} bytes ({}MB)",
            MAX_FILE_SIZE,
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    // Check file extension
    let ext_lower = ext.to_lowercase();
    if !SUPPORTED_FORMATS.contains(&ext_lower.as_str()) {
        return Err(AppError::validation(format!(
            "Unsupported file format '{}'. Supported: {}",
            ext_lower,
            SUPPORTED_FORMATS.join(", ")
        )));
    }

    // Verify it's actually an image by trying to load it
    if let Err(e) = image::load_from_memory(data) {
        return Err(AppError::validation(format!(
            "Invalid image file ({}): {}",
            ext_lower, e
        )));
    }

    Ok(())
}

/// Re-encode as JPEG with a fixed quality
fn compress_image(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::validation(format!("Invalid image: {}", e)))?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img
            .write_with_encoder(encoder)
            .map_err(|e| AppError::internal(format!("Failed to compress image: {}", e)))?;
    }

    Ok(buffer)
}

/// Reject anything that could escape the images directory
fn sanitize_filename(filename: &str) -> Result<(), AppError> {
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
    {
        return Err(AppError::validation(format!(
            "Invalid filename: {}",
            filename
        )));
    }
    Ok(())
}

// =============================================================================
// Admin Handlers
// =============================================================================

/// POST /api/admin/rooms/{room_id}/images - 上传房源图片
///
/// Multipart fields:
/// - `file`: the image itself (required)
/// - `is_primary`: "true" to make this the cover photo (optional)
pub async fn add_room_image(
    State(state): State<ServerState>,
    Path(room_id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<Json<RoomImage>> {
    let repo = RoomRepository::new(state.get_db());
    let room = repo
        .find_by_id(&room_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Room {}", room_id)))?;
    let room_thing = room
        .id
        .ok_or_else(|| AppError::internal("Room record without id"))?;

    // Walk the multipart fields
    let mut field_data: Option<Vec<u8>> = None;
    let mut original_filename: Option<String> = None;
    let mut is_primary = false;

    while let Some(f) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {}", e)))?
    {
        let name = f.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("file") | Some("") => {
                original_filename = f.file_name().map(|s| s.to_string());
                field_data = Some(
                    f.bytes()
                        .await
                        .map_err(|e| AppError::validation(format!("Multipart error: {}", e)))?
                        .to_vec(),
                );
            }
            Some("is_primary") => {
                let text = f
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Multipart error: {}", e)))?;
                is_primary = text.trim() == "true" || text.trim() == "1";
            }
            _ => {}
        }
    }

    let data = field_data.ok_or_else(|| {
        AppError::validation("No 'file' field found. Field name must be 'file'".to_string())
    })?;

    if data.is_empty() {
        return Err(AppError::validation("Empty file provided".to_string()));
    }

    let filename = original_filename
        .ok_or_else(|| AppError::validation("No filename provided in file field".to_string()))?;

    // Extract file extension
    let ext = PathBuf::from(&filename)
        .extension()
        .and_then(|ext| ext.to_str().map(|s| s.to_string()))
        .ok_or_else(|| AppError::validation(format!("Invalid file extension for: {}", filename)))?;

    // Validate and compress
    validate_image(&data, &ext)?;
    let compressed_data = compress_image(&data)?;

    // Content hash doubles as the filename, deduplicating identical uploads
    let file_hash = calculate_hash(&compressed_data);
    let stored_filename = format!("{}.jpg", file_hash);

    let images_dir = state.config.images_dir();
    fs::create_dir_all(&images_dir)
        .map_err(|e| AppError::internal(format!("Failed to create images directory: {}", e)))?;

    let file_path = images_dir.join(&stored_filename);
    if file_path.exists() {
        tracing::info!(
            original_name = %filename,
            existing_file = %stored_filename,
            "Duplicate image detected, reusing existing file"
        );
    } else {
        fs::write(&file_path, &compressed_data)
            .map_err(|e| AppError::internal(format!("Failed to save file: {}", e)))?;
    }

    let url = format!("/uploads/images/{}", stored_filename);
    let created = repo
        .add_image(RoomImage {
            id: None,
            room: room_thing,
            url,
            is_primary,
        })
        .await?;

    tracing::info!(
        room = %room_id,
        original_name = %filename,
        size = compressed_data.len(),
        hash = %file_hash,
        "Room image uploaded"
    );

    Ok(Json(created))
}

/// DELETE /api/admin/rooms/{room_id}/images/{image_id} - 删除房源图片
pub async fn delete_room_image(
    State(state): State<ServerState>,
    Path((room_id, image_id)): Path<(String, String)>,
) -> AppResult<Json<bool>> {
    let room_thing = parse_id("room", &room_id)?;

    let repo = RoomRepository::new(state.get_db());
    let image = repo
        .find_image_by_id(&image_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Image {}", image_id)))?;

    if image.room != room_thing {
        return Err(AppError::validation(format!(
            "Image {} does not belong to room {}",
            image_id, room_id
        )));
    }

    let deleted = repo.delete_image(&image_id).await?;

    // Remove the file only once no other record references it
    let remaining = repo.count_images_by_url(&deleted.url).await?;
    if remaining == 0
        && let Some(stored_filename) = deleted.url.strip_prefix("/uploads/images/")
        && sanitize_filename(stored_filename).is_ok()
    {
        let file_path = state.config.images_dir().join(stored_filename);
        if let Err(e) = fs::remove_file(&file_path) {
            tracing::warn!(path = %file_path.display(), error = %e, "Failed to remove image file");
        }
    }

    Ok(Json(true))
}

// =============================================================================
// Public Handlers
// =============================================================================

/// GET /uploads/images/{filename} - 读取房源图片
pub async fn get_image(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    sanitize_filename(&filename)?;

    let file_path = state.config.images_dir().join(&filename);
    let data = fs::read(&file_path)
        .map_err(|_| AppError::not_found(format!("Image {}", filename)))?;

    let mime = mime_guess::from_path(&filename)
        .first_or_octet_stream()
        .to_string();

    Ok(([(header::CONTENT_TYPE, mime)], data).into_response())
}
