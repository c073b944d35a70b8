// src/services/upload_services.rs
use std::path::{Path, PathBuf};

use actix_files::NamedFile;
use chrono::Utc;
use mime::Mime;
use rand::Rng;

use crate::error::{ApiError, ApiResult};

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Local disk storage for post images.
#[derive(Clone, Debug)]
pub struct UploadService {
    dir: PathBuf,
}

impl UploadService {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Returns the part's type when it is an image.
    pub fn check_content_type(content_type: Option<&Mime>) -> ApiResult<Mime> {
        match content_type {
            Some(ct) if ct.type_() == mime::IMAGE => Ok(ct.clone()),
            _ => Err(ApiError::validation("Only image files are allowed!")),
        }
    }

    pub fn check_size(len: usize) -> ApiResult<()> {
        if len > MAX_IMAGE_BYTES {
            return Err(ApiError::validation("File too large. Maximum size is 5MB"));
        }
        Ok(())
    }

    /// Writes the image under a fresh name and returns its public URL path.
    pub async fn store(
        &self,
        original_name: Option<&str>,
        content_type: &Mime,
        bytes: &[u8],
    ) -> ApiResult<String> {
        Self::check_size(bytes.len())?;

        let suffix: u64 = rand::thread_rng().gen_range(0..1_000_000_000);
        let filename = stored_file_name(
            original_name,
            content_type,
            Utc::now().timestamp_millis(),
            suffix,
        );
        let path = self.dir.join(&filename);

        tokio::fs::write(&path, bytes).await.map_err(|e| {
            ApiError::Internal(format!("failed to write {}: {}", path.display(), e))
        })?;

        log::info!("stored upload {} ({} bytes)", filename, bytes.len());
        Ok(format!("{}/{}", PUBLIC_PREFIX, filename))
    }

    /// Opens a stored file for streaming. Only the last path component of
    /// `filename` is used, so a request cannot escape the upload directory.
    pub async fn open(&self, filename: &str) -> Option<NamedFile> {
        let safe = Path::new(filename).file_name()?;
        NamedFile::open_async(self.dir.join(safe))
            .await
            .ok()
            .filter(|file| file.metadata().is_file())
    }
}

fn stored_file_name(original: Option<&str>, content_type: &Mime, millis: i64, suffix: u64) -> String {
    let ext = original
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(sanitize_extension)
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| sanitize_extension(content_type.subtype().as_str()));

    if ext.is_empty() {
        format!("image-{}-{}", millis, suffix)
    } else {
        format!("image-{}-{}.{}", millis, suffix, ext)
    }
}

fn sanitize_extension(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(10)
        .collect::<String>()
        .to_ascii_lowercase()
}
