use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::domain::value_objects::MediaFile;

const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Error, Debug)]
pub enum FileLoadError {
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Not a regular file: {path}")]
    NotAFile { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Detect MIME type from magic bytes, falling back to the file extension
pub fn detect_content_type(data: &[u8], filename: Option<&str>) -> &'static str {
    if data.len() >= 4 {
        match &data[0..4] {
            [0xFF, 0xD8, 0xFF, ..] => return "image/jpeg",
            [0x89, 0x50, 0x4E, 0x47] => return "image/png",
            [0x47, 0x49, 0x46, 0x38] => return "image/gif",
            [0x52, 0x49, 0x46, 0x46] if data.len() >= 12 && &data[8..12] == b"WEBP" => {
                return "image/webp";
            }
            [0x1A, 0x45, 0xDF, 0xA3] => return "video/webm",
            _ => {}
        }
    }

    // ISO base media: "ftyp" box at offset 4, brand at 8..12
    if data.len() >= 12 && &data[4..8] == b"ftyp" {
        match &data[8..12] {
            b"avif" | b"avis" => return "image/avif",
            b"heic" | b"heix" | b"mif1" => return "image/heic",
            b"qt  " => return "video/quicktime",
            _ => return "video/mp4",
        }
    }

    let extension = filename
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("heic") => "image/heic",
        Some("mp4" | "m4v") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mov") => "video/quicktime",
        _ => OCTET_STREAM,
    }
}

/// Read a local file into memory, ready for upload
pub async fn load_media_file(path: impl AsRef<Path>) -> Result<MediaFile, FileLoadError> {
    let path = path.as_ref();

    let metadata = tokio::fs::metadata(path).await.map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            FileLoadError::NotFound { path: path.to_path_buf() }
        } else {
            FileLoadError::Io { path: path.to_path_buf(), source }
        }
    })?;
    if !metadata.is_file() {
        return Err(FileLoadError::NotAFile { path: path.to_path_buf() });
    }

    let data = tokio::fs::read(path)
        .await
        .map_err(|source| FileLoadError::Io { path: path.to_path_buf(), source })?;

    let filename = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
    let content_type = detect_content_type(&data, Some(&filename));

    debug!(size = data.len(), content_type, "Loaded {}", filename);

    Ok(MediaFile::new(filename, content_type, data))
}
