use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::entities::{ListingId, Photo, PhotoId, Video, VideoId};
use crate::domain::value_objects::MediaFile;

/// Failures reported by the remote listing-media API
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetStoreError {
    #[error("Upload rejected: {message}")]
    UploadRejected { message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },
}

impl AssetStoreError {
    /// Get the error type for logging
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::UploadRejected { .. } => "upload_rejected",
            Self::Network { .. } => "network",
            Self::Conflict { .. } => "conflict",
            Self::NotFound { .. } => "not_found",
            Self::Unauthorized { .. } => "unauthorized",
            Self::InvalidResponse { .. } => "invalid_response",
        }
    }
}

/// A one-time upload target allocated together with a pending video record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoUploadSession {
    pub video_id: VideoId,
    pub upload_url: String,
}

/// Bytes pushed so far for one binary upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub sent: u64,
    pub total: u64,
}

impl UploadProgress {
    /// Rounded percentage in `0..=100`; an empty body counts as complete
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let sent = self.sent.min(self.total);
        ((sent * 100 + self.total / 2) / self.total) as u8
    }

    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let fraction = self.sent.min(self.total) as f64 / self.total as f64;
        fraction
    }
}

pub type ProgressCallback = Arc<dyn Fn(UploadProgress) + Send + Sync>;

/// Contract to the remote store holding a listing's photos and videos.
///
/// Plain request/response mapping; retry policy belongs to callers.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Photos in display order
    async fn list_photos(&self, listing: &ListingId) -> Result<Vec<Photo>, AssetStoreError>;

    async fn list_videos(&self, listing: &ListingId) -> Result<Vec<Video>, AssetStoreError>;

    /// Upload a photo; the server appends it after the current last position
    async fn create_photo(
        &self,
        listing: &ListingId,
        file: &MediaFile,
    ) -> Result<Photo, AssetStoreError>;

    async fn delete_photo(&self, listing: &ListingId, photo: &PhotoId)
    -> Result<(), AssetStoreError>;

    /// Persist a complete ordering. Fails with `Conflict` unless `ordered_ids`
    /// matches the server's id set exactly.
    async fn reorder_photos(
        &self,
        listing: &ListingId,
        ordered_ids: &[PhotoId],
    ) -> Result<(), AssetStoreError>;

    /// Allocate a pending video record and a single-use upload URL
    async fn create_video_upload_session(
        &self,
        listing: &ListingId,
        title: Option<&str>,
    ) -> Result<VideoUploadSession, AssetStoreError>;

    /// PUT raw bytes to a single-use upload URL
    async fn upload_binary(
        &self,
        upload_url: &str,
        file: &MediaFile,
        on_progress: ProgressCallback,
    ) -> Result<(), AssetStoreError>;

    async fn get_video(&self, listing: &ListingId, video: &VideoId)
    -> Result<Video, AssetStoreError>;

    async fn delete_video(&self, listing: &ListingId, video: &VideoId)
    -> Result<(), AssetStoreError>;

    /// Fetch photos and videos concurrently
    async fn list_media(
        &self,
        listing: &ListingId,
    ) -> Result<(Vec<Photo>, Vec<Video>), AssetStoreError> {
        tokio::try_join!(self.list_photos(listing), self.list_videos(listing))
    }
}
