use std::fmt;
use thiserror::Error;

use crate::domain::{entities::VideoId, repositories::AssetStoreError};

/// Which allowance a capacity error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photos,
    Videos,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Photos => write!(f, "photos"),
            Self::Videos => write!(f, "videos"),
        }
    }
}

/// Errors surfaced to whoever drives a listing's media editor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    #[error("Maximum {limit} {kind} per listing")]
    CapacityExceeded { kind: MediaKind, limit: usize },

    #[error("Please drop image files only")]
    NoImageFiles,

    #[error("Photos must be {limit_mb} MB or smaller")]
    PhotoTooLarge { limit_mb: u64 },

    #[error("Upload rejected: {message}")]
    UploadRejected { message: String },

    #[error("Network error: {message}")]
    Network { message: String },

    /// Bytes did not reach the upload target. The video record stays pending
    /// remotely; a retry needs a new upload session.
    #[error("Upload failed: {message}")]
    UploadFailed { video_id: Option<VideoId>, message: String },

    #[error("Photo order is out of date ({message}); the previous order was restored and nothing changed remotely")]
    Conflict { message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Invalid response from media API: {message}")]
    InvalidResponse { message: String },
}

impl MediaError {
    /// Get the error type for logging
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::CapacityExceeded { .. } => "capacity_exceeded",
            Self::NoImageFiles => "no_image_files",
            Self::PhotoTooLarge { .. } => "photo_too_large",
            Self::UploadRejected { .. } => "upload_rejected",
            Self::Network { .. } => "network",
            Self::UploadFailed { .. } => "upload_failed",
            Self::Conflict { .. } => "conflict",
            Self::NotFound { .. } => "not_found",
            Self::Unauthorized { .. } => "unauthorized",
            Self::InvalidResponse { .. } => "invalid_response",
        }
    }

    /// Errors the user fixes by changing what they submit rather than retrying
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Self::CapacityExceeded { .. }
                | Self::NoImageFiles
                | Self::PhotoTooLarge { .. }
                | Self::UploadRejected { .. }
        )
    }

    /// Transient failures the user may simply re-initiate
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::UploadFailed { .. })
    }
}

impl From<AssetStoreError> for MediaError {
    fn from(error: AssetStoreError) -> Self {
        match error {
            AssetStoreError::UploadRejected { message } => Self::UploadRejected { message },
            AssetStoreError::Network { message } => Self::Network { message },
            AssetStoreError::Conflict { message } => Self::Conflict { message },
            AssetStoreError::NotFound { resource } => Self::NotFound { resource },
            AssetStoreError::Unauthorized { message } => Self::Unauthorized { message },
            AssetStoreError::InvalidResponse { message } => Self::InvalidResponse { message },
        }
    }
}
