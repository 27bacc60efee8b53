use serde::Serialize;
use std::time::Duration;

use crate::domain::{
    entities::{
        MAX_PHOTOS_PER_LISTING, MAX_VIDEOS_PER_LISTING, NEAR_LIMIT_THRESHOLD, Photo, PhotoId, Video,
        VideoId,
    },
    value_objects::VideoStatus,
};

/// Interval between status polls for a pending video
pub const VIDEO_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Largest photo accepted from a drop zone
pub const MAX_PHOTO_SIZE: u64 = 20 * 1024 * 1024;

/// Client-side limits applied to one listing's media
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaPolicy {
    pub max_photos: usize,
    pub max_videos: usize,
    pub max_photo_size: u64,
    pub near_limit_threshold: usize,
    pub poll_interval: Duration,
}

impl Default for MediaPolicy {
    fn default() -> Self {
        Self {
            max_photos: MAX_PHOTOS_PER_LISTING,
            max_videos: MAX_VIDEOS_PER_LISTING,
            max_photo_size: MAX_PHOTO_SIZE,
            near_limit_threshold: NEAR_LIMIT_THRESHOLD,
            poll_interval: VIDEO_POLL_INTERVAL,
        }
    }
}

/// A file that did not make it into the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadFailure {
    pub filename: String,
    pub reason: String,
}

/// Terminal report for one photo batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhotoBatchReport {
    /// Files handed to the uploader
    pub submitted: usize,
    /// Files attempted after the capacity cut
    pub accepted: usize,
    /// Files cut because the listing would exceed its photo limit
    pub dropped: usize,
    pub limit: usize,
    /// Photos created, in upload order
    pub uploaded: Vec<Photo>,
    pub failures: Vec<UploadFailure>,
    /// Files filtered out before upload (wrong type, too large)
    pub excluded: Vec<UploadFailure>,
}

impl PhotoBatchReport {
    pub fn success_count(&self) -> usize {
        self.uploaded.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Warning shown when only part of the batch fits
    pub fn partial_acceptance_warning(&self) -> Option<String> {
        (self.dropped > 0).then(|| {
            format!(
                "Only uploading {} of {} photos (limit: {}); {} not uploaded",
                self.accepted, self.submitted, self.limit, self.dropped
            )
        })
    }

    /// One-line outcome, e.g. "3 photos uploaded, 1 failed"
    pub fn summary(&self) -> String {
        let count = self.success_count();
        let plural = if count == 1 { "" } else { "s" };
        let mut summary = format!("{count} photo{plural} uploaded");
        if !self.failures.is_empty() {
            summary.push_str(&format!(", {} failed", self.failures.len()));
        }
        summary
    }
}

/// Result of a drop-zone filter pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropSelection {
    pub accepted: Vec<crate::domain::value_objects::MediaFile>,
    pub excluded: Vec<UploadFailure>,
}

/// What a reorder gesture ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// Gesture dropped a photo onto itself; nothing was sent
    Unchanged,
    /// New order persisted remotely
    Applied,
}

/// Discrete notifications published by a listing's media view model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEvent {
    PhotosUploaded { count: usize },
    PartialAcceptance { accepted: usize, dropped: usize, limit: usize },
    PhotoUploadFailed { filename: String, reason: String },
    PhotoDeleted { id: PhotoId },
    PhotosReordered { ids: Vec<PhotoId> },
    ReorderReverted { reason: String },
    VideoUploadStarted { filename: String },
    VideoUploaded { video_id: VideoId },
    VideoStatusChanged { video_id: VideoId, previous: VideoStatus, current: VideoStatus },
    VideoReady { video: Video },
    VideoDeleted { id: VideoId },
    RefreshFailed { reason: String },
}
