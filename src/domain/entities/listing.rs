use serde::{Deserialize, Serialize};

use super::photo::{Photo, string_id};
use super::video::{Video, VideoId};

string_id!(
    /// Unique identifier for a property listing
    ListingId
);

/// Photos allowed per listing
pub const MAX_PHOTOS_PER_LISTING: usize = 50;

/// Videos allowed per listing
pub const MAX_VIDEOS_PER_LISTING: usize = 2;

/// How close to the cap a gallery must be before editors are warned
pub const NEAR_LIMIT_THRESHOLD: usize = 5;

/// Read-only view of a listing's media at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaSnapshot {
    /// Photos in display order
    pub photos: Vec<Photo>,
    pub videos: Vec<Video>,
    /// Percentage of the in-flight video upload, if any
    pub video_upload_progress: Option<u8>,
}

impl MediaSnapshot {
    /// The gallery cover
    #[must_use]
    pub fn hero(&self) -> Option<&Photo> {
        self.photos.first()
    }

    #[must_use]
    pub fn video(&self, id: &VideoId) -> Option<&Video> {
        self.videos.iter().find(|video| &video.id == id)
    }

    #[must_use]
    pub fn pending_videos(&self) -> impl Iterator<Item = &Video> {
        self.videos.iter().filter(|video| video.status.is_pending())
    }
}

/// How full a listing's photo or video allowance is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityStatus {
    pub count: usize,
    pub limit: usize,
    pub remaining: usize,
    pub at_limit: bool,
    pub near_limit: bool,
}

impl CapacityStatus {
    #[must_use]
    pub fn new(count: usize, limit: usize, near_threshold: usize) -> Self {
        let remaining = limit.saturating_sub(count);
        let at_limit = remaining == 0;
        Self {
            count,
            limit,
            remaining,
            at_limit,
            near_limit: !at_limit && count >= limit.saturating_sub(near_threshold),
        }
    }
}
