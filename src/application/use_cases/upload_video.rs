use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    application::error::{MediaError, MediaKind},
    domain::{
        entities::ListingId,
        repositories::{AssetStore, ProgressCallback, VideoUploadSession},
        value_objects::MediaFile,
    },
};

/// Use case for uploading a single video
///
/// Two steps: allocate a pending record plus a single-use upload URL, then PUT
/// the bytes there. Transcoding happens remotely afterwards, so a successful
/// return only means the bytes arrived.
pub struct UploadVideoUseCase<S>
where
    S: AssetStore + ?Sized,
{
    store: Arc<S>,
    max_videos: usize,
}

impl<S> UploadVideoUseCase<S>
where
    S: AssetStore + ?Sized,
{
    pub fn new(store: Arc<S>, max_videos: usize) -> Self {
        Self { store, max_videos }
    }

    /// Execute the upload for a listing that currently holds `current_count` videos
    ///
    /// # Errors
    /// * `CapacityExceeded` - the listing already has its maximum number of videos;
    ///   no session is created
    /// * `UploadRejected` - the file is not a video
    /// * any store error from session creation, unchanged
    /// * `UploadFailed` - the bytes could not be sent; the remote record stays pending
    pub async fn execute(
        &self,
        listing: &ListingId,
        current_count: usize,
        file: &MediaFile,
        on_progress: ProgressCallback,
    ) -> Result<VideoUploadSession, MediaError> {
        if current_count >= self.max_videos {
            warn!(
                listing = %listing,
                current_count,
                "Rejecting video upload, listing is at its {} video limit",
                self.max_videos
            );
            return Err(MediaError::CapacityExceeded {
                kind: MediaKind::Videos,
                limit: self.max_videos,
            });
        }

        if !file.is_video() {
            return Err(MediaError::UploadRejected {
                message: format!("{} is not a video ({})", file.filename, file.content_type),
            });
        }

        let session =
            self.store.create_video_upload_session(listing, Some(&file.filename)).await?;

        info!(
            listing = %listing,
            video_id = %session.video_id,
            size = file.size(),
            "Created video upload session for {}",
            file.filename
        );

        if let Err(e) = self.store.upload_binary(&session.upload_url, file, on_progress).await {
            warn!(
                listing = %listing,
                video_id = %session.video_id,
                "Video upload failed, record stays pending: {}",
                e
            );
            return Err(MediaError::UploadFailed {
                video_id: Some(session.video_id),
                message: e.to_string(),
            });
        }

        info!(listing = %listing, video_id = %session.video_id, "Video bytes uploaded");

        Ok(session)
    }
}
