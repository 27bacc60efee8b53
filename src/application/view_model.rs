use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::{
    application::{
        dto::{MediaEvent, MediaPolicy, PhotoBatchReport, ReorderOutcome},
        error::{MediaError, MediaKind},
        use_cases::{
            OrderingEngine, ReorderPlan, UploadPhotosUseCase, UploadVideoUseCase,
            VideoStatusObserver, VideoStatusReconciler, select_droppable_photos,
        },
    },
    domain::{
        entities::{
            CapacityStatus, ListingId, MediaSnapshot, PhotoId, Video, VideoId, reassign_positions,
            sort_by_position,
        },
        repositories::{AssetStore, AssetStoreError, ProgressCallback, UploadProgress},
        value_objects::{MediaFile, VideoStatus},
    },
};

const EVENT_CAPACITY: usize = 64;

/// Applies reconciler transitions to the shared snapshot
struct SnapshotObserver {
    state: Arc<watch::Sender<MediaSnapshot>>,
    events: broadcast::Sender<MediaEvent>,
}

impl VideoStatusObserver for SnapshotObserver {
    fn on_status_changed(&self, video: &Video, previous: VideoStatus) {
        // The poll's baseline can lag behind a refresh; compare with the snapshot
        let mut local_previous = previous;
        let modified = self.state.send_if_modified(|snapshot| {
            match snapshot.videos.iter_mut().find(|v| v.id == video.id) {
                Some(slot) if slot != video => {
                    local_previous = slot.status;
                    *slot = video.clone();
                    true
                }
                _ => false,
            }
        });
        if !modified || local_previous == video.status {
            return;
        }

        let _ = self.events.send(MediaEvent::VideoStatusChanged {
            video_id: video.id.clone(),
            previous: local_previous,
            current: video.status,
        });
        if video.is_ready() {
            let _ = self.events.send(MediaEvent::VideoReady { video: video.clone() });
        }
    }
}

/// Session-scoped owner of one listing's photos and videos.
///
/// Holds the only local copy of the listing's media, publishes it through a
/// watch channel and discrete events through a broadcast channel, and keeps
/// pending videos polled until they settle. A failed mutation leaves the
/// snapshot as it was, except for the brief optimistic window of a reorder.
pub struct MediaViewModel<S>
where
    S: AssetStore + ?Sized + 'static,
{
    listing: ListingId,
    store: Arc<S>,
    policy: MediaPolicy,
    state: Arc<watch::Sender<MediaSnapshot>>,
    events: broadcast::Sender<MediaEvent>,
    photo_uploader: UploadPhotosUseCase<S>,
    video_uploader: UploadVideoUseCase<S>,
    ordering: OrderingEngine<S>,
    reconciler: VideoStatusReconciler<S>,
}

impl<S> MediaViewModel<S>
where
    S: AssetStore + ?Sized + 'static,
{
    /// Create an empty view model. Call [`Self::refresh`] to load the listing.
    pub fn new(listing: ListingId, store: Arc<S>, policy: MediaPolicy) -> Self {
        let (state, _) = watch::channel(MediaSnapshot::default());
        let state = Arc::new(state);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let observer = Arc::new(SnapshotObserver { state: state.clone(), events: events.clone() });

        Self {
            photo_uploader: UploadPhotosUseCase::new(store.clone(), policy.max_photos),
            video_uploader: UploadVideoUseCase::new(store.clone(), policy.max_videos),
            ordering: OrderingEngine::new(store.clone()),
            reconciler: VideoStatusReconciler::new(
                store.clone(),
                listing.clone(),
                policy.poll_interval,
                observer,
            ),
            listing,
            store,
            policy,
            state,
            events,
        }
    }

    /// Create a view model and load the listing's current media
    pub async fn open(listing: ListingId, store: Arc<S>, policy: MediaPolicy) -> Result<Self, MediaError> {
        let view_model = Self::new(listing, store, policy);
        view_model.refresh().await?;
        Ok(view_model)
    }

    pub fn listing(&self) -> &ListingId {
        &self.listing
    }

    pub fn policy(&self) -> &MediaPolicy {
        &self.policy
    }

    /// Current photos (display order) and videos
    pub fn snapshot(&self) -> MediaSnapshot {
        self.state.borrow().clone()
    }

    /// Watch the snapshot; a new value is published only when it changes
    pub fn subscribe(&self) -> watch::Receiver<MediaSnapshot> {
        self.state.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<MediaEvent> {
        self.events.subscribe()
    }

    pub fn photo_capacity(&self) -> CapacityStatus {
        let count = self.state.borrow().photos.len();
        CapacityStatus::new(count, self.policy.max_photos, self.policy.near_limit_threshold)
    }

    pub fn video_capacity(&self) -> CapacityStatus {
        let count = self.state.borrow().videos.len();
        CapacityStatus::new(count, self.policy.max_videos, 0)
    }

    pub fn is_polling(&self, video: &VideoId) -> bool {
        self.reconciler.is_tracking(video)
    }

    /// Replace photos and videos with the store's copy and restart polling for
    /// every pending video
    pub async fn refresh(&self) -> Result<(), MediaError> {
        let (mut photos, videos) = self.store.list_media(&self.listing).await?;
        sort_by_position(&mut photos);

        debug!(
            listing = %self.listing,
            photos = photos.len(),
            videos = videos.len(),
            "Refreshed listing media"
        );

        self.state.send_if_modified(|snapshot| {
            let changed = snapshot.photos != photos || snapshot.videos != videos;
            snapshot.photos = photos;
            snapshot.videos = videos;
            changed
        });
        self.track_pending_videos();
        Ok(())
    }

    pub async fn refresh_photos(&self) -> Result<(), MediaError> {
        let mut photos = self.store.list_photos(&self.listing).await?;
        sort_by_position(&mut photos);

        self.state.send_if_modified(|snapshot| {
            let changed = snapshot.photos != photos;
            snapshot.photos = photos;
            changed
        });
        Ok(())
    }

    pub async fn refresh_videos(&self) -> Result<(), MediaError> {
        let videos = self.store.list_videos(&self.listing).await?;

        self.state.send_if_modified(|snapshot| {
            let changed = snapshot.videos != videos;
            snapshot.videos = videos;
            changed
        });
        self.track_pending_videos();
        Ok(())
    }

    /// Upload a batch of photos, keeping only as many as the listing has room for
    ///
    /// # Errors
    /// * `CapacityExceeded` - the gallery is already full; nothing is uploaded
    ///
    /// Per-file failures are reported in the returned batch report.
    pub async fn add_photos(&self, files: Vec<MediaFile>) -> Result<PhotoBatchReport, MediaError> {
        let current_count = self.state.borrow().photos.len();
        let report = self.photo_uploader.execute(&self.listing, current_count, files).await?;

        if report.dropped > 0 {
            self.emit(MediaEvent::PartialAcceptance {
                accepted: report.accepted,
                dropped: report.dropped,
                limit: report.limit,
            });
        }
        for failure in &report.failures {
            self.emit(MediaEvent::PhotoUploadFailed {
                filename: failure.filename.clone(),
                reason: failure.reason.clone(),
            });
        }

        if report.success_count() > 0 {
            self.state.send_modify(|snapshot| {
                snapshot.photos.extend(report.uploaded.iter().cloned());
                reassign_positions(&mut snapshot.photos);
            });
            self.emit(MediaEvent::PhotosUploaded { count: report.success_count() });
            self.settle_photos().await;
        }

        info!(listing = %self.listing, "{}", report.summary());
        Ok(report)
    }

    /// Filter a drag-and-drop set down to acceptable images, then upload them
    ///
    /// # Errors
    /// * `NoImageFiles` - nothing in the drop was an image
    /// * `PhotoTooLarge` - every image in the drop was over the size limit
    /// * `CapacityExceeded` - the gallery is already full
    pub async fn add_dropped_photos(
        &self,
        files: Vec<MediaFile>,
    ) -> Result<PhotoBatchReport, MediaError> {
        let any_image = files.iter().any(MediaFile::is_image);
        let selection = select_droppable_photos(files, self.policy.max_photo_size);
        if selection.accepted.is_empty() {
            if any_image {
                return Err(MediaError::PhotoTooLarge {
                    limit_mb: self.policy.max_photo_size / (1024 * 1024),
                });
            }
            return Err(MediaError::NoImageFiles);
        }

        for excluded in &selection.excluded {
            debug!(listing = %self.listing, "Skipping {}: {}", excluded.filename, excluded.reason);
        }

        let mut report = self.add_photos(selection.accepted).await?;
        report.excluded = selection.excluded;
        Ok(report)
    }

    /// Delete a photo. A photo that is already gone counts as deleted.
    pub async fn delete_photo(&self, photo: &PhotoId) -> Result<(), MediaError> {
        match self.store.delete_photo(&self.listing, photo).await {
            Ok(()) => {}
            Err(AssetStoreError::NotFound { .. }) => {
                debug!(listing = %self.listing, photo_id = %photo, "Photo was already deleted");
            }
            Err(e) => {
                warn!(listing = %self.listing, photo_id = %photo, "Failed to delete photo: {}", e);
                return Err(e.into());
            }
        }

        info!(listing = %self.listing, photo_id = %photo, "Deleted photo");

        self.state.send_if_modified(|snapshot| {
            let before = snapshot.photos.len();
            snapshot.photos.retain(|p| &p.id != photo);
            reassign_positions(&mut snapshot.photos);
            snapshot.photos.len() != before
        });
        self.emit(MediaEvent::PhotoDeleted { id: photo.clone() });
        self.settle_photos().await;
        Ok(())
    }

    /// Move `moved` into the slot held by `target`
    ///
    /// The new order is shown at once and then persisted. If the store refuses
    /// it the previous order comes back, unless a refresh has replaced the list
    /// in the meantime.
    pub async fn reorder(
        &self,
        moved: &PhotoId,
        target: &PhotoId,
    ) -> Result<ReorderOutcome, MediaError> {
        let current = self.state.borrow().photos.clone();
        let Some(plan) = ReorderPlan::new(&current, moved, target)? else {
            return Ok(ReorderOutcome::Unchanged);
        };

        self.state.send_modify(|snapshot| snapshot.photos = plan.speculative.clone());

        match self.ordering.persist(&self.listing, &plan).await {
            Ok(()) => {
                self.emit(MediaEvent::PhotosReordered { ids: plan.ordered_ids() });
                Ok(ReorderOutcome::Applied)
            }
            Err(e) => {
                self.state.send_if_modified(|snapshot| match plan.rollback(&snapshot.photos) {
                    Some(previous) => {
                        snapshot.photos = previous;
                        true
                    }
                    None => false,
                });
                self.emit(MediaEvent::ReorderReverted { reason: e.to_string() });
                Err(e)
            }
        }
    }

    /// Upload one video and start polling it
    ///
    /// Progress is published in the snapshot while the bytes are sent.
    ///
    /// # Errors
    /// * `CapacityExceeded` - the listing already has its maximum number of videos
    /// * `UploadFailed` - the bytes did not arrive; retrying needs a new call
    pub async fn add_video(&self, file: &MediaFile) -> Result<VideoId, MediaError> {
        let current_count = self.state.borrow().videos.len();
        if current_count >= self.policy.max_videos {
            return Err(MediaError::CapacityExceeded {
                kind: MediaKind::Videos,
                limit: self.policy.max_videos,
            });
        }

        self.emit(MediaEvent::VideoUploadStarted { filename: file.filename.clone() });

        let state = self.state.clone();
        let on_progress: ProgressCallback = Arc::new(move |progress: UploadProgress| {
            let percent = progress.percent();
            state.send_if_modified(|snapshot| {
                if snapshot.video_upload_progress.is_some_and(|current| current >= percent) {
                    return false;
                }
                snapshot.video_upload_progress = Some(percent);
                true
            });
        });

        let result =
            self.video_uploader.execute(&self.listing, current_count, file, on_progress).await;

        self.state.send_if_modified(|snapshot| snapshot.video_upload_progress.take().is_some());

        let session = result?;

        let pending = Video::pending(session.video_id.clone(), Some(file.filename.clone()));
        self.state.send_modify(|snapshot| {
            if snapshot.video(&pending.id).is_none() {
                snapshot.videos.push(pending.clone());
            }
        });
        self.reconciler.track(&pending);
        self.emit(MediaEvent::VideoUploaded { video_id: session.video_id.clone() });

        if let Err(e) = self.refresh_videos().await {
            self.refresh_failed(&e);
        }

        Ok(session.video_id)
    }

    /// Stop polling a video and delete it. A video that is already gone counts
    /// as deleted.
    pub async fn delete_video(&self, video: &VideoId) -> Result<(), MediaError> {
        let was_polling = self.reconciler.cancel(video);

        match self.store.delete_video(&self.listing, video).await {
            Ok(()) => {}
            Err(AssetStoreError::NotFound { .. }) => {
                debug!(listing = %self.listing, video_id = %video, "Video was already deleted");
            }
            Err(e) => {
                warn!(listing = %self.listing, video_id = %video, "Failed to delete video: {}", e);
                if was_polling {
                    if let Some(existing) = self.snapshot().video(video) {
                        self.reconciler.track(existing);
                    }
                }
                return Err(e.into());
            }
        }

        info!(listing = %self.listing, video_id = %video, "Deleted video");

        self.state.send_if_modified(|snapshot| {
            let before = snapshot.videos.len();
            snapshot.videos.retain(|v| &v.id != video);
            snapshot.videos.len() != before
        });
        self.emit(MediaEvent::VideoDeleted { id: video.clone() });

        if let Err(e) = self.refresh_videos().await {
            self.refresh_failed(&e);
        }
        Ok(())
    }

    /// Cancel every video poll. The snapshot stays readable.
    pub fn shutdown(&self) {
        debug!(listing = %self.listing, polls = self.reconciler.tracked_count(), "Stopping video polls");
        self.reconciler.cancel_all();
    }

    fn track_pending_videos(&self) {
        let snapshot = self.snapshot();
        let pending: Vec<VideoId> = snapshot.pending_videos().map(|v| v.id.clone()).collect();
        self.reconciler.retain(&pending);
        for video in snapshot.pending_videos() {
            self.reconciler.track(video);
        }
    }

    async fn settle_photos(&self) {
        if let Err(e) = self.refresh_photos().await {
            self.refresh_failed(&e);
        }
    }

    fn refresh_failed(&self, error: &MediaError) {
        warn!(
            listing = %self.listing,
            error_type = error.error_type(),
            "Refresh after mutation failed, keeping local copy: {}",
            error
        );
        self.emit(MediaEvent::RefreshFailed { reason: error.to_string() });
    }

    fn emit(&self, event: MediaEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
