use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::{
    entities::{ListingId, Video, VideoId},
    repositories::AssetStore,
    value_objects::VideoStatus,
};

/// Receives status transitions observed by the reconciler.
///
/// Called while the reconciler's registry lock is held, which is what makes
/// cancellation final. Implementations must not call back into the
/// reconciler.
pub trait VideoStatusObserver: Send + Sync {
    fn on_status_changed(&self, video: &Video, previous: VideoStatus);
}

type PollMap = HashMap<VideoId, CancellationToken>;

type PollRegistry = Arc<Mutex<PollMap>>;

fn lock_registry(polls: &Mutex<PollMap>) -> MutexGuard<'_, PollMap> {
    polls.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Polls every pending video of one listing until it settles.
///
/// Each video id gets its own task and cancellation token. A poll stops when
/// the remote status becomes `ready` or an error, when the video is cancelled,
/// or when the reconciler is dropped.
pub struct VideoStatusReconciler<S>
where
    S: AssetStore + ?Sized + 'static,
{
    store: Arc<S>,
    listing: ListingId,
    interval: Duration,
    observer: Arc<dyn VideoStatusObserver>,
    polls: PollRegistry,
}

impl<S> VideoStatusReconciler<S>
where
    S: AssetStore + ?Sized + 'static,
{
    pub fn new(
        store: Arc<S>,
        listing: ListingId,
        interval: Duration,
        observer: Arc<dyn VideoStatusObserver>,
    ) -> Self {
        Self { store, listing, interval, observer, polls: Arc::new(Mutex::new(HashMap::new())) }
    }

    /// Start polling `video` if it is pending and not already polled.
    ///
    /// Returns whether a new poll was started. Must be called from within a
    /// tokio runtime.
    pub fn track(&self, video: &Video) -> bool {
        if !video.status.is_pending() {
            return false;
        }

        let token = {
            let mut polls = lock_registry(&self.polls);
            if polls.contains_key(&video.id) {
                return false;
            }
            let token = CancellationToken::new();
            polls.insert(video.id.clone(), token.clone());
            token
        };

        debug!(listing = %self.listing, video_id = %video.id, "Polling video status");

        tokio::spawn(poll_until_settled(PollTask {
            store: self.store.clone(),
            listing: self.listing.clone(),
            video_id: video.id.clone(),
            last_status: video.status,
            interval: self.interval,
            token,
            polls: self.polls.clone(),
            observer: self.observer.clone(),
        }));

        true
    }

    /// Stop polling one video. No notification for it fires after this returns.
    pub fn cancel(&self, video_id: &VideoId) -> bool {
        let mut polls = lock_registry(&self.polls);
        match polls.remove(video_id) {
            Some(token) => {
                token.cancel();
                debug!(listing = %self.listing, video_id = %video_id, "Cancelled video poll");
                true
            }
            None => false,
        }
    }

    /// Stop polling every video not in `keep`
    pub fn retain(&self, keep: &[VideoId]) {
        let mut polls = lock_registry(&self.polls);
        polls.retain(|id, token| {
            let keep = keep.contains(id);
            if !keep {
                token.cancel();
            }
            keep
        });
    }

    /// Stop every poll
    pub fn cancel_all(&self) {
        let mut polls = lock_registry(&self.polls);
        for (_, token) in polls.drain() {
            token.cancel();
        }
    }

    pub fn is_tracking(&self, video_id: &VideoId) -> bool {
        lock_registry(&self.polls).contains_key(video_id)
    }

    pub fn tracked_count(&self) -> usize {
        lock_registry(&self.polls).len()
    }
}

impl<S> Drop for VideoStatusReconciler<S>
where
    S: AssetStore + ?Sized + 'static,
{
    fn drop(&mut self) {
        self.cancel_all();
    }
}

struct PollTask<S: ?Sized> {
    store: Arc<S>,
    listing: ListingId,
    video_id: VideoId,
    last_status: VideoStatus,
    interval: Duration,
    token: CancellationToken,
    polls: PollRegistry,
    observer: Arc<dyn VideoStatusObserver>,
}

async fn poll_until_settled<S>(mut task: PollTask<S>)
where
    S: AssetStore + ?Sized,
{
    // First poll one full interval after tracking starts.
    let mut ticker = interval_at(Instant::now() + task.interval, task.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = task.token.cancelled() => return,
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            biased;
            () = task.token.cancelled() => return,
            result = task.store.get_video(&task.listing, &task.video_id) => result,
        };

        let video = match result {
            Ok(video) => video,
            Err(e) => {
                debug!(
                    listing = %task.listing,
                    video_id = %task.video_id,
                    error_type = e.error_type(),
                    "Video status poll failed, will retry: {}",
                    e
                );
                continue;
            }
        };

        if video.status == task.last_status {
            continue;
        }

        let previous = task.last_status;
        task.last_status = video.status;
        let settled = video.status.is_terminal();

        {
            let mut polls = lock_registry(&task.polls);
            if task.token.is_cancelled() {
                return;
            }
            task.observer.on_status_changed(&video, previous);
            if settled {
                polls.remove(&task.video_id);
            }
        }

        if settled {
            info!(
                listing = %task.listing,
                video_id = %task.video_id,
                status = %video.status,
                "Video processing settled"
            );
            return;
        }

        debug!(
            listing = %task.listing,
            video_id = %task.video_id,
            "Video status {} -> {}",
            previous,
            video.status
        );
    }
}
