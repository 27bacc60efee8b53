#[cfg(test)]
pub mod mocks {
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::sync::{Arc, Mutex};

    use crate::domain::{
        entities::{ListingId, Photo, PhotoId, Video, VideoId, reassign_positions},
        repositories::{
            AssetStore, AssetStoreError, ProgressCallback, UploadProgress, VideoUploadSession,
        },
        value_objects::{MediaFile, VideoStatus},
    };

    type ScriptedStatuses = HashMap<VideoId, VecDeque<Result<VideoStatus, AssetStoreError>>>;

    pub fn listing_id() -> ListingId {
        ListingId::from("listing-1")
    }

    pub fn image_file(name: &str) -> MediaFile {
        MediaFile::new(name, "image/jpeg", vec![0xFF_u8, 0xD8, 0xFF, 0xE0])
    }

    pub fn video_file(name: &str) -> MediaFile {
        MediaFile::new(name, "video/mp4", vec![0_u8; 1000])
    }

    pub fn photo(id: &str, position: u32) -> Photo {
        Photo::new(
            id,
            format!("https://img.test/{id}/public"),
            format!("https://img.test/{id}/thumbnail"),
            position,
        )
    }

    /// Photos with the given ids at positions `0..N-1`
    pub fn gallery(ids: &[&str]) -> Vec<Photo> {
        ids.iter().enumerate().map(|(position, id)| photo(id, position as u32)).collect()
    }

    pub fn pending_video(id: &str) -> Video {
        Video::pending(VideoId::from(id), Some(format!("{id}.mp4")))
    }

    #[derive(Default)]
    struct StoreState {
        photos: Vec<Photo>,
        videos: Vec<Video>,
        next_id: u64,
        create_photo_calls: usize,
        uploaded_filenames: Vec<String>,
        photo_upload_failures: HashMap<String, AssetStoreError>,
        reorder_requests: Vec<Vec<PhotoId>>,
        reorder_failure: Option<AssetStoreError>,
        delete_photo_failure: Option<AssetStoreError>,
        list_photos_failure: Option<AssetStoreError>,
        session_calls: usize,
        session_failure: Option<AssetStoreError>,
        uploaded_urls: Vec<String>,
        upload_binary_failure: Option<AssetStoreError>,
        scripted_statuses: ScriptedStatuses,
        get_video_calls: HashMap<VideoId, usize>,
        delete_video_failure: Option<AssetStoreError>,
    }

    /// In-memory listing media store with call counters and failure injection
    #[derive(Clone, Default)]
    pub struct InMemoryAssetStore {
        state: Arc<Mutex<StoreState>>,
    }

    impl InMemoryAssetStore {
        pub fn new() -> Self {
            Self::default()
        }

        #[must_use]
        pub fn with_photos(self, photos: Vec<Photo>) -> Self {
            self.state.lock().unwrap().photos = photos;
            self
        }

        /// Seed `count` photos named `existing-N`
        #[must_use]
        pub fn with_photo_count(self, count: usize) -> Self {
            let photos = (0..count).map(|i| photo(&format!("existing-{i}"), i as u32)).collect();
            self.with_photos(photos)
        }

        #[must_use]
        pub fn with_videos(self, videos: Vec<Video>) -> Self {
            self.state.lock().unwrap().videos = videos;
            self
        }

        /// Queue the results of successive `get_video` calls for one video.
        /// Once the queue runs dry the stored status is returned.
        #[must_use]
        pub fn script_statuses(
            self,
            video: &str,
            statuses: Vec<Result<VideoStatus, AssetStoreError>>,
        ) -> Self {
            self.state
                .lock()
                .unwrap()
                .scripted_statuses
                .insert(VideoId::from(video), statuses.into());
            self
        }

        #[must_use]
        pub fn fail_photo_upload(self, filename: &str, error: AssetStoreError) -> Self {
            self.state.lock().unwrap().photo_upload_failures.insert(filename.to_string(), error);
            self
        }

        #[must_use]
        pub fn fail_reorder(self, error: AssetStoreError) -> Self {
            self.state.lock().unwrap().reorder_failure = Some(error);
            self
        }

        #[must_use]
        pub fn fail_delete_photo(self, error: AssetStoreError) -> Self {
            self.state.lock().unwrap().delete_photo_failure = Some(error);
            self
        }

        #[must_use]
        pub fn fail_session(self, error: AssetStoreError) -> Self {
            self.state.lock().unwrap().session_failure = Some(error);
            self
        }

        #[must_use]
        pub fn fail_upload_binary(self, error: AssetStoreError) -> Self {
            self.state.lock().unwrap().upload_binary_failure = Some(error);
            self
        }

        #[must_use]
        pub fn fail_delete_video(self, error: AssetStoreError) -> Self {
            self.state.lock().unwrap().delete_video_failure = Some(error);
            self
        }

        /// Make every later photo listing fail; can be armed after setup
        pub fn fail_list_photos(&self, error: AssetStoreError) {
            self.state.lock().unwrap().list_photos_failure = Some(error);
        }

        /// Change a stored video's status as a later listing or poll would see it
        pub fn set_video_status(&self, video: &str, status: VideoStatus) {
            let mut state = self.state.lock().unwrap();
            if let Some(stored) = state.videos.iter_mut().find(|v| v.id.as_str() == video) {
                stored.status = status;
            }
        }

        pub fn photos(&self) -> Vec<Photo> {
            self.state.lock().unwrap().photos.clone()
        }

        pub fn videos(&self) -> Vec<Video> {
            self.state.lock().unwrap().videos.clone()
        }

        pub fn create_photo_calls(&self) -> usize {
            self.state.lock().unwrap().create_photo_calls
        }

        pub fn uploaded_filenames(&self) -> Vec<String> {
            self.state.lock().unwrap().uploaded_filenames.clone()
        }

        pub fn reorder_requests(&self) -> Vec<Vec<PhotoId>> {
            self.state.lock().unwrap().reorder_requests.clone()
        }

        pub fn session_calls(&self) -> usize {
            self.state.lock().unwrap().session_calls
        }

        pub fn uploaded_urls(&self) -> Vec<String> {
            self.state.lock().unwrap().uploaded_urls.clone()
        }

        pub fn get_video_calls(&self, video: &str) -> usize {
            self.state.lock().unwrap().get_video_calls.get(&VideoId::from(video)).copied().unwrap_or(0)
        }

        fn next_id(state: &mut StoreState, prefix: &str) -> String {
            state.next_id += 1;
            format!("{prefix}-{}", state.next_id)
        }
    }

    #[async_trait]
    impl AssetStore for InMemoryAssetStore {
        async fn list_photos(&self, _listing: &ListingId) -> Result<Vec<Photo>, AssetStoreError> {
            let state = self.state.lock().unwrap();
            if let Some(error) = &state.list_photos_failure {
                return Err(error.clone());
            }
            Ok(state.photos.clone())
        }

        async fn list_videos(&self, _listing: &ListingId) -> Result<Vec<Video>, AssetStoreError> {
            Ok(self.state.lock().unwrap().videos.clone())
        }

        async fn create_photo(
            &self,
            _listing: &ListingId,
            file: &MediaFile,
        ) -> Result<Photo, AssetStoreError> {
            let mut state = self.state.lock().unwrap();
            state.create_photo_calls += 1;
            if let Some(error) = state.photo_upload_failures.get(&file.filename) {
                return Err(error.clone());
            }

            let id = Self::next_id(&mut state, "photo");
            let created = photo(&id, state.photos.len() as u32);
            state.photos.push(created.clone());
            state.uploaded_filenames.push(file.filename.clone());
            Ok(created)
        }

        async fn delete_photo(
            &self,
            _listing: &ListingId,
            photo: &PhotoId,
        ) -> Result<(), AssetStoreError> {
            let mut state = self.state.lock().unwrap();
            if let Some(error) = &state.delete_photo_failure {
                return Err(error.clone());
            }

            let before = state.photos.len();
            state.photos.retain(|p| &p.id != photo);
            if state.photos.len() == before {
                return Err(AssetStoreError::NotFound { resource: format!("Photo {photo}") });
            }
            reassign_positions(&mut state.photos);
            Ok(())
        }

        async fn reorder_photos(
            &self,
            _listing: &ListingId,
            ordered_ids: &[PhotoId],
        ) -> Result<(), AssetStoreError> {
            let mut state = self.state.lock().unwrap();
            state.reorder_requests.push(ordered_ids.to_vec());
            if let Some(error) = &state.reorder_failure {
                return Err(error.clone());
            }

            let mut reordered = Vec::with_capacity(ordered_ids.len());
            for id in ordered_ids {
                let Some(found) = state.photos.iter().find(|p| &p.id == id) else {
                    return Err(AssetStoreError::Conflict {
                        message: "Photo ids do not match listing".to_string(),
                    });
                };
                reordered.push(found.clone());
            }
            if reordered.len() != state.photos.len() {
                return Err(AssetStoreError::Conflict {
                    message: "Photo ids do not match listing".to_string(),
                });
            }
            reassign_positions(&mut reordered);
            state.photos = reordered;
            Ok(())
        }

        async fn create_video_upload_session(
            &self,
            _listing: &ListingId,
            title: Option<&str>,
        ) -> Result<VideoUploadSession, AssetStoreError> {
            let mut state = self.state.lock().unwrap();
            state.session_calls += 1;
            if let Some(error) = &state.session_failure {
                return Err(error.clone());
            }

            let video_id = VideoId::from(Self::next_id(&mut state, "video"));
            state.videos.push(Video::pending(video_id.clone(), title.map(str::to_string)));
            Ok(VideoUploadSession {
                upload_url: format!("https://upload.test/{video_id}"),
                video_id,
            })
        }

        async fn upload_binary(
            &self,
            upload_url: &str,
            file: &MediaFile,
            on_progress: ProgressCallback,
        ) -> Result<(), AssetStoreError> {
            let failure = {
                let mut state = self.state.lock().unwrap();
                state.uploaded_urls.push(upload_url.to_string());
                state.upload_binary_failure.clone()
            };

            let total = file.size();
            on_progress(UploadProgress { sent: 0, total });
            if let Some(error) = failure {
                return Err(error);
            }
            on_progress(UploadProgress { sent: total / 2, total });
            on_progress(UploadProgress { sent: total, total });
            Ok(())
        }

        async fn get_video(
            &self,
            _listing: &ListingId,
            video: &VideoId,
        ) -> Result<Video, AssetStoreError> {
            let mut state = self.state.lock().unwrap();
            *state.get_video_calls.entry(video.clone()).or_default() += 1;

            let scripted = state.scripted_statuses.get_mut(video).and_then(VecDeque::pop_front);
            let stored = state
                .videos
                .iter_mut()
                .find(|v| &v.id == video)
                .ok_or_else(|| AssetStoreError::NotFound { resource: format!("Video {video}") })?;

            match scripted {
                Some(Ok(status)) => {
                    stored.status = status;
                    if status.is_ready() {
                        stored.asset_id = Some(format!("asset-{video}"));
                        stored.playback_id = Some(format!("pb-{video}"));
                    }
                    Ok(stored.clone())
                }
                Some(Err(error)) => Err(error),
                None => Ok(stored.clone()),
            }
        }

        async fn delete_video(
            &self,
            _listing: &ListingId,
            video: &VideoId,
        ) -> Result<(), AssetStoreError> {
            let mut state = self.state.lock().unwrap();
            if let Some(error) = &state.delete_video_failure {
                return Err(error.clone());
            }

            let before = state.videos.len();
            state.videos.retain(|v| &v.id != video);
            if state.videos.len() == before {
                return Err(AssetStoreError::NotFound { resource: format!("Video {video}") });
            }
            Ok(())
        }
    }
}
