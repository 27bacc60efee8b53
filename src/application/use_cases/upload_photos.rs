use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    application::{
        dto::{DropSelection, PhotoBatchReport, UploadFailure},
        error::{MediaError, MediaKind},
    },
    domain::{entities::ListingId, repositories::AssetStore, value_objects::MediaFile},
};

/// Keep image files within the size limit, in drop order
pub fn select_droppable_photos(files: Vec<MediaFile>, max_photo_size: u64) -> DropSelection {
    let mut selection = DropSelection::default();

    for file in files {
        if !file.is_image() {
            selection.excluded.push(UploadFailure {
                reason: format!("{} is not an image", file.content_type),
                filename: file.filename,
            });
        } else if file.size() > max_photo_size {
            selection.excluded.push(UploadFailure {
                reason: format!("File is larger than {} MB", max_photo_size / (1024 * 1024)),
                filename: file.filename,
            });
        } else {
            selection.accepted.push(file);
        }
    }

    selection
}

/// Use case for uploading a batch of photos to one listing
///
/// Files are uploaded one at a time so the server, which appends in arrival
/// order, assigns positions in submission order. A failed file never stops
/// the rest of the batch.
pub struct UploadPhotosUseCase<S>
where
    S: AssetStore + ?Sized,
{
    store: Arc<S>,
    max_photos: usize,
}

impl<S> UploadPhotosUseCase<S>
where
    S: AssetStore + ?Sized,
{
    pub fn new(store: Arc<S>, max_photos: usize) -> Self {
        Self { store, max_photos }
    }

    /// Upload `files` to a listing that currently holds `current_count` photos
    ///
    /// # Errors
    /// * `CapacityExceeded` - the listing has no free photo slot
    ///
    /// Per-file failures are collected in the report instead.
    pub async fn execute(
        &self,
        listing: &ListingId,
        current_count: usize,
        files: Vec<MediaFile>,
    ) -> Result<PhotoBatchReport, MediaError> {
        let remaining = self.max_photos.saturating_sub(current_count);
        if remaining == 0 {
            warn!(
                listing = %listing,
                current_count,
                "Rejecting photo batch, listing is at its {} photo limit",
                self.max_photos
            );
            return Err(MediaError::CapacityExceeded {
                kind: MediaKind::Photos,
                limit: self.max_photos,
            });
        }

        let submitted = files.len();
        let mut accepted = files;
        accepted.truncate(remaining);

        let mut report = PhotoBatchReport {
            submitted,
            accepted: accepted.len(),
            dropped: submitted - accepted.len(),
            limit: self.max_photos,
            ..PhotoBatchReport::default()
        };

        if let Some(warning) = report.partial_acceptance_warning() {
            warn!(listing = %listing, dropped = report.dropped, "{}", warning);
        }

        info!(listing = %listing, count = report.accepted, "Uploading photo batch");

        for file in &accepted {
            match self.store.create_photo(listing, file).await {
                Ok(photo) => {
                    info!(
                        listing = %listing,
                        photo_id = %photo.id,
                        position = photo.position,
                        "Uploaded {}",
                        file.filename
                    );
                    report.uploaded.push(photo);
                }
                Err(e) => {
                    warn!(
                        listing = %listing,
                        error_type = e.error_type(),
                        "Failed to upload {}: {}",
                        file.filename,
                        e
                    );
                    report
                        .failures
                        .push(UploadFailure { filename: file.filename.clone(), reason: e.to_string() });
                }
            }
        }

        info!(
            listing = %listing,
            uploaded = report.success_count(),
            failed = report.failure_count(),
            "Photo batch completed"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::repositories::AssetStoreError,
        test_utils::mocks::{InMemoryAssetStore, image_file, listing_id},
    };
    use claims::{assert_err, assert_ok};

    fn batch(count: usize) -> Vec<MediaFile> {
        (0..count).map(|i| image_file(&format!("photo-{i}.jpg"))).collect()
    }

    #[tokio::test]
    async fn test_batch_truncated_to_remaining_capacity() {
        let store = Arc::new(InMemoryAssetStore::new().with_photo_count(48));
        let use_case = UploadPhotosUseCase::new(store.clone(), 50);

        let report = assert_ok!(use_case.execute(&listing_id(), 48, batch(10)).await);

        assert_eq!(report.submitted, 10);
        assert_eq!(report.accepted, 2);
        assert_eq!(report.dropped, 8);
        assert_eq!(report.success_count(), 2);
        assert!(report.partial_acceptance_warning().unwrap().contains("8 not uploaded"));
        assert_eq!(store.create_photo_calls(), 2);

        let names = store.uploaded_filenames();
        assert_eq!(names, vec!["photo-0.jpg", "photo-1.jpg"]);
    }

    #[tokio::test]
    async fn test_full_listing_rejects_whole_batch() {
        let store = Arc::new(InMemoryAssetStore::new().with_photo_count(50));
        let use_case = UploadPhotosUseCase::new(store.clone(), 50);

        let error = assert_err!(use_case.execute(&listing_id(), 50, batch(3)).await);

        assert_eq!(error, MediaError::CapacityExceeded { kind: MediaKind::Photos, limit: 50 });
        assert_eq!(store.create_photo_calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_file_does_not_abort_batch() {
        let store = Arc::new(InMemoryAssetStore::new().fail_photo_upload(
            "photo-1.jpg",
            AssetStoreError::UploadRejected { message: "Unsupported file type".to_string() },
        ));
        let use_case = UploadPhotosUseCase::new(store.clone(), 50);

        let report = assert_ok!(use_case.execute(&listing_id(), 0, batch(3)).await);

        assert_eq!(report.success_count(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].filename, "photo-1.jpg");
        assert!(report.failures[0].reason.contains("Unsupported file type"));
        assert_eq!(store.create_photo_calls(), 3);
    }

    #[tokio::test]
    async fn test_positions_follow_submission_order() {
        let store = Arc::new(InMemoryAssetStore::new());
        let use_case = UploadPhotosUseCase::new(store.clone(), 50);

        let report = assert_ok!(use_case.execute(&listing_id(), 0, batch(4)).await);

        let positions: Vec<u32> = report.uploaded.iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_drop_selection_filters_non_images_and_oversized() {
        let files = vec![
            image_file("front.jpg"),
            MediaFile::new("notes.pdf", "application/pdf", vec![0_u8; 10]),
            MediaFile::new("huge.png", "image/png", vec![0_u8; 2048]),
            image_file("back.jpg"),
        ];

        let selection = select_droppable_photos(files, 1024);

        let accepted: Vec<_> = selection.accepted.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(accepted, vec!["front.jpg", "back.jpg"]);
        let excluded: Vec<_> = selection.excluded.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(excluded, vec!["notes.pdf", "huge.png"]);
    }
}
