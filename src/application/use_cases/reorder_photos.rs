use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    application::error::MediaError,
    domain::{
        entities::{ListingId, Photo, PhotoId, photo_ids, reassign_positions},
        repositories::AssetStore,
    },
};

/// Remove the photo at `from` and reinsert it at `to`, shifting everything in
/// between by one. Positions are rewritten to match the new order.
pub fn move_photo(photos: &[Photo], from: usize, to: usize) -> Vec<Photo> {
    let mut reordered = photos.to_vec();
    let moved = reordered.remove(from);
    reordered.insert(to, moved);
    reassign_positions(&mut reordered);
    reordered
}

/// An optimistic reorder: the order shown immediately, and the order to
/// restore if the store refuses it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan {
    pub moved: PhotoId,
    pub target: PhotoId,
    pub previous: Vec<Photo>,
    pub speculative: Vec<Photo>,
}

impl ReorderPlan {
    /// Plan dropping `moved` onto the slot held by `target`
    ///
    /// Returns `Ok(None)` when a photo is dropped onto itself.
    ///
    /// # Errors
    /// * `NotFound` - either id is not in `current`
    pub fn new(
        current: &[Photo],
        moved: &PhotoId,
        target: &PhotoId,
    ) -> Result<Option<Self>, MediaError> {
        if moved == target {
            return Ok(None);
        }

        let position_of = |id: &PhotoId| {
            current
                .iter()
                .position(|photo| &photo.id == id)
                .ok_or_else(|| MediaError::NotFound { resource: format!("Photo {id}") })
        };
        let from = position_of(moved)?;
        let to = position_of(target)?;

        Ok(Some(Self {
            moved: moved.clone(),
            target: target.clone(),
            previous: current.to_vec(),
            speculative: move_photo(current, from, to),
        }))
    }

    /// Complete ordered id list sent to the store
    pub fn ordered_ids(&self) -> Vec<PhotoId> {
        photo_ids(&self.speculative)
    }

    /// The order to show after the store rejected this plan.
    ///
    /// Restores `previous` only while `current` still shows this plan's
    /// speculative order. If an authoritative refresh replaced the list in the
    /// meantime, that list stands and `None` is returned.
    pub fn rollback(&self, current: &[Photo]) -> Option<Vec<Photo>> {
        (current == self.speculative.as_slice()).then(|| self.previous.clone())
    }
}

/// Persists optimistic reorders for one store
pub struct OrderingEngine<S>
where
    S: AssetStore + ?Sized,
{
    store: Arc<S>,
}

impl<S> OrderingEngine<S>
where
    S: AssetStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Send the plan's full order to the store
    pub async fn persist(&self, listing: &ListingId, plan: &ReorderPlan) -> Result<(), MediaError> {
        let ordered_ids = plan.ordered_ids();
        match self.store.reorder_photos(listing, &ordered_ids).await {
            Ok(()) => {
                info!(
                    listing = %listing,
                    moved = %plan.moved,
                    target = %plan.target,
                    "Persisted photo order"
                );
                Ok(())
            }
            Err(e) => {
                warn!(
                    listing = %listing,
                    moved = %plan.moved,
                    error_type = e.error_type(),
                    "Failed to persist photo order: {}",
                    e
                );
                Err(e.into())
            }
        }
    }
}
