use serde::{Deserialize, Serialize};

/// Declares an opaque, server-assigned string identifier
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

pub(crate) use string_id;

string_id!(
    /// Unique identifier for a listing photo
    PhotoId
);

/// A gallery photo. `position` is the display rank; position 0 is the hero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    pub url: String,
    pub thumbnail_url: String,
    pub position: u32,
}

impl Photo {
    #[must_use]
    pub fn new(
        id: impl Into<PhotoId>,
        url: impl Into<String>,
        thumbnail_url: impl Into<String>,
        position: u32,
    ) -> Self {
        Self { id: id.into(), url: url.into(), thumbnail_url: thumbnail_url.into(), position }
    }

    /// Check if this photo is the gallery cover
    #[must_use]
    pub fn is_hero(&self) -> bool {
        self.position == 0
    }
}

/// Sort photos into display order
pub fn sort_by_position(photos: &mut [Photo]) {
    photos.sort_by_key(|photo| photo.position);
}

/// Rewrite positions as `0..N-1` following the slice order
pub fn reassign_positions(photos: &mut [Photo]) {
    for (position, photo) in photos.iter_mut().enumerate() {
        photo.position = position as u32;
    }
}

/// Check that the slice is in display order and positions are exactly `0..N-1`
#[must_use]
pub fn has_dense_positions(photos: &[Photo]) -> bool {
    photos.iter().enumerate().all(|(index, photo)| photo.position as usize == index)
}

/// Collect the ids in slice order
#[must_use]
pub fn photo_ids(photos: &[Photo]) -> Vec<PhotoId> {
    photos.iter().map(|photo| photo.id.clone()).collect()
}
