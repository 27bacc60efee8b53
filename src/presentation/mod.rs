pub mod public_media;

pub use public_media::{PublicListingMedia, PublicPhoto, PublicVideo};
