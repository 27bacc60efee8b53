#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_errors_doc)]

//! Listing Media
//!
//! Media ingestion for property listings: batch photo uploads under a
//! per-listing cap, optimistic gallery reordering with rollback, direct video
//! uploads, and polling of remote video transcoding until each video settles.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use application::dto::*;
pub use application::error::{MediaError, MediaKind};
pub use application::view_model::MediaViewModel;
pub use domain::entities::*;
pub use domain::repositories::{AssetStore, AssetStoreError, UploadProgress, VideoUploadSession};
pub use domain::value_objects::*;
