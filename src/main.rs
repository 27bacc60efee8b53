#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use anyhow::{Context, Result};
use clap::Parser;
use listing_media::{
    ListingId, MediaViewModel,
    infrastructure::{
        asset_store::{CredentialProvider, HttpAssetStore, NoCredentials, StaticToken},
        config::AppConfig,
        files::load_media_file,
        logging::init_tracing,
    },
    presentation::PublicListingMedia,
};
use std::{path::PathBuf, sync::Arc};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "listing-media", about = "Load a listing's media, upload photos and follow video processing")]
struct Cli {
    /// Listing whose media to manage
    listing: String,
    /// Photo files to upload to the listing
    photos: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging).context("Failed to initialize logging")?;

    info!(base_url = %config.api.base_url, mode = %config.mode, "Starting listing media session");

    let credentials: Arc<dyn CredentialProvider> = match &config.api.access_token {
        Some(token) => Arc::new(StaticToken::new(token.clone())),
        None => Arc::new(NoCredentials),
    };
    let store = Arc::new(
        HttpAssetStore::new(&config.api, credentials)?
            .with_upload_chunk_size(config.media.upload_chunk_size),
    );

    let view_model =
        MediaViewModel::open(ListingId::from(cli.listing), store, config.media.policy()).await?;

    if !cli.photos.is_empty() {
        let mut files = Vec::with_capacity(cli.photos.len());
        for path in &cli.photos {
            files.push(
                load_media_file(path)
                    .await
                    .with_context(|| format!("Failed to load {}", path.display()))?,
            );
        }

        let report = view_model.add_dropped_photos(files).await?;
        if let Some(warning) = report.partial_acceptance_warning() {
            warn!("{}", warning);
        }
        for skipped in report.excluded.iter().chain(&report.failures) {
            warn!("{}: {}", skipped.filename, skipped.reason);
        }
        info!("{}", report.summary());
    }

    let snapshot = view_model.snapshot();
    let capacity = view_model.photo_capacity();
    info!(
        photos = snapshot.photos.len(),
        videos = snapshot.videos.len(),
        remaining_photo_slots = capacity.remaining,
        near_limit = capacity.near_limit,
        "Listing media loaded"
    );
    info!(
        public_media = %serde_json::to_string(&PublicListingMedia::from_snapshot(&snapshot))?,
        "Public listing media"
    );

    let mut snapshots = view_model.subscribe();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    while snapshots.borrow_and_update().pending_videos().next().is_some() {
        info!("Waiting for pending videos to finish processing");
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Interrupted");
                break;
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    for video in &view_model.snapshot().videos {
        info!(video_id = %video.id, status = %video.status, "{}: {}", video.display_title(), video.status.label());
    }

    view_model.shutdown();
    Ok(())
}
