use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{StreamExt, stream};
use reqwest::{
    Client as HttpClient, RequestBuilder, Response, StatusCode,
    header::{CONTENT_LENGTH, CONTENT_TYPE},
    multipart,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{
    CredentialProvider,
    models::{ApiErrorResponse, CreateVideoRequest, ListingDetailResponse, PhotoOrderRequest},
};
use crate::{
    domain::{
        entities::{ListingId, Photo, PhotoId, Video, VideoId},
        repositories::{
            AssetStore, AssetStoreError, ProgressCallback, UploadProgress, VideoUploadSession,
        },
        value_objects::MediaFile,
    },
    infrastructure::config::ApiConfig,
};

const REQUEST_ID_HEADER: &str = "x-request-id";
const DEFAULT_ERROR_MESSAGE: &str = "Request failed";
const DEFAULT_CHUNK_SIZE: usize = 256 * 1024;

/// Map a non-success status and its error message onto the store error taxonomy
pub fn status_error(status: StatusCode, message: String, resource: &str) -> AssetStoreError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            AssetStoreError::Unauthorized { message }
        }
        StatusCode::NOT_FOUND => AssetStoreError::NotFound { resource: resource.to_string() },
        StatusCode::CONFLICT => AssetStoreError::Conflict { message },
        StatusCode::BAD_REQUEST
        | StatusCode::PAYLOAD_TOO_LARGE
        | StatusCode::UNSUPPORTED_MEDIA_TYPE
        | StatusCode::UNPROCESSABLE_ENTITY => AssetStoreError::UploadRejected { message },
        _ => AssetStoreError::Network { message: format!("{message} (status {status})") },
    }
}

/// `AssetStore` backed by the listing media REST API
#[derive(Clone)]
pub struct HttpAssetStore {
    base_url: String,
    http_client: HttpClient,
    credentials: Arc<dyn CredentialProvider>,
    upload_chunk_size: usize,
}

impl HttpAssetStore {
    pub fn new(config: &ApiConfig, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(anyhow!("Listing media API base URL is required"));
        }

        let http_client = HttpClient::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
            credentials,
            upload_chunk_size: DEFAULT_CHUNK_SIZE,
        })
    }

    /// Size of the chunks a video body is streamed in; progress is reported per chunk
    #[must_use]
    pub fn with_upload_chunk_size(mut self, upload_chunk_size: usize) -> Self {
        self.upload_chunk_size = upload_chunk_size.max(1);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Attach auth and a request id, send, and turn non-2xx into an error
    async fn send(
        &self,
        request: RequestBuilder,
        operation: &'static str,
        resource: &str,
    ) -> Result<Response, AssetStoreError> {
        let request_id = Uuid::new_v4();
        let mut request = request.header(REQUEST_ID_HEADER, request_id.to_string());
        if let Some(token) = self.credentials.access_token().await {
            request = request.bearer_auth(token);
        }

        debug!(request_id = %request_id, operation, "Sending listing media request");

        let response = request.send().await.map_err(|e| {
            warn!(request_id = %request_id, operation, "Listing media request failed: {}", e);
            AssetStoreError::Network { message: e.to_string() }
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(request_id = %request_id, operation, status = status.as_u16(), "Request succeeded");
            return Ok(response);
        }

        let message = error_message(response).await;
        warn!(
            request_id = %request_id,
            operation,
            status = status.as_u16(),
            "Listing media API returned an error: {}",
            message
        );
        Err(status_error(status, message, resource))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        operation: &'static str,
        resource: &str,
    ) -> Result<T, AssetStoreError> {
        let response = self.send(self.http_client.get(self.url(path)), operation, resource).await?;
        parse_json(response).await
    }

    async fn listing_detail(
        &self,
        listing: &ListingId,
    ) -> Result<ListingDetailResponse, AssetStoreError> {
        self.get_json(&format!("/listings/{listing}"), "get_listing", &format!("Listing {listing}"))
            .await
    }
}

async fn error_message(response: Response) -> String {
    match response.json::<ApiErrorResponse>().await {
        Ok(body) => {
            let message = body.message();
            if message.is_empty() { DEFAULT_ERROR_MESSAGE.to_string() } else { message }
        }
        Err(_) => DEFAULT_ERROR_MESSAGE.to_string(),
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, AssetStoreError> {
    response.json::<T>().await.map_err(|e| AssetStoreError::InvalidResponse {
        message: format!("Failed to parse response: {e}"),
    })
}

fn chunked(data: &Bytes, chunk_size: usize) -> Vec<Bytes> {
    (0..data.len())
        .step_by(chunk_size)
        .map(|start| data.slice(start..(start + chunk_size).min(data.len())))
        .collect()
}

#[async_trait]
impl AssetStore for HttpAssetStore {
    async fn list_photos(&self, listing: &ListingId) -> Result<Vec<Photo>, AssetStoreError> {
        Ok(self.listing_detail(listing).await?.photos)
    }

    async fn list_videos(&self, listing: &ListingId) -> Result<Vec<Video>, AssetStoreError> {
        Ok(self.listing_detail(listing).await?.videos)
    }

    async fn create_photo(
        &self,
        listing: &ListingId,
        file: &MediaFile,
    ) -> Result<Photo, AssetStoreError> {
        let part = multipart::Part::bytes(file.data.to_vec())
            .file_name(file.filename.clone())
            .mime_str(&file.content_type)
            .map_err(|e| AssetStoreError::UploadRejected {
                message: format!("Invalid content type {}: {e}", file.content_type),
            })?;
        let form = multipart::Form::new().part("file", part);

        let request =
            self.http_client.post(self.url(&format!("/listings/{listing}/photos"))).multipart(form);
        let response = self.send(request, "create_photo", &format!("Listing {listing}")).await?;
        parse_json(response).await
    }

    async fn delete_photo(
        &self,
        listing: &ListingId,
        photo: &PhotoId,
    ) -> Result<(), AssetStoreError> {
        let request =
            self.http_client.delete(self.url(&format!("/listings/{listing}/photos/{photo}")));
        self.send(request, "delete_photo", &format!("Photo {photo}")).await?;
        Ok(())
    }

    async fn reorder_photos(
        &self,
        listing: &ListingId,
        ordered_ids: &[PhotoId],
    ) -> Result<(), AssetStoreError> {
        let request = self
            .http_client
            .put(self.url(&format!("/listings/{listing}/photos/order")))
            .json(&PhotoOrderRequest { photo_ids: ordered_ids });

        // The API answers a stale or partial id list with a validation error
        match self.send(request, "reorder_photos", &format!("Listing {listing}")).await {
            Ok(_) => Ok(()),
            Err(AssetStoreError::UploadRejected { message }) => {
                Err(AssetStoreError::Conflict { message })
            }
            Err(e) => Err(e),
        }
    }

    async fn create_video_upload_session(
        &self,
        listing: &ListingId,
        title: Option<&str>,
    ) -> Result<VideoUploadSession, AssetStoreError> {
        let request = self
            .http_client
            .post(self.url(&format!("/listings/{listing}/videos")))
            .json(&CreateVideoRequest { title });
        let response =
            self.send(request, "create_video_upload_session", &format!("Listing {listing}")).await?;
        parse_json(response).await
    }

    async fn upload_binary(
        &self,
        upload_url: &str,
        file: &MediaFile,
        on_progress: ProgressCallback,
    ) -> Result<(), AssetStoreError> {
        let total = file.size();
        on_progress(UploadProgress { sent: 0, total });

        let progress = on_progress.clone();
        let mut sent = 0_u64;
        let body = stream::iter(chunked(&file.data, self.upload_chunk_size)).map(move |chunk| {
            sent += chunk.len() as u64;
            progress(UploadProgress { sent, total });
            Ok::<_, std::io::Error>(chunk)
        });

        // Signed upload URLs carry their own authorization
        let response = self
            .http_client
            .put(upload_url)
            .header(CONTENT_TYPE, file.content_type.as_str())
            .header(CONTENT_LENGTH, total)
            .body(reqwest::Body::wrap_stream(body))
            .send()
            .await
            .map_err(|e| AssetStoreError::Network { message: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssetStoreError::Network {
                message: format!("Upload failed with status {}", status.as_u16()),
            });
        }

        on_progress(UploadProgress { sent: total, total });
        Ok(())
    }

    async fn get_video(&self, listing: &ListingId, video: &VideoId) -> Result<Video, AssetStoreError> {
        self.get_json(
            &format!("/listings/{listing}/videos/{video}"),
            "get_video",
            &format!("Video {video}"),
        )
        .await
    }

    async fn delete_video(
        &self,
        listing: &ListingId,
        video: &VideoId,
    ) -> Result<(), AssetStoreError> {
        let request =
            self.http_client.delete(self.url(&format!("/listings/{listing}/videos/{video}")));
        self.send(request, "delete_video", &format!("Video {video}")).await?;
        Ok(())
    }

    async fn list_media(
        &self,
        listing: &ListingId,
    ) -> Result<(Vec<Photo>, Vec<Video>), AssetStoreError> {
        let detail = self.listing_detail(listing).await?;
        Ok((detail.photos, detail.videos))
    }
}
