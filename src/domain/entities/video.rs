use serde::{Deserialize, Serialize};

use super::photo::string_id;
use crate::domain::value_objects::VideoStatus;

string_id!(
    /// Unique identifier for a listing video
    VideoId
);

const THUMBNAIL_BASE_URL: &str = "https://image.mux.com";
const STREAM_BASE_URL: &str = "https://stream.mux.com";

/// A listing video and its remote transcoding state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: VideoId,
    /// Provider asset id, unset until the provider acknowledges the upload
    #[serde(rename = "mux_asset_id", default)]
    pub asset_id: Option<String>,
    /// Provider playback id, unset until the asset is ready
    #[serde(rename = "mux_playback_id", default)]
    pub playback_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub status: VideoStatus,
}

impl Video {
    /// A freshly allocated record whose bytes have not been confirmed yet
    #[must_use]
    pub fn pending(id: VideoId, title: Option<String>) -> Self {
        Self { id, asset_id: None, playback_id: None, title, status: VideoStatus::Waiting }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status.is_ready()
    }

    /// Ready videos with a playback id are the only ones shown on public pages
    #[must_use]
    pub fn is_publishable(&self) -> bool {
        self.is_ready() && self.playback_id.is_some()
    }

    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().filter(|t| !t.is_empty()).unwrap_or("Untitled video")
    }

    /// Square editor thumbnail, available once the video is ready
    #[must_use]
    pub fn thumbnail_url(&self) -> Option<String> {
        if !self.is_ready() {
            return None;
        }
        self.playback_id.as_ref().map(|playback_id| {
            format!(
                "{THUMBNAIL_BASE_URL}/{playback_id}/thumbnail.jpg?width=96&height=96&fit_mode=crop"
            )
        })
    }

    /// HLS stream URL
    #[must_use]
    pub fn playback_url(&self) -> Option<String> {
        self.playback_id
            .as_ref()
            .map(|playback_id| format!("{STREAM_BASE_URL}/{playback_id}.m3u8"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_video() {
        let video = Video::pending(VideoId::from("v1"), Some("tour.mp4".to_string()));
        assert_eq!(video.status, VideoStatus::Waiting);
        assert!(video.status.is_pending());
        assert!(video.asset_id.is_none());
        assert!(video.thumbnail_url().is_none());
        assert!(!video.is_publishable());
    }

    #[test]
    fn test_ready_video_urls() {
        let video = Video {
            id: VideoId::from("v1"),
            asset_id: Some("asset-1".to_string()),
            playback_id: Some("pb123".to_string()),
            title: None,
            status: VideoStatus::Ready,
        };

        assert_eq!(
            video.thumbnail_url().as_deref(),
            Some("https://image.mux.com/pb123/thumbnail.jpg?width=96&height=96&fit_mode=crop")
        );
        assert_eq!(video.playback_url().as_deref(), Some("https://stream.mux.com/pb123.m3u8"));
        assert!(video.is_publishable());
        assert_eq!(video.display_title(), "Untitled video");
    }

    #[test]
    fn test_ready_without_playback_id_is_not_publishable() {
        let mut video = Video::pending(VideoId::from("v2"), None);
        video.status = VideoStatus::Ready;
        assert!(video.is_ready());
        assert!(!video.is_publishable());
    }

    #[test]
    fn test_deserializes_api_shape_with_nulls() {
        let json = r#"{
            "id": "v9",
            "mux_asset_id": null,
            "mux_playback_id": null,
            "title": "Walkthrough",
            "status": "processing"
        }"#;

        let video: Video = serde_json::from_str(json).unwrap();
        assert_eq!(video.id.as_str(), "v9");
        assert_eq!(video.status, VideoStatus::Processing);
        assert_eq!(video.display_title(), "Walkthrough");
    }
}
