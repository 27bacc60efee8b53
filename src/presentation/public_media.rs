use serde::Serialize;

use crate::domain::entities::{MediaSnapshot, Photo, Video};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicPhoto {
    pub url: String,
    pub thumbnail_url: String,
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicVideo {
    pub title: String,
    pub playback_id: String,
    pub playback_url: String,
}

/// Media as handed to the public listing page renderer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublicListingMedia {
    /// Display order; the first photo is the hero
    pub photos: Vec<PublicPhoto>,
    /// Ready videos only
    pub videos: Vec<PublicVideo>,
}

impl PublicListingMedia {
    pub fn from_snapshot(snapshot: &MediaSnapshot) -> Self {
        Self::new(&snapshot.photos, &snapshot.videos)
    }

    pub fn new(photos: &[Photo], videos: &[Video]) -> Self {
        let mut ordered: Vec<&Photo> = photos.iter().collect();
        ordered.sort_by_key(|photo| photo.position);

        Self {
            photos: ordered
                .into_iter()
                .map(|photo| PublicPhoto {
                    url: photo.url.clone(),
                    thumbnail_url: photo.thumbnail_url.clone(),
                    position: photo.position,
                })
                .collect(),
            videos: videos.iter().filter_map(PublicVideo::from_video).collect(),
        }
    }

    pub fn hero(&self) -> Option<&PublicPhoto> {
        self.photos.first()
    }
}

impl PublicVideo {
    fn from_video(video: &Video) -> Option<Self> {
        if !video.is_publishable() {
            return None;
        }
        let playback_id = video.playback_id.clone()?;
        let playback_url = video.playback_url()?;
        Some(Self { title: video.display_title().to_string(), playback_id, playback_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{entities::VideoId, value_objects::VideoStatus};

    fn video(id: &str, status: VideoStatus, playback_id: Option<&str>) -> Video {
        Video {
            id: VideoId::from(id),
            asset_id: None,
            playback_id: playback_id.map(str::to_string),
            title: Some(format!("{id} tour")),
            status,
        }
    }

    #[test]
    fn test_only_ready_videos_with_playback_are_public() {
        let videos = vec![
            video("ready", VideoStatus::Ready, Some("pb1")),
            video("processing", VideoStatus::Processing, None),
            video("ready-no-playback", VideoStatus::Ready, None),
            video("failed", VideoStatus::Errored, Some("pb2")),
        ];

        let media = PublicListingMedia::new(&[], &videos);

        assert_eq!(media.videos.len(), 1);
        assert_eq!(media.videos[0].playback_id, "pb1");
        assert_eq!(media.videos[0].playback_url, "https://stream.mux.com/pb1.m3u8");
        assert_eq!(media.videos[0].title, "ready tour");
    }

    #[test]
    fn test_photos_ordered_hero_first() {
        let photos = vec![
            Photo::new("b", "https://img/b", "https://img/b/t", 1),
            Photo::new("a", "https://img/a", "https://img/a/t", 0),
        ];

        let media = PublicListingMedia::new(&photos, &[]);

        assert_eq!(media.hero().map(|p| p.url.as_str()), Some("https://img/a"));
        assert_eq!(media.photos[1].position, 1);
    }

    #[test]
    fn test_empty_snapshot() {
        let media = PublicListingMedia::from_snapshot(&MediaSnapshot::default());
        assert!(media.hero().is_none());
        assert!(media.videos.is_empty());
    }
}
