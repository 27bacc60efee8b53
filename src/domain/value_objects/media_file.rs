use bytes::Bytes;
use std::fmt;

/// A file picked by the user, held in memory until it is uploaded
#[derive(Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

impl MediaFile {
    #[must_use]
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self { filename: filename.into(), content_type: content_type.into(), data: data.into() }
    }

    /// Size in bytes
    #[must_use]
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Check if the declared MIME type is an image type
    #[must_use]
    pub fn is_image(&self) -> bool {
        is_image_mime(&self.content_type)
    }

    /// Check if the declared MIME type is a video type
    #[must_use]
    pub fn is_video(&self) -> bool {
        is_video_mime(&self.content_type)
    }
}

// Byte payloads can be tens of megabytes; keep them out of logs.
impl fmt::Debug for MediaFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaFile")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("size", &self.data.len())
            .finish()
    }
}

#[must_use]
pub fn is_image_mime(content_type: &str) -> bool {
    content_type.trim().to_ascii_lowercase().starts_with("image/")
}

#[must_use]
pub fn is_video_mime(content_type: &str) -> bool {
    content_type.trim().to_ascii_lowercase().starts_with("video/")
}
