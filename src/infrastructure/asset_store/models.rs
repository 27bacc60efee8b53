use serde::{Deserialize, Serialize};

use crate::domain::entities::{Photo, PhotoId, Video};

/// Listing detail; only the media fields are read
#[derive(Debug, Deserialize)]
pub struct ListingDetailResponse {
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub videos: Vec<Video>,
}

#[derive(Debug, Serialize)]
pub struct PhotoOrderRequest<'a> {
    pub photo_ids: &'a [PhotoId],
}

#[derive(Debug, Serialize)]
pub struct CreateVideoRequest<'a> {
    pub title: Option<&'a str>,
}

/// Error body returned by the API. `detail` is a string for most errors and a
/// list of field errors for validation failures.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub detail: serde_json::Value,
}

impl ApiErrorResponse {
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(message) => message.clone(),
            serde_json::Value::Array(errors) => errors
                .iter()
                .filter_map(|error| error.get("msg").and_then(serde_json::Value::as_str))
                .collect::<Vec<_>>()
                .join("; "),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}
