use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transcoding status reported by the remote video pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    /// Upload session created, bytes not yet received by the provider
    Waiting,
    /// Provider received the bytes and is transcoding
    Processing,
    /// Playable
    Ready,
    /// Transcoding failed
    Error,
    /// Transcoding failed (provider spelling)
    Errored,
}

/// Client-side view of a video's lifecycle.
///
/// `Waiting` and `Processing` collapse into `Pending` because the client takes
/// the same action for both: keep polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReconcileState {
    Pending,
    Ready,
    Errored,
}

impl VideoStatus {
    /// Check if the video is still being processed remotely
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Waiting | Self::Processing)
    }

    /// Check if the video is playable
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Check if transcoding failed
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Error | Self::Errored)
    }

    /// Check if no further transition is expected
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    #[must_use]
    pub fn reconcile_state(&self) -> ReconcileState {
        match self {
            Self::Waiting | Self::Processing => ReconcileState::Pending,
            Self::Ready => ReconcileState::Ready,
            Self::Error | Self::Errored => ReconcileState::Errored,
        }
    }

    /// Human-readable badge text for editors
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self.reconcile_state() {
            ReconcileState::Pending => "Processing",
            ReconcileState::Ready => "Ready",
            ReconcileState::Errored => "Error",
        }
    }
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Processing => write!(f, "processing"),
            Self::Ready => write!(f, "ready"),
            Self::Error => write!(f, "error"),
            Self::Errored => write!(f, "errored"),
        }
    }
}

impl FromStr for VideoStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "waiting" => Ok(Self::Waiting),
            "processing" => Ok(Self::Processing),
            "ready" => Ok(Self::Ready),
            "error" => Ok(Self::Error),
            "errored" => Ok(Self::Errored),
            _ => Err(format!("Invalid video status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(VideoStatus::Waiting, ReconcileState::Pending)]
    #[case(VideoStatus::Processing, ReconcileState::Pending)]
    #[case(VideoStatus::Ready, ReconcileState::Ready)]
    #[case(VideoStatus::Error, ReconcileState::Errored)]
    #[case(VideoStatus::Errored, ReconcileState::Errored)]
    fn test_reconcile_state(#[case] status: VideoStatus, #[case] expected: ReconcileState) {
        assert_eq!(status.reconcile_state(), expected);
        assert_eq!(status.is_terminal(), expected != ReconcileState::Pending);
    }

    #[test]
    fn test_pending_statuses() {
        assert!(VideoStatus::Waiting.is_pending());
        assert!(VideoStatus::Processing.is_pending());
        assert!(!VideoStatus::Ready.is_pending());
        assert!(!VideoStatus::Errored.is_pending());
    }

    #[test]
    fn test_failed_statuses() {
        assert!(VideoStatus::Error.is_failed());
        assert!(VideoStatus::Errored.is_failed());
        assert!(!VideoStatus::Ready.is_failed());
        assert!(!VideoStatus::Waiting.is_failed());
    }

    #[test]
    fn test_labels() {
        assert_eq!(VideoStatus::Waiting.label(), "Processing");
        assert_eq!(VideoStatus::Processing.label(), "Processing");
        assert_eq!(VideoStatus::Ready.label(), "Ready");
        assert_eq!(VideoStatus::Errored.label(), "Error");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("waiting".parse::<VideoStatus>().unwrap(), VideoStatus::Waiting);
        assert_eq!("PROCESSING".parse::<VideoStatus>().unwrap(), VideoStatus::Processing);
        assert_eq!("Ready".parse::<VideoStatus>().unwrap(), VideoStatus::Ready);
        assert_eq!("errored".parse::<VideoStatus>().unwrap(), VideoStatus::Errored);

        assert!("complete".parse::<VideoStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&VideoStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");

        let status: VideoStatus = serde_json::from_str("\"errored\"").unwrap();
        assert_eq!(status, VideoStatus::Errored);
    }
}
