//! Errors raised while a mirror request is being carried out.

use hubmirror_client::ClientError;
use thiserror::Error;

use crate::sink::SinkError;

/// Errors that end a tracking session.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Listing runs or jobs failed, either in transport or while decoding.
    #[error("failed to read workflow state: {0}")]
    Transport(#[from] ClientError),

    /// The status consumer disconnected.
    #[error("status consumer disconnected")]
    SinkClosed,
}

impl From<SinkError> for TrackerError {
    fn from(_: SinkError) -> Self {
        Self::SinkClosed
    }
}

/// Errors that end a mirror session after its stream has opened.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The workflow could not be triggered.
    #[error("failed to dispatch workflow: {0}")]
    Dispatch(ClientError),

    /// Following the dispatched run failed.
    #[error(transparent)]
    Tracking(#[from] TrackerError),

    /// The status consumer disconnected.
    #[error("status consumer disconnected")]
    Disconnected,
}

impl From<SinkError> for SessionError {
    fn from(_: SinkError) -> Self {
        Self::Disconnected
    }
}

impl SessionError {
    /// Returns true if the session ended because nobody is listening any more.
    pub fn is_disconnect(&self) -> bool {
        matches!(
            self,
            Self::Disconnected | Self::Tracking(TrackerError::SinkClosed)
        )
    }

    /// Terminal line shown to the caller.
    pub fn status_line(&self) -> String {
        match self {
            Self::Dispatch(e) => format!("❌ Failed to launch GitHub action: {}", e),
            Self::Tracking(e) => format!("❌ Failed to follow workflow run: {}", e),
            Self::Disconnected => "❌ Status consumer disconnected".to_string(),
        }
    }
}
