//! hubmirror Server Library
//!
//! Mirrors Docker Hub images into a private registry by dispatching a
//! GitHub Actions workflow and streaming its progress back to the caller.
//!
//! Request flow: the image string is canonicalized
//! ([`hubmirror_core::ImageReference`]), confirmed upstream
//! ([`hubmirror_client::RegistryProbe`]), handed to the
//! [`WorkflowDispatcher`], and then followed by the [`WorkflowTracker`]
//! which writes progress into a [`StatusSink`] until every step is done.

pub mod clock;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod http;
pub mod session;
pub mod sink;
pub mod state;
pub mod tracker;

#[cfg(test)]
mod test_support;

pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use dispatcher::WorkflowDispatcher;
pub use error::{SessionError, TrackerError};
pub use session::MirrorSession;
pub use sink::{ChannelSink, SinkError, StatusSink, StreamFrame};
pub use state::AppState;
pub use tracker::{Progress, TrackerConfig, TrackingSession, TrackingState, WorkflowTracker};
