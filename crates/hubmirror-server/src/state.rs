//! Shared application state.

use std::sync::Arc;

use hubmirror_client::RegistryProbe;

use crate::session::MirrorSession;

/// Capacity of the per-request status channel.
pub const STATUS_CHANNEL_CAPACITY: usize = 32;

/// Shared application state.
pub struct AppState {
    /// Upstream existence check run before a stream is opened.
    pub probe: Arc<dyn RegistryProbe>,

    /// Dispatch and tracking of mirror sessions.
    pub session: Arc<MirrorSession>,

    /// Page browsers are redirected to.
    pub homepage_url: String,
}

impl AppState {
    /// Create a new AppState wrapped in Arc.
    pub fn new(
        probe: Arc<dyn RegistryProbe>,
        session: MirrorSession,
        homepage_url: impl Into<String>,
    ) -> Arc<Self> {
        Arc::new(Self {
            probe,
            session: Arc::new(session),
            homepage_url: homepage_url.into(),
        })
    }
}
