//! One mirror request from dispatch to the final pull hint.

use hubmirror_core::{CorrelationId, ImageReference};
use tracing::{error, info, warn};

use crate::dispatcher::WorkflowDispatcher;
use crate::error::SessionError;
use crate::sink::{ChannelSink, StatusSink};
use crate::tracker::WorkflowTracker;

/// Runs the dispatch and tracking phases of a mirror request.
pub struct MirrorSession {
    dispatcher: WorkflowDispatcher,
    tracker: WorkflowTracker,
    mirror_registry: String,
}

impl MirrorSession {
    pub fn new(
        dispatcher: WorkflowDispatcher,
        tracker: WorkflowTracker,
        mirror_registry: impl Into<String>,
    ) -> Self {
        Self {
            dispatcher,
            tracker,
            mirror_registry: mirror_registry.into().trim_end_matches('/').to_string(),
        }
    }

    /// Pull command for the mirrored copy of `reference`.
    pub fn pull_command(&self, reference: &ImageReference) -> String {
        format!(
            "docker pull {}/{}",
            self.mirror_registry,
            reference.short_name()
        )
    }

    /// Mirror an already validated image, writing progress to `sink`.
    pub async fn run(
        &self,
        sink: &dyn StatusSink,
        image: &str,
        reference: &ImageReference,
    ) -> Result<u64, SessionError> {
        let correlation_id = CorrelationId::generate();
        info!(
            image = %reference,
            correlation_id = %correlation_id,
            "Starting mirror session"
        );

        sink.write(&format!("⬇️ Received request to mirror image: {}", image))
            .await?;
        self.dispatcher
            .dispatch(sink, reference, &correlation_id)
            .await?;
        let run_id = self.tracker.follow(sink, &correlation_id).await?;

        sink.write("ℹ️ Pull your image from the mirror:").await?;
        sink.write(&self.pull_command(reference)).await?;

        info!(
            image = %reference,
            correlation_id = %correlation_id,
            run_id,
            "Mirror session completed"
        );
        Ok(run_id)
    }

    /// Run a session against a channel sink and translate its outcome into
    /// stream frames. Failures write a final `❌` line and abort the stream.
    pub async fn drive(&self, sink: ChannelSink, image: String, reference: ImageReference) {
        match self.run(&sink, &image, &reference).await {
            Ok(_) => {}
            Err(e) if e.is_disconnect() => {
                warn!(image = %reference, "Caller disconnected, session abandoned");
            }
            Err(e) => {
                error!(image = %reference, error = %e, "Mirror session failed");
                // The consumer may already be gone; nothing left to report then.
                sink.write(&e.status_line()).await.ok();
                sink.abort(e.to_string()).await;
            }
        }
    }
}
