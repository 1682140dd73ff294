//! Workflow dispatch.

use std::sync::Arc;

use hubmirror_client::WorkflowApi;
use hubmirror_core::{CorrelationId, ImageReference};
use tracing::info;

use crate::error::SessionError;
use crate::sink::StatusSink;

/// Triggers the mirror workflow for one image.
pub struct WorkflowDispatcher {
    api: Arc<dyn WorkflowApi>,
}

impl WorkflowDispatcher {
    pub fn new(api: Arc<dyn WorkflowApi>) -> Self {
        Self { api }
    }

    /// Dispatch the workflow with the image in its short `repository:tag`
    /// form and the correlation id as inputs, then announce it on `sink`.
    pub async fn dispatch(
        &self,
        sink: &dyn StatusSink,
        reference: &ImageReference,
        correlation_id: &CorrelationId,
    ) -> Result<(), SessionError> {
        let image_name = reference.short_name();
        info!(
            image = %image_name,
            correlation_id = %correlation_id,
            "Dispatching mirror workflow"
        );

        self.api
            .dispatch_workflow(&image_name, correlation_id)
            .await
            .map_err(SessionError::Dispatch)?;

        sink.write("🚀 Launched github action workflow").await?;
        Ok(())
    }
}
