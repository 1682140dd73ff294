//! One-way status feed towards the caller.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::trace;

/// Errors raised by a [`StatusSink`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SinkError {
    /// Whoever was reading the feed went away.
    #[error("status consumer disconnected")]
    Closed,
}

/// Accepts human-readable status lines.
///
/// Implementations deliver each line as soon as it is written so a remote
/// observer sees incremental progress.
#[async_trait]
pub trait StatusSink: Send + Sync {
    /// Deliver one status line.
    async fn write(&self, line: &str) -> Result<(), SinkError>;

    /// Returns true once the consumer is known to be gone. Polling loops
    /// check this between iterations so they stop even when they have
    /// nothing to write.
    fn is_closed(&self) -> bool {
        false
    }
}

/// A unit carried from a session to the response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFrame {
    /// A status line, without its trailing newline.
    Line(String),
    /// The session failed; the body is cut short with this reason.
    Abort(String),
}

/// Sink backed by a bounded channel whose receiver feeds a streaming
/// response body.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<StreamFrame>,
}

impl ChannelSink {
    /// Create a sink and the receiver the transport drains.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<StreamFrame>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Mark the feed as failed. Ignored if the consumer is already gone.
    pub async fn abort(&self, reason: impl Into<String>) {
        self.tx.send(StreamFrame::Abort(reason.into())).await.ok();
    }
}

#[async_trait]
impl StatusSink for ChannelSink {
    async fn write(&self, line: &str) -> Result<(), SinkError> {
        trace!(line = %line, "Status line");
        self.tx
            .send(StreamFrame::Line(line.to_string()))
            .await
            .map_err(|_| SinkError::Closed)
    }

    fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_sink_delivers_lines_in_order() {
        let (sink, mut rx) = ChannelSink::new(4);

        sink.write("first").await.unwrap();
        sink.write("second").await.unwrap();
        sink.abort("boom").await;

        assert_eq!(rx.recv().await, Some(StreamFrame::Line("first".to_string())));
        assert_eq!(rx.recv().await, Some(StreamFrame::Line("second".to_string())));
        assert_eq!(rx.recv().await, Some(StreamFrame::Abort("boom".to_string())));
    }

    #[tokio::test]
    async fn test_channel_sink_detects_dropped_consumer() {
        let (sink, rx) = ChannelSink::new(4);
        assert!(!sink.is_closed());

        drop(rx);

        assert!(sink.is_closed());
        assert_eq!(sink.write("anyone?").await, Err(SinkError::Closed));
    }
}
