//! Outbound side of a chat transport.
use async_trait::async_trait;

use super::errors::Result;

/// Delivers reply text to the channel identified by `scope`.
///
/// Implementations may be a chat connection, a terminal, or a test buffer.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send(&self, scope: &str, text: &str) -> Result<()>;
}

/// Sink that keeps every reply in memory; useful for tests and dry runs.
#[derive(Debug, Default)]
pub struct BufferedSink {
    replies: tokio::sync::Mutex<Vec<(String, String)>>,
}

impl BufferedSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains the buffered `(scope, text)` pairs.
    pub async fn take(&self) -> Vec<(String, String)> {
        std::mem::take(&mut *self.replies.lock().await)
    }
}

#[async_trait]
impl ReplySink for BufferedSink {
    async fn send(&self, scope: &str, text: &str) -> Result<()> {
        self.replies
            .lock()
            .await
            .push((scope.to_string(), text.to_string()));
        Ok(())
    }
}
