//! Console transport for the production-line calculator.
//!
//! Stands in for a chat connection: every input line is one message, and
//! replies are written back as text. A line may name its scope explicitly as
//! `scope|text`; otherwise the configured scope is used.

pub mod logging;

use anyhow::Result;
use async_trait::async_trait;
use runtime::{ReplySink, Runtime, RuntimeError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

/// Splits an input line into `(scope, text)`.
pub fn split_scope<'a>(line: &'a str, default_scope: &'a str) -> (&'a str, &'a str) {
    match line.split_once('|') {
        Some((scope, text)) if !scope.trim().is_empty() => (scope.trim(), text),
        _ => (default_scope, line),
    }
}

/// Writes each reply to an output stream, prefixed with its scope.
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W> ReplySink for WriterSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&self, scope: &str, text: &str) -> runtime::Result<()> {
        let mut writer = self.writer.lock().await;
        let sink_error = |e: std::io::Error| RuntimeError::Sink {
            scope: scope.to_string(),
            message: e.to_string(),
        };
        writer
            .write_all(format!("[{scope}]\n{text}\n").as_bytes())
            .await
            .map_err(sink_error)?;
        writer.flush().await.map_err(sink_error)
    }
}

/// Feeds every line of `input` to the runtime until end of input.
///
/// A message that fails with a runtime fault is logged and the loop keeps
/// going; only input errors end it.
pub async fn run_console<R>(runtime: &Runtime, input: R, sink: &dyn ReplySink) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let default_scope = runtime.config().scope.clone();
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let (scope, text) = split_scope(&line, &default_scope);
        if let Err(e) = runtime.handle_message(scope, text, sink).await {
            tracing::error!(scope, error = %e, "message handling failed");
        }
    }
    Ok(())
}
