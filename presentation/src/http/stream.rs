//! Streamed chat response.
//!
//! The agent loop runs in its own task and writes into an unbounded channel
//! whose receiver is the response body. Every path through the task ends by
//! dropping the writer, which closes the body.

use axum::body::Body;
use futures::FutureExt;
use std::convert::Infallible;
use std::panic::AssertUnwindSafe;
use testhub_application::{
    ChatProgressNotifier, ChatStop, RunChatError, RunChatInput, RunChatOutput, RunChatUseCase,
};
use testhub_domain::ToolCall;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, error, warn};

/// Writes progress notices and the final answer to one response body.
pub struct StreamWriter {
    tx: mpsc::UnboundedSender<String>,
}

impl StreamWriter {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn notice_text(tool_name: &str) -> String {
        format!("\n正在执行: {}...\n", tool_name)
    }

    pub fn apology_text(detail: &str) -> String {
        format!("\n抱歉，处理您的请求时出现错误: {}", detail)
    }

    /// Returns `false` once the client has gone away. Work is not cancelled
    /// in that case; later writes are simply discarded.
    pub fn write(&self, chunk: impl Into<String>) -> bool {
        let sent = self.tx.send(chunk.into()).is_ok();
        if !sent {
            debug!("Client disconnected; dropping stream chunk");
        }
        sent
    }

    /// Write the outcome of the loop and close the stream.
    pub fn finish(self, result: Result<RunChatOutput, RunChatError>) {
        match result {
            Ok(output) => {
                if output.stop == ChatStop::TurnLimitReached {
                    warn!("Chat stopped after {} tool turns", output.tool_turns);
                }
                self.write(output.answer);
            }
            Err(e) => {
                error!("Chat failed: {}", e);
                self.write(Self::apology_text(&e.to_string()));
            }
        }
    }
}

impl ChatProgressNotifier for StreamWriter {
    fn on_tool_dispatch(&self, call: &ToolCall) {
        self.write(Self::notice_text(&call.tool_name));
    }
}

/// Start the agent loop in the background and return the body it streams to.
pub fn spawn_chat(chat: RunChatUseCase, input: RunChatInput) -> Body {
    let (writer, rx) = StreamWriter::channel();

    tokio::spawn(async move {
        let outcome = AssertUnwindSafe(chat.execute(input, &writer))
            .catch_unwind()
            .await;
        match outcome {
            Ok(result) => writer.finish(result),
            Err(_) => {
                error!("Chat task panicked");
                writer.write(StreamWriter::apology_text("内部错误"));
            }
        }
    });

    Body::from_stream(UnboundedReceiverStream::new(rx).map(Ok::<_, Infallible>))
}
