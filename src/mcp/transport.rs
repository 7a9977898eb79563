//! Stdout side of the stdio transport.
//!
//! One JSON-RPC response per line. Clients driving searchgate as a
//! subprocess treat every stdout line as protocol traffic, so nothing
//! else may be written here; diagnostics go to stderr via tracing.

use crate::mcp::error::McpError;
use crate::mcp::protocol::JsonRpcResponse;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

/// Reply to a notification such as `initialized`: no id, no result,
/// no error. The dispatcher produces these so its return type stays
/// uniform; the wire must not carry them.
fn is_notification_reply(response: &JsonRpcResponse) -> bool {
    response.id.is_none() && response.result.is_none() && response.error.is_none()
}

pub struct StdioTransport {
    stdout: BufWriter<tokio::io::Stdout>,
}

impl StdioTransport {
    pub fn new() -> Self {
        Self {
            stdout: BufWriter::new(tokio::io::stdout()),
        }
    }

    /// Write one response as a single newline-terminated line.
    ///
    /// Notification replies are swallowed; flushes after every write
    /// since the peer blocks on our output.
    pub async fn send_response(&mut self, response: JsonRpcResponse) -> Result<(), McpError> {
        if is_notification_reply(&response) {
            debug!("Suppressing reply to notification");
            return Ok(());
        }

        let line = serde_json::to_string(&response)?;
        debug!("Sending: {}", line);

        self.stdout.write_all(line.as_bytes()).await?;
        self.stdout.write_all(b"\n").await?;
        self.stdout.flush().await?;

        Ok(())
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}
