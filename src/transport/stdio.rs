//! Line-delimited JSON-RPC over a byte stream
//!
//! One JSON message per line in each direction. A single writer task owns the
//! output; responses and notifications reach it through an mpsc channel, so
//! tool calls running on separate tasks never interleave partial lines.

use crate::protocol::messages::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use crate::protocol::McpServer;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

pub const OUTBOUND_CAPACITY: usize = 256;

/// Channel carrying serialized outbound lines (without trailing newline)
pub fn outbound_channel() -> (mpsc::Sender<String>, mpsc::Receiver<String>) {
    mpsc::channel(OUTBOUND_CAPACITY)
}

/// Serve requests from `input` until EOF, writing replies to `output`.
///
/// `outbound` must be the sender paired with `outbound_rx`; other clones of it
/// (such as a [`crate::notify::ChannelNotifier`]) may keep publishing while the
/// session is open. Returns once every in-flight request has been answered and
/// all queued lines have been written.
pub async fn serve<R, W>(
    input: R,
    output: W,
    server: Arc<McpServer>,
    outbound: mpsc::Sender<String>,
    outbound_rx: mpsc::Receiver<String>,
) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (done_tx, done_rx) = oneshot::channel();
    let writer = tokio::spawn(write_loop(output, outbound_rx, done_rx));

    let mut lines = BufReader::new(input).lines();
    let mut in_flight = JoinSet::new();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        while in_flight.try_join_next().is_some() {}

        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => {
                debug!(method = %request.method, id = ?request.id, "Received request");
                let server = Arc::clone(&server);
                let outbound = outbound.clone();
                in_flight.spawn(async move {
                    if let Some(response) = server.handle(request).await {
                        send_response(&outbound, &response).await;
                    }
                });
            }
            Err(e) => {
                warn!(error = %e, "Failed to parse incoming message");
                let response =
                    JsonRpcResponse::failure(None, JsonRpcError::parse_error(e.to_string()));
                send_response(&outbound, &response).await;
            }
        }
    }

    debug!("Input closed, waiting for in-flight requests");
    while in_flight.join_next().await.is_some() {}

    let _ = done_tx.send(());
    writer
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
}

async fn send_response(outbound: &mpsc::Sender<String>, response: &JsonRpcResponse) {
    match serde_json::to_string(response) {
        Ok(line) => {
            if outbound.send(line).await.is_err() {
                warn!("Output closed before response could be written");
            }
        }
        Err(e) => error!(error = %e, "Failed to encode response"),
    }
}

async fn write_loop<W>(
    mut output: W,
    mut outbound_rx: mpsc::Receiver<String>,
    mut done_rx: oneshot::Receiver<()>,
) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    loop {
        tokio::select! {
            line = outbound_rx.recv() => match line {
                Some(line) => write_line(&mut output, &line).await?,
                None => break,
            },
            _ = &mut done_rx => {
                // Flush whatever was queued before shutdown, then stop.
                outbound_rx.close();
                while let Some(line) = outbound_rx.recv().await {
                    write_line(&mut output, &line).await?;
                }
                break;
            }
        }
    }

    output.shutdown().await
}

async fn write_line<W>(output: &mut W, line: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}
