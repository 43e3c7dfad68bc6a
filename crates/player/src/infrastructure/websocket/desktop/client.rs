//! Desktop WebSocket client using tokio-tungstenite

use anyhow::Result;
use futures_util::stream::SplitStream;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use crate::error::ClientError;
use crate::ports::outbound::FrameSink;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// `FrameSink` backed by the writer task's channel. Never blocks.
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }
}

impl FrameSink for ChannelSink {
    fn send_text(&mut self, frame: String) -> Result<(), ClientError> {
        self.tx
            .send(frame)
            .map_err(|_| ClientError::Transport("writer task stopped".into()))
    }
}

/// One inbound event from the socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Text(String),
    Closed,
}

/// Read half of the socket.
pub struct FrameStream {
    read: SplitStream<Socket>,
}

impl FrameStream {
    /// Next text frame, or `Closed` once the socket is done for any reason.
    pub async fn next_frame(&mut self) -> Inbound {
        while let Some(msg) = self.read.next().await {
            match msg {
                Ok(Message::Text(text)) => return Inbound::Text(text),
                Ok(Message::Close(frame)) => {
                    tracing::info!(?frame, "Server closed connection");
                    return Inbound::Closed;
                }
                Ok(Message::Binary(data)) => {
                    tracing::debug!(len = data.len(), "Ignoring binary frame");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    return Inbound::Closed;
                }
            }
        }
        Inbound::Closed
    }
}

/// Open the socket and spawn its writer task.
///
/// The writer drains the returned sink's channel in order and closes the
/// socket when every sink clone is dropped.
pub async fn open_socket(url: &str) -> Result<(ChannelSink, FrameStream)> {
    let (ws_stream, _) = connect_async(url).await?;
    tracing::info!("Connected to server at {}", url);

    let (mut write, read) = ws_stream.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if let Err(e) = write.send(Message::Text(frame)).await {
                tracing::error!("Failed to send frame: {}", e);
                break;
            }
        }
        if let Err(e) = write.close().await {
            tracing::debug!("Socket close: {}", e);
        }
        tracing::info!("Write task completed");
    });

    Ok((ChannelSink::new(tx), FrameStream { read }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_sink_queues_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sink = ChannelSink::new(tx);

        sink.send_text("<command type=\"commit\"/>".into()).unwrap();
        sink.send_text(String::new()).unwrap();

        assert_eq!(rx.recv().await.as_deref(), Some("<command type=\"commit\"/>"));
        assert_eq!(rx.recv().await.as_deref(), Some(""));
    }

    #[test]
    fn test_channel_sink_fails_after_writer_stops() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut sink = ChannelSink::new(tx);
        drop(rx);

        assert!(matches!(
            sink.send_text("x".into()),
            Err(ClientError::Transport(_))
        ));
    }
}
