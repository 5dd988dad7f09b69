use crate::error::TransportError;
use crate::transport::{FrameSink, FrameStream};
use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tracing::trace;

#[async_trait]
impl FrameSink for SplitSink<WebSocket, Message> {
    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.send(Message::Text(text.into())).await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        SinkExt::close(self).await?;
        Ok(())
    }
}

#[async_trait]
impl FrameStream for SplitStream<WebSocket> {
    async fn next_text(&mut self) -> Option<Result<String, TransportError>> {
        loop {
            let msg = match self.next().await? {
                Ok(msg) => msg,
                Err(e) => return Some(Err(e.into())),
            };

            match msg {
                Message::Text(text) => return Some(Ok(text.as_str().to_owned())),
                Message::Binary(data) => {
                    let text = String::from_utf8(data.to_vec()).map_err(|_| TransportError::NonUtf8);
                    return Some(text);
                }
                Message::Close(frame) => {
                    trace!("Close frame received: {:?}", frame);
                    return None;
                }
                // Control frames are answered by axum itself.
                Message::Ping(_) | Message::Pong(_) => continue,
            }
        }
    }
}
