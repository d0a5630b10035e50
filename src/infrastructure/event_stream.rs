// Client side of the server's length-prefixed event stream
use crate::application::server_gateway::ServerEvent;
use anyhow::Context;
use bytes::{Buf, Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;
use serde::Deserialize;

/// Envelope wrapped around every pushed event. Frames on the wire are a
/// 4-byte big-endian payload length followed by the JSON payload.
#[derive(Debug, Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct NamePayload {
    name: String,
}

/// Pop one complete frame off the buffer, or None until more bytes arrive.
fn split_frame(buffer: &mut BytesMut) -> Option<Bytes> {
    if buffer.len() < 4 {
        return None;
    }
    let length = u32::from_be_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]) as usize;
    if buffer.len() < 4 + length {
        return None;
    }
    buffer.advance(4);
    Some(buffer.split_to(length).freeze())
}

/// Parse one frame payload. Unknown event names yield None.
fn parse_event(payload: &[u8]) -> anyhow::Result<Option<ServerEvent>> {
    let envelope: Envelope =
        serde_json::from_slice(payload).context("invalid event envelope")?;

    let event = match envelope.event.as_str() {
        "people_updated" => Some(ServerEvent::SnapshotUpdated(
            serde_json::from_value(envelope.data).context("invalid snapshot payload")?,
        )),
        "user_joined" => {
            let payload: NamePayload =
                serde_json::from_value(envelope.data).context("invalid user_joined payload")?;
            Some(ServerEvent::UserJoined { name: payload.name })
        }
        "user_left" => {
            let payload: NamePayload =
                serde_json::from_value(envelope.data).context("invalid user_left payload")?;
            Some(ServerEvent::UserLeft { name: payload.name })
        }
        other => {
            tracing::debug!("ignoring unknown server event {other}");
            None
        }
    };

    Ok(event)
}

/// Decode a raw byte stream into server events. A transport error ends the
/// stream; a malformed payload is dropped and logged (frame boundaries stay
/// intact because framing is length-based).
pub fn decode_events<S, E>(chunks: S) -> impl Stream<Item = ServerEvent>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::fmt::Display,
{
    async_stream::stream! {
        let mut buffer = BytesMut::new();
        futures::pin_mut!(chunks);

        while let Some(chunk) = chunks.next().await {
            match chunk {
                Ok(bytes) => {
                    buffer.extend_from_slice(&bytes);
                    while let Some(frame) = split_frame(&mut buffer) {
                        match parse_event(&frame) {
                            Ok(Some(event)) => yield event,
                            Ok(None) => {}
                            Err(e) => {
                                tracing::warn!("dropping malformed event frame: {e:#}");
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("event stream transport error: {e}");
                    break;
                }
            }
        }
    }
}
