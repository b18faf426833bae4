//! Per-datagram routing.
//!
//! The [`Dispatcher`] implements the decision tree for one received
//! datagram:
//!
//! 1. Update session counters (unconditional, before any parsing).
//! 2. Attempt header framing.
//! 3. Framed: check payload bounds, slice the payload, route by type.
//! 4. Unframed: UTF-8 text (with an observational JSON parse) or opaque
//!    binary.
//!
//! Error policy: malformed input is dropped with a log line and no
//! response; only transport failures count as errors. Nothing raised
//! while handling a datagram ever escapes to the receive loop.

mod control;
mod responder;

pub use control::simulate_command;
pub use responder::Responder;

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;

use crate::codec::{classify_text, preview, DecodedPayload, TextShape};
use crate::protocol::{Header, MessageType, HEADER_SIZE};
use crate::stats::SessionStats;
use crate::transport::Transport;

/// Character budget for the unframed-reply preview.
const REPLY_PREVIEW_CHARS: usize = 50;

/// Routes each received datagram to its handler and emits the reply.
pub struct Dispatcher<T: Transport> {
    transport: Arc<T>,
    stats: Arc<SessionStats>,
}

impl<T: Transport> Dispatcher<T> {
    /// Create a dispatcher over the given transport and counters.
    pub fn new(transport: Arc<T>, stats: Arc<SessionStats>) -> Self {
        Self { transport, stats }
    }

    /// Handle one received datagram from `peer`.
    ///
    /// Infallible by design: every failure mode inside is either a
    /// logged drop or a counted transport error.
    pub async fn handle(&self, datagram: Bytes, peer: SocketAddr) {
        self.stats.record_datagram(datagram.len());
        tracing::info!(%peer, len = datagram.len(), "datagram received");

        match Header::decode(&datagram) {
            Some(header) => self.handle_framed(header, datagram, peer).await,
            None => self.handle_unframed(datagram, peer).await,
        }
    }

    /// Framed path: bounds-check, slice payload, route by message type.
    async fn handle_framed(&self, header: Header, datagram: Bytes, peer: SocketAddr) {
        let msg_type = header.message_type();
        tracing::info!(
            msg_type = msg_type.name(),
            priority = header.message_priority().name(),
            sequence_id = header.sequence_id,
            "protocol message"
        );

        let payload_end = HEADER_SIZE.checked_add(header.payload_size as usize);
        let Some(payload_end) = payload_end.filter(|&end| end <= datagram.len()) else {
            // Data-quality condition: drop silently, not an error.
            tracing::warn!(
                declared = header.payload_size,
                available = datagram.len() - HEADER_SIZE,
                "payload size exceeds datagram, dropping"
            );
            return;
        };
        // Trailing bytes beyond payload_size are ignored.
        let payload = datagram.slice(HEADER_SIZE..payload_end);

        match msg_type {
            MessageType::Heartbeat => {
                tracing::debug!("heartbeat received");
                self.respond("heartbeat_ack", peer).await;
            }
            MessageType::Data => match DecodedPayload::from_bytes(payload) {
                DecodedPayload::Text(text) => {
                    tracing::info!(content = %text, "data message");
                    self.respond("data_received", peer).await;
                }
                DecodedPayload::Binary(data) => {
                    tracing::info!(len = data.len(), "binary data message");
                }
            },
            MessageType::Control => match DecodedPayload::from_bytes(payload) {
                DecodedPayload::Text(command) => {
                    tracing::info!(command = %command, "control command");
                    let reply = simulate_command(&command);
                    self.respond(&reply, peer).await;
                }
                DecodedPayload::Binary(_) => {
                    tracing::warn!("control command is not valid UTF-8");
                }
            },
            MessageType::Response => {
                // Never answered: two endpoints replying to each other's
                // replies would loop forever.
                tracing::info!("response message received");
            }
            MessageType::Error => match DecodedPayload::from_bytes(payload) {
                DecodedPayload::Text(text) => {
                    tracing::warn!(error = %text, "peer reported an error");
                }
                DecodedPayload::Binary(data) => {
                    tracing::warn!(len = data.len(), "peer reported a binary error");
                }
            },
            MessageType::Unknown(code) => {
                tracing::debug!(code, "no handler for message type");
            }
        }
    }

    /// Unframed path: text (with JSON inspection) or opaque binary.
    async fn handle_unframed(&self, datagram: Bytes, peer: SocketAddr) {
        match DecodedPayload::from_bytes(datagram) {
            DecodedPayload::Text(text) => {
                // JSON parse is observational only; the reply is the
                // same either way.
                match classify_text(&text) {
                    TextShape::Json(value) => tracing::info!(json = %value, "JSON message"),
                    TextShape::Plain => tracing::info!(message = %text, "text message"),
                }
                let reply = format!("Received message: {}", preview(&text, REPLY_PREVIEW_CHARS));
                self.respond(&reply, peer).await;
            }
            DecodedPayload::Binary(data) => {
                tracing::info!(len = data.len(), "binary message");
            }
        }
    }

    /// Send a reply, containing any transport failure right here.
    async fn respond(&self, text: &str, peer: SocketAddr) {
        let responder = Responder::new(self.transport.as_ref(), peer);
        if let Err(e) = responder.respond(text).await {
            self.stats.record_error();
            tracing::error!(%peer, error = %e, "failed to send response");
        }
    }
}
