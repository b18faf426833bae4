//! Outbound message construction.
//!
//! A [`Message`] is a header plus payload, assembled into a single
//! datagram with [`Message::encode`]. Convenience constructors cover the
//! standard traffic kinds (heartbeat, data, control, error); the
//! [`MessageBuilder`] covers everything else.
//!
//! The server never validates the checksum it receives, but outgoing
//! messages still carry a CRC-32 of the payload so peers that do verify
//! can.
//!
//! # Example
//!
//! ```
//! use udp2docker::protocol::Message;
//!
//! let datagram = Message::heartbeat().encode().unwrap();
//! assert_eq!(datagram.len(), 32 + 2); // header + "HB"
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;

use super::wire_format::{Header, MessageType, Priority, HEADER_SIZE};
use crate::error::{Result, ServerError};

/// Maximum total message size in bytes (header + payload).
pub const MAX_MESSAGE_SIZE: usize = 65536;

/// Maximum payload size in bytes.
pub const MAX_PAYLOAD_SIZE: usize = MAX_MESSAGE_SIZE - HEADER_SIZE;

/// Monotonic sequence id source for outgoing messages.
///
/// Starts at 1 and wraps on overflow. Safe to share across tasks.
#[derive(Debug)]
pub struct SequenceCounter {
    next: AtomicU32,
}

impl SequenceCounter {
    /// Create a counter starting at 1.
    pub fn new() -> Self {
        Self {
            next: AtomicU32::new(1),
        }
    }

    /// Take the next sequence id.
    #[inline]
    pub fn next(&self) -> u32 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for SequenceCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// A complete protocol message (header + payload).
#[derive(Debug, Clone)]
pub struct Message {
    /// Message header; `payload_size`, `timestamp` and `checksum` are
    /// filled in by [`Message::encode`].
    pub header: Header,
    /// Payload bytes (zero-copy via `bytes::Bytes`).
    pub payload: Bytes,
}

impl Message {
    /// Create a message from type, priority and payload.
    pub fn new(msg_type: MessageType, priority: Priority, payload: Bytes) -> Self {
        Self {
            header: Header::new(msg_type, priority),
            payload,
        }
    }

    /// Create a heartbeat message (payload `"HB"`, normal priority).
    pub fn heartbeat() -> Self {
        Self::new(
            MessageType::Heartbeat,
            Priority::Normal,
            Bytes::from_static(b"HB"),
        )
    }

    /// Create a data message with normal priority.
    pub fn data(payload: impl Into<Bytes>) -> Self {
        Self::new(MessageType::Data, Priority::Normal, payload.into())
    }

    /// Create a control message with high priority.
    pub fn control(command: &str) -> Self {
        Self::new(
            MessageType::Control,
            Priority::High,
            Bytes::copy_from_slice(command.as_bytes()),
        )
    }

    /// Create an error message with high priority.
    pub fn error(description: &str) -> Self {
        Self::new(
            MessageType::Error,
            Priority::High,
            Bytes::copy_from_slice(description.as_bytes()),
        )
    }

    /// Get the payload length.
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Total size on the wire (header + payload).
    #[inline]
    pub fn total_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    /// Assign a sequence id.
    pub fn with_sequence_id(mut self, sequence_id: u32) -> Self {
        self.header.sequence_id = sequence_id;
        self
    }

    /// Encode into a single datagram buffer.
    ///
    /// Stamps the header with the payload size, the current Unix time in
    /// whole seconds, and the CRC-32 of the payload.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Protocol`] if the payload exceeds
    /// [`MAX_PAYLOAD_SIZE`].
    pub fn encode(&self) -> Result<Vec<u8>> {
        if self.payload.len() > MAX_PAYLOAD_SIZE {
            return Err(ServerError::Protocol(format!(
                "payload size {} exceeds maximum {}",
                self.payload.len(),
                MAX_PAYLOAD_SIZE
            )));
        }

        let mut header = self.header;
        header.payload_size = self.payload.len() as u32;
        header.timestamp = unix_timestamp();
        header.checksum = crc32(&self.payload);

        let mut buf = Vec::with_capacity(HEADER_SIZE + self.payload.len());
        buf.extend_from_slice(&header.encode());
        buf.extend_from_slice(&self.payload);
        Ok(buf)
    }
}

/// Fluent builder for protocol messages.
///
/// # Example
///
/// ```
/// use udp2docker::protocol::{MessageBuilder, MessageType, Priority};
///
/// let msg = MessageBuilder::new()
///     .msg_type(MessageType::Data)
///     .priority(Priority::Critical)
///     .payload_str("telemetry")
///     .sequence_id(7)
///     .build();
/// assert_eq!(msg.header.sequence_id, 7);
/// ```
#[derive(Debug)]
pub struct MessageBuilder {
    message: Message,
}

impl MessageBuilder {
    /// Start a builder (defaults: DATA, NORMAL, empty payload).
    pub fn new() -> Self {
        Self {
            message: Message::new(MessageType::Data, Priority::Normal, Bytes::new()),
        }
    }

    /// Set the message type.
    pub fn msg_type(mut self, msg_type: MessageType) -> Self {
        self.message.header.msg_type = msg_type.code();
        self
    }

    /// Set the priority.
    pub fn priority(mut self, priority: Priority) -> Self {
        self.message.header.priority = priority.code();
        self
    }

    /// Set the payload from raw bytes.
    pub fn payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.message.payload = payload.into();
        self
    }

    /// Set the payload from a string.
    pub fn payload_str(mut self, payload: &str) -> Self {
        self.message.payload = Bytes::copy_from_slice(payload.as_bytes());
        self
    }

    /// Set the sequence id.
    pub fn sequence_id(mut self, sequence_id: u32) -> Self {
        self.message.header.sequence_id = sequence_id;
        self
    }

    /// Finish building.
    pub fn build(self) -> Message {
        self.message
    }
}

impl Default for MessageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Current Unix time in whole seconds, truncated to u32.
fn unix_timestamp() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0)
}

/// CRC-32 (reflected, polynomial 0xEDB88320, init and final XOR
/// 0xFFFFFFFF) over the payload bytes.
pub fn crc32(data: &[u8]) -> u32 {
    let mut checksum = 0xFFFF_FFFFu32;
    for &b in data {
        checksum ^= u32::from(b);
        for _ in 0..8 {
            if checksum & 1 != 0 {
                checksum = (checksum >> 1) ^ 0xEDB8_8320;
            } else {
                checksum >>= 1;
            }
        }
    }
    !checksum
}
