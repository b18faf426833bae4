//! Wire format encoding and decoding.
//!
//! Implements the 32-byte header format:
//! ```text
//! ┌───────┬─────────┬──────┬──────────┬────────┬───────────┬──────────────┬──────────┐
//! │ Magic │ Version │ Type │ Priority │ Seq ID │ Timestamp │ Payload Size │ Checksum │
//! │ 4 B   │ 2 B     │ 2 B  │ 4 B      │ 4 B    │ 4 B       │ 4 B          │ 4 B      │
//! │ u32 LE│ u16 LE  │u16 LE│ u32 LE   │ u32 LE │ u32 LE    │ u32 LE       │ u32 LE   │
//! └───────┴─────────┴──────┴──────────┴────────┴───────────┴──────────────┴──────────┘
//! ```
//!
//! All multi-byte integers are Little Endian. The magic number doubles as
//! the framing discriminator: a datagram that is too short or does not
//! start with it is not a protocol message and falls through to the
//! unframed text/binary path.

/// Magic number identifying a framed protocol message.
pub const MAGIC_NUMBER: u32 = 0x55AA_55AA;

/// Header size in bytes (fixed, exactly 32).
pub const HEADER_SIZE: usize = 32;

/// Protocol version emitted by this implementation.
pub const PROTOCOL_VERSION: u16 = 1;

/// Semantic message kind carried in the header `type` field.
///
/// Unknown codes are accepted at the header level; they simply get no
/// handler beyond logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    /// Liveness probe, answered with `heartbeat_ack`.
    Heartbeat,
    /// Application data, acknowledged with `data_received`.
    Data,
    /// Control command line (simulated execution only).
    Control,
    /// Reply from another endpoint; never answered (anti-loop).
    Response,
    /// Error report from a peer; logged only.
    Error,
    /// Any code outside 1..=5.
    Unknown(u16),
}

impl MessageType {
    /// Map a wire code to a message type.
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => MessageType::Heartbeat,
            2 => MessageType::Data,
            3 => MessageType::Control,
            4 => MessageType::Response,
            5 => MessageType::Error,
            other => MessageType::Unknown(other),
        }
    }

    /// Wire code for this message type.
    pub fn code(&self) -> u16 {
        match self {
            MessageType::Heartbeat => 1,
            MessageType::Data => 2,
            MessageType::Control => 3,
            MessageType::Response => 4,
            MessageType::Error => 5,
            MessageType::Unknown(code) => *code,
        }
    }

    /// Human-readable name, `"UNKNOWN"` for unmapped codes.
    pub fn name(&self) -> &'static str {
        match self {
            MessageType::Heartbeat => "HEARTBEAT",
            MessageType::Data => "DATA",
            MessageType::Control => "CONTROL",
            MessageType::Response => "RESPONSE",
            MessageType::Error => "MESSAGE_ERROR",
            MessageType::Unknown(_) => "UNKNOWN",
        }
    }
}

/// Message urgency carried in the header `priority` field.
///
/// Carried for observability only; it does not affect scheduling,
/// ordering, or response content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Low,
    Normal,
    High,
    Critical,
    /// Any code outside 1..=4.
    Unknown(u32),
}

impl Priority {
    /// Map a wire code to a priority.
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => Priority::Low,
            2 => Priority::Normal,
            3 => Priority::High,
            4 => Priority::Critical,
            other => Priority::Unknown(other),
        }
    }

    /// Wire code for this priority.
    pub fn code(&self) -> u32 {
        match self {
            Priority::Low => 1,
            Priority::Normal => 2,
            Priority::High => 3,
            Priority::Critical => 4,
            Priority::Unknown(code) => *code,
        }
    }

    /// Human-readable name, `"UNKNOWN"` for unmapped codes.
    pub fn name(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Normal => "NORMAL",
            Priority::High => "HIGH",
            Priority::Critical => "CRITICAL",
            Priority::Unknown(_) => "UNKNOWN",
        }
    }
}

/// Decoded header from wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Magic number (always `MAGIC_NUMBER` after a successful decode).
    pub magic: u32,
    /// Protocol version (carried, not validated).
    pub version: u16,
    /// Message type code (see [`MessageType`]).
    pub msg_type: u16,
    /// Priority code (see [`Priority`]).
    pub priority: u32,
    /// Sender-assigned sequence number (opaque, logged only).
    pub sequence_id: u32,
    /// Sender-supplied Unix timestamp, whole seconds (opaque, logged only).
    pub timestamp: u32,
    /// Length in bytes of the payload following the header.
    pub payload_size: u32,
    /// CRC-32 of the payload (carried, not verified by the server).
    pub checksum: u32,
}

impl Header {
    /// Create a header for an outgoing message.
    pub fn new(msg_type: MessageType, priority: Priority) -> Self {
        Self {
            magic: MAGIC_NUMBER,
            version: PROTOCOL_VERSION,
            msg_type: msg_type.code(),
            priority: priority.code(),
            sequence_id: 0,
            timestamp: 0,
            payload_size: 0,
            checksum: 0,
        }
    }

    /// Encode header to bytes (Little Endian).
    ///
    /// # Example
    ///
    /// ```
    /// use udp2docker::protocol::{Header, MessageType, Priority};
    ///
    /// let header = Header::new(MessageType::Heartbeat, Priority::Normal);
    /// assert_eq!(header.encode().len(), 32);
    /// ```
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        self.encode_into(&mut buf);
        buf
    }

    /// Encode header into an existing buffer.
    ///
    /// # Panics
    ///
    /// Panics if buffer is smaller than `HEADER_SIZE` (32 bytes).
    pub fn encode_into(&self, buf: &mut [u8]) {
        debug_assert!(buf.len() >= HEADER_SIZE);
        buf[0..4].copy_from_slice(&self.magic.to_le_bytes());
        buf[4..6].copy_from_slice(&self.version.to_le_bytes());
        buf[6..8].copy_from_slice(&self.msg_type.to_le_bytes());
        buf[8..12].copy_from_slice(&self.priority.to_le_bytes());
        buf[12..16].copy_from_slice(&self.sequence_id.to_le_bytes());
        buf[16..20].copy_from_slice(&self.timestamp.to_le_bytes());
        buf[20..24].copy_from_slice(&self.payload_size.to_le_bytes());
        buf[24..28].copy_from_slice(&self.checksum.to_le_bytes());
    }

    /// Decode header from bytes (Little Endian).
    ///
    /// Returns `None` if the buffer is shorter than 32 bytes or does not
    /// begin with [`MAGIC_NUMBER`]. Absence of a match is a normal return
    /// variant, not an error: the datagram is simply not framed.
    ///
    /// # Example
    ///
    /// ```
    /// use udp2docker::protocol::Header;
    ///
    /// assert!(Header::decode(b"hello").is_none());
    /// ```
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() < HEADER_SIZE {
            return None;
        }
        let magic = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
        if magic != MAGIC_NUMBER {
            return None;
        }
        Some(Self {
            magic,
            version: u16::from_le_bytes([buf[4], buf[5]]),
            msg_type: u16::from_le_bytes([buf[6], buf[7]]),
            priority: u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]),
            sequence_id: u32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]),
            timestamp: u32::from_le_bytes([buf[16], buf[17], buf[18], buf[19]]),
            payload_size: u32::from_le_bytes([buf[20], buf[21], buf[22], buf[23]]),
            checksum: u32::from_le_bytes([buf[24], buf[25], buf[26], buf[27]]),
        })
    }

    /// Message type of this header.
    #[inline]
    pub fn message_type(&self) -> MessageType {
        MessageType::from_code(self.msg_type)
    }

    /// Priority of this header.
    #[inline]
    pub fn message_priority(&self) -> Priority {
        Priority::from_code(self.priority)
    }
}
