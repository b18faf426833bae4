//! Protocol layer: wire format and message construction.

mod message;
mod wire_format;

pub use message::{crc32, Message, MessageBuilder, SequenceCounter, MAX_MESSAGE_SIZE, MAX_PAYLOAD_SIZE};
pub use wire_format::{Header, MessageType, Priority, HEADER_SIZE, MAGIC_NUMBER, PROTOCOL_VERSION};
