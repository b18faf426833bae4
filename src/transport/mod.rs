//! Transport abstraction over the UDP socket.

mod udp;

pub use udp::{Transport, UdpTransport, RECV_BUFFER_SIZE};
