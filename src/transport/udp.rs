//! UDP socket transport.
//!
//! The dispatcher and responder talk to the network through the
//! [`Transport`] trait rather than a socket type, so tests can substitute
//! a scripted transport and capture what would have gone on the wire.
//!
//! # Example
//!
//! ```ignore
//! use udp2docker::transport::UdpTransport;
//!
//! let transport = UdpTransport::bind("127.0.0.1:0").await?;
//! let mut buf = vec![0u8; 65536];
//! let (len, peer) = transport.recv_from(&mut buf).await?;
//! transport.send_to(b"heartbeat_ack", peer).await?;
//! ```

use std::io;
use std::net::SocketAddr;

use tokio::net::UdpSocket;

use crate::error::Result;

/// Receive buffer size in bytes (one maximal datagram).
pub const RECV_BUFFER_SIZE: usize = 65536;

/// Datagram transport surface consumed by the dispatch path.
pub trait Transport: Send + Sync {
    /// Receive one datagram. Blocks until a datagram arrives or the
    /// socket is closed.
    fn recv_from(
        &self,
        buf: &mut [u8],
    ) -> impl std::future::Future<Output = io::Result<(usize, SocketAddr)>> + Send;

    /// Send one datagram to `target`.
    fn send_to(
        &self,
        buf: &[u8],
        target: SocketAddr,
    ) -> impl std::future::Future<Output = io::Result<usize>> + Send;
}

/// UDP implementation over a tokio socket.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Bind to the given address.
    ///
    /// Binding failure is fatal to startup and is surfaced to the caller.
    pub async fn bind(addr: &str) -> Result<Self> {
        let socket = UdpSocket::bind(addr).await?;
        Ok(Self { socket })
    }

    /// Local address the socket is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

impl Transport for UdpTransport {
    async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        self.socket.recv_from(buf).await
    }

    async fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize> {
        self.socket.send_to(buf, target).await
    }
}
