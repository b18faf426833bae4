//! Response emission.
//!
//! A [`Responder`] is scoped to the peer that sent the datagram being
//! handled. It encodes reply text as UTF-8 and hands it to the transport;
//! send failures are surfaced to the dispatcher, which owns the error
//! policy (log, count, never propagate past the datagram).

use std::net::SocketAddr;

use crate::error::Result;
use crate::transport::Transport;

/// Reply channel for a single datagram's originating peer.
pub struct Responder<'a, T: Transport> {
    transport: &'a T,
    peer: SocketAddr,
}

impl<'a, T: Transport> Responder<'a, T> {
    /// Create a responder scoped to `peer`.
    pub fn new(transport: &'a T, peer: SocketAddr) -> Self {
        Self { transport, peer }
    }

    /// Send `text` to the peer as one datagram.
    ///
    /// # Errors
    ///
    /// Surfaces the transport failure (unreachable peer, closed socket)
    /// to the caller; it is not swallowed here.
    pub async fn respond(&self, text: &str) -> Result<()> {
        self.transport.send_to(text.as_bytes(), self.peer).await?;
        tracing::debug!(
            peer = %self.peer,
            reply = %crate::codec::preview(text, 50),
            "response sent"
        );
        Ok(())
    }
}
