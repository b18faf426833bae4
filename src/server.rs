//! Server lifecycle and receive loop.
//!
//! The [`Server`] manages the lifecycle:
//! 1. Bind the UDP socket (fatal on failure)
//! 2. Spawn the periodic stats reporter
//! 3. Receive datagrams sequentially and dispatch each one
//! 4. On shutdown, let the in-flight dispatch finish, stop the reporter
//!
//! Datagrams are processed strictly one at a time, with no per-datagram
//! spawning, so the dispatch path needs no locking of its own. Shutdown
//! is cooperative through a watch flag held by a [`ShutdownHandle`].
//!
//! # Example
//!
//! ```ignore
//! use udp2docker::{Server, ServerConfig};
//!
//! let server = Server::bind(&ServerConfig::default()).await?;
//! let shutdown = server.shutdown_handle();
//! server.run().await?;
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::watch;

use crate::config::ServerConfig;
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::stats::{spawn_reporter, SessionStats};
use crate::transport::{Transport, UdpTransport, RECV_BUFFER_SIZE};

/// Signals the server loop and reporter to stop.
///
/// Cheap to clone via the inner shared sender; safe to trigger from any
/// task (for example a Ctrl-C handler).
#[derive(Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    /// Request a cooperative shutdown. Idempotent.
    pub fn shutdown(&self) {
        let _ = self.tx.send(true);
    }
}

/// A bound, ready-to-run UDP endpoint.
pub struct Server {
    transport: Arc<UdpTransport>,
    stats: Arc<SessionStats>,
    stats_interval: std::time::Duration,
    shutdown_tx: Arc<watch::Sender<bool>>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Server {
    /// Bind the socket described by `config`.
    ///
    /// # Errors
    ///
    /// Bind failure is fatal to startup and is returned to the caller.
    pub async fn bind(config: &ServerConfig) -> Result<Self> {
        let transport = Arc::new(UdpTransport::bind(&config.bind_addr()).await?);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            transport,
            stats: Arc::new(SessionStats::new()),
            stats_interval: config.stats_interval,
            shutdown_tx: Arc::new(shutdown_tx),
            shutdown_rx,
        })
    }

    /// Address the socket is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.transport.local_addr()?)
    }

    /// Handle to the session counters (shared with the dispatch path).
    pub fn stats(&self) -> Arc<SessionStats> {
        self.stats.clone()
    }

    /// Handle for requesting shutdown from another task.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: self.shutdown_tx.clone(),
        }
    }

    /// Run the receive loop until shutdown is requested.
    ///
    /// Receive errors while running are logged, counted, and retried
    /// indefinitely; only the shutdown flag ends the loop.
    pub async fn run(self) -> Result<()> {
        tracing::info!(addr = %self.local_addr()?, "udp2docker server listening");

        let reporter = spawn_reporter(
            self.stats.clone(),
            self.stats_interval,
            self.shutdown_rx.clone(),
        );

        let dispatcher = Dispatcher::new(self.transport.clone(), self.stats.clone());
        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        let mut shutdown = self.shutdown_rx.clone();

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("shutdown requested, stopping receive loop");
                        break;
                    }
                }
                received = self.transport.recv_from(&mut buf) => match received {
                    Ok((len, peer)) => {
                        let datagram = Bytes::copy_from_slice(&buf[..len]);
                        // Sequential by design: the next receive waits
                        // for this dispatch to finish.
                        dispatcher.handle(datagram, peer).await;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to receive datagram");
                        self.stats.record_error();
                    }
                },
            }
        }

        // Stop the reporter even when shutdown came from a dropped handle.
        let _ = self.shutdown_tx.send(true);
        let _ = reporter.await;

        let snap = self.stats.snapshot();
        tracing::info!(
            messages_received = snap.messages_received,
            bytes_received = snap.bytes_received,
            errors = snap.errors,
            "server stopped"
        );
        Ok(())
    }
}
