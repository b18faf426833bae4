//! # udp2docker
//!
//! Diagnostic UDP endpoint for the udp2docker remote control channel.
//!
//! Accepts datagrams framed by an optional fixed-size binary header,
//! classifies each one by message type and priority, and reacts with a
//! minimal protocol-specific response. It is a reachability endpoint,
//! not a durable service: no persistence, no coordination, no
//! authentication, and the control-command path only simulates
//! execution.
//!
//! ## Architecture
//!
//! - **protocol**: 32-byte little-endian header codec and message builder
//! - **transport**: UDP socket behind a small trait for testability
//! - **dispatch**: per-datagram routing and response emission
//! - **stats**: process-wide counters plus a periodic reporter task
//!
//! ## Example
//!
//! ```ignore
//! use udp2docker::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> udp2docker::Result<()> {
//!     let server = Server::bind(&ServerConfig::from_env()?).await?;
//!     server.run().await
//! }
//! ```

pub mod codec;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod stats;
pub mod transport;

mod server;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use server::{Server, ShutdownHandle};
