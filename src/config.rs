//! Environment-based server configuration.
//!
//! Configuration comes from environment variables, matching the
//! deployment surface of the original endpoint:
//!
//! - `UDP_HOST` - bind host (default `0.0.0.0`)
//! - `UDP_PORT` - bind port (default `8888`)
//! - `STATS_INTERVAL_SECS` - reporter cadence (default `30`)
//!
//! `LOG_LEVEL` is read by the tracing filter in the binary, not here.
//! The lookup function is injected so tests never touch the process
//! environment.

use std::time::Duration;

use crate::error::{Result, ServerError};
use crate::stats::DEFAULT_STATS_INTERVAL;

/// Default bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 8888;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port (0 = ephemeral).
    pub port: u16,
    /// Cadence of the periodic stats report.
    pub stats_interval: Duration,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an injected variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] when a present variable fails to
    /// parse or holds an unusable value (a zero stats interval); absent
    /// variables fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("UDP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("UDP_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ServerError::Config(format!("invalid UDP_PORT: {raw:?}")))?,
            None => DEFAULT_PORT,
        };

        let stats_interval = match lookup("STATS_INTERVAL_SECS") {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|_| {
                    ServerError::Config(format!("invalid STATS_INTERVAL_SECS: {raw:?}"))
                })?;
                // A zero period would panic the reporter's interval timer.
                if secs == 0 {
                    return Err(ServerError::Config(
                        "STATS_INTERVAL_SECS must be at least 1".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_STATS_INTERVAL,
        };

        Ok(Self {
            host,
            port,
            stats_interval,
        })
    }

    /// Address string for binding, `host:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            stats_interval: DEFAULT_STATS_INTERVAL,
        }
    }
}
