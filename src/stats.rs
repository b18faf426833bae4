//! Session counters and the periodic stats reporter.
//!
//! [`SessionStats`] is the only state shared across the lifetime of the
//! process: the receive loop increments, the reporter task reads. All
//! counters are word-sized atomics, so the reporter can never observe a
//! torn value and no lock is required. Counters are monotonic and never
//! reset.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Default reporting interval.
pub const DEFAULT_STATS_INTERVAL: Duration = Duration::from_secs(30);

/// Process-wide traffic counters, created once at server start.
#[derive(Debug)]
pub struct SessionStats {
    messages_received: AtomicU64,
    bytes_received: AtomicU64,
    errors: AtomicU64,
    started_at: Instant,
}

impl SessionStats {
    /// Create fresh counters with the start time set to now.
    pub fn new() -> Self {
        Self {
            messages_received: AtomicU64::new(0),
            bytes_received: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    /// Record one received datagram of `len` bytes.
    ///
    /// Called unconditionally for every datagram, before any parsing.
    #[inline]
    pub fn record_datagram(&self, len: usize) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
        self.bytes_received.fetch_add(len as u64, Ordering::Relaxed);
    }

    /// Record a processing failure (send failure, receive failure,
    /// unexpected handling fault). Data-quality drops do not count.
    #[inline]
    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of datagrams received so far.
    #[inline]
    pub fn messages_received(&self) -> u64 {
        self.messages_received.load(Ordering::Relaxed)
    }

    /// Total bytes received so far.
    #[inline]
    pub fn bytes_received(&self) -> u64 {
        self.bytes_received.load(Ordering::Relaxed)
    }

    /// Number of processing failures so far.
    #[inline]
    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    /// Time elapsed since server start.
    #[inline]
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Consistent-enough read view for reporting.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            uptime: self.uptime(),
            messages_received: self.messages_received(),
            bytes_received: self.bytes_received(),
            errors: self.errors(),
        }
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of the session counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub uptime: Duration,
    pub messages_received: u64,
    pub bytes_received: u64,
    pub errors: u64,
}

/// Spawn the periodic reporter task.
///
/// Wakes on `interval` for the life of the process, logs a snapshot, and
/// exits when the shutdown flag flips to `true`. Read-only: this task
/// never mutates the counters.
pub fn spawn_reporter(
    stats: Arc<SessionStats>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately; skip it so the first
        // report lands one full interval after startup.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let snap = stats.snapshot();
                    tracing::info!(
                        uptime_secs = snap.uptime.as_secs(),
                        messages_received = snap.messages_received,
                        bytes_received = snap.bytes_received,
                        errors = snap.errors,
                        "server stats"
                    );
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
    })
}
