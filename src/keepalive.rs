//! Ping/pong liveness detection.
//!
//! Two timers run in sequence. The interval timer waits for a quiet
//! period; when it expires a PING is due and the timeout timer starts.
//! Any inbound line, not only a matching PONG, resets both. If the timeout
//! expires first the link is considered dead.
//!
//! [`Keepalive`] only measures time. Sending the PING and tearing the
//! connection down are left to the caller so both go through the same
//! paths as every other write and every other teardown.

use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::timeout;

/// Keepalive timers for one session.
#[derive(Debug)]
pub struct Keepalive {
    interval: Duration,
    timeout: Duration,
    activity: Notify,
}

impl Keepalive {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Keepalive {
            interval,
            timeout,
            activity: Notify::new(),
        }
    }

    /// Record inbound traffic.
    pub fn touch(&self) {
        self.activity.notify_one();
    }

    /// Wait until the link has been quiet for a whole interval and return
    /// the token for the PING to send.
    pub async fn idle(&self) -> String {
        while timeout(self.interval, self.activity.notified()).await.is_ok() {}
        probe_token()
    }

    /// Wait for traffic after a PING. Returns `false` on timeout.
    pub async fn await_reply(&self) -> bool {
        timeout(self.timeout, self.activity.notified()).await.is_ok()
    }
}

fn probe_token() -> String {
    chrono::Utc::now().timestamp().to_string()
}
