//! Connection lifecycle and per-session state.

use parking_lot::RwLock;

use crate::casemap::irc_eq;
use crate::channels::ChannelRegistry;

/// Lifecycle of a connection.
///
/// `Disconnected -> Connecting -> Connected`; every teardown returns to
/// `Disconnected`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConnectionState {
    /// No transport held.
    #[default]
    Disconnected,
    /// Transport being acquired, registration not yet sent.
    Connecting,
    /// Registration sent, read loop running.
    Connected,
}

/// Why a session ended.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CloseReason {
    /// `disconnect` was called.
    Requested,
    /// End of stream or a transport error; no QUIT was sent.
    ConnectionLost(String),
    /// No inbound traffic within the ping interval plus the ping timeout.
    PingTimeout,
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Requested => f.write_str("disconnect requested"),
            Self::ConnectionLost(cause) => write!(f, "connection lost: {}", cause),
            Self::PingTimeout => f.write_str("ping timeout"),
        }
    }
}

/// State the dispatcher reads and updates: channel membership and our own
/// nickname as confirmed by the server.
#[derive(Debug)]
pub struct SessionState {
    channels: ChannelRegistry,
    nickname: RwLock<String>,
}

impl SessionState {
    pub fn new(nickname: impl Into<String>) -> Self {
        SessionState {
            channels: ChannelRegistry::new(),
            nickname: RwLock::new(nickname.into()),
        }
    }

    pub fn channels(&self) -> &ChannelRegistry {
        &self.channels
    }

    /// Our nickname as last confirmed by the server.
    pub fn nickname(&self) -> String {
        self.nickname.read().clone()
    }

    pub(crate) fn set_nickname(&self, nickname: &str) {
        *self.nickname.write() = nickname.to_owned();
    }

    /// Whether `nick` refers to us.
    pub fn is_me(&self, nick: &str) -> bool {
        irc_eq(&self.nickname.read(), nick)
    }

    /// Forget all channels and restore the configured nickname.
    pub(crate) fn reset(&self, nickname: &str) {
        self.channels.clear();
        self.set_nickname(nickname);
    }
}
