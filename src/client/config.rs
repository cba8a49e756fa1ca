//! Client configuration.

use std::time::Duration;

use crate::line::MAX_IRC_LINE_LEN;

/// Connection settings for a [`Client`](super::Client).
///
/// ```
/// use slirc_client::ClientConfig;
///
/// let config = ClientConfig {
///     server: "irc.libera.chat".into(),
///     port: 6697,
///     use_tls: true,
///     nickname: "slirc".into(),
///     ..ClientConfig::default()
/// };
/// assert_eq!(config.fallback_encoding, "iso-8859-1");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClientConfig {
    pub server: String,
    pub port: u16,
    pub nickname: String,
    pub username: String,
    pub realname: String,
    /// Encoding label tried when an inbound line is not valid UTF-8.
    pub fallback_encoding: String,
    /// Quiet period after which a PING is sent.
    pub ping_interval: Duration,
    /// How long to wait for any traffic after a PING.
    pub ping_timeout: Duration,
    /// Inbound lines longer than this are discarded; outbound lines longer
    /// than this are rejected.
    pub max_line_len: usize,
    /// Wrap the default TCP transport in TLS. Ignored when a connector is
    /// supplied with [`Client::with_connector`](super::Client::with_connector).
    pub use_tls: bool,
}

impl ClientConfig {
    /// `host:port`, as used in log lines and connect errors.
    pub fn address(&self) -> String {
        format!("{}:{}", self.server, self.port)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            server: "localhost".to_owned(),
            port: 6667,
            nickname: "slirc".to_owned(),
            username: "slirc".to_owned(),
            realname: "slirc client".to_owned(),
            fallback_encoding: "iso-8859-1".to_owned(),
            ping_interval: Duration::from_secs(120),
            ping_timeout: Duration::from_secs(30),
            max_line_len: MAX_IRC_LINE_LEN,
            use_tls: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.port, 6667);
        assert_eq!(config.ping_interval, Duration::from_secs(120));
        assert_eq!(config.ping_timeout, Duration::from_secs(30));
        assert_eq!(config.max_line_len, 8191);
        assert!(!config.use_tls);
        assert_eq!(config.address(), "localhost:6667");
    }
}
