//! Outbound IRC commands.
//!
//! # Reference
//! - RFC 2812: Internet Relay Chat: Client Protocol

/// A command the client sends to the server.
///
/// Serialize with [`ToString`]; the line terminator is added by the codec.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Command {
    /// `NICK nickname`
    NICK(String),
    /// `USER username mode * :realname`
    USER(String, String, String),
    /// `JOIN channel`
    JOIN(String),
    /// `PART channel [:reason]`
    PART(String, Option<String>),
    /// `PRIVMSG target :text`
    PRIVMSG(String, String),
    /// `NOTICE target :text`
    NOTICE(String, String),
    /// `KICK channel user [:reason]`
    KICK(String, String, Option<String>),
    /// `QUIT [:reason]`
    QUIT(Option<String>),
    /// `PING token`
    PING(String),
    /// `PONG token`
    PONG(String),
    /// A preformatted line, sent verbatim.
    Raw(String),
}
