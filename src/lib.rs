//! # slirc-client
//!
//! A client engine for the IRC protocol: one connection, the registration
//! handshake, channel membership tracking and ping/pong liveness, with
//! everything observed on the wire reported through a [`Handler`].
//!
//! ## Features
//!
//! - Line parser with prefix, middle and trailing parameter handling
//! - Hostmask parsing and RFC 1459 case-folding
//! - Channel membership registry kept up to date from JOIN, PART, KICK,
//!   QUIT, NICK and NAMES
//! - Tokio connection manager with pluggable TCP/TLS transports (`tokio`
//!   feature, on by default)
//! - UTF-8 decoding with a per-line legacy encoding fallback
//!
//! The parser, registry and dispatcher do no I/O and build without the
//! `tokio` feature.

#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! ## Quick Start
//!
//! ### Parsing IRC Messages
//!
//! ```rust
//! use slirc_client::Message;
//!
//! let message: Message = ":nick!user@host PRIVMSG #chan :hello there".parse().unwrap();
//! assert_eq!(message.command, "PRIVMSG");
//! assert_eq!(message.params, vec!["#chan"]);
//! assert_eq!(message.trailing.as_deref(), Some("hello there"));
//! assert_eq!(message.source().unwrap().nickname(), "nick");
//! ```
//!
//! ### Tracking State Without a Connection
//!
//! ```rust
//! use slirc_client::dispatch::dispatch;
//! use slirc_client::{Message, SessionState};
//!
//! let state = SessionState::new("me");
//! for line in [":me!u@h JOIN #x", ":bob!b@h JOIN #x"] {
//!     dispatch(&state, &line.parse::<Message>().unwrap());
//! }
//! assert!(state.channels().is_member("#x", "bob"));
//! ```

pub mod casemap;
pub mod channels;
pub mod command;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod message;
pub mod prefix;
pub mod state;

#[cfg(feature = "tokio")]
pub mod client;
#[cfg(feature = "tokio")]
mod keepalive;
#[cfg(feature = "tokio")]
pub mod line;
#[cfg(feature = "tokio")]
pub mod transport;

pub use self::casemap::{irc_eq, irc_to_lower};
pub use self::channels::ChannelRegistry;
pub use self::command::{Command, CommandKind};
pub use self::dispatch::Action;
pub use self::error::{ClientError, MessageParseError, ProtocolError};
pub use self::event::Event;
pub use self::message::Message;
pub use self::prefix::{Prefix, User};
pub use self::state::{CloseReason, ConnectionState, SessionState};

#[cfg(feature = "tokio")]
pub use self::client::{Client, ClientConfig, Handler};
#[cfg(feature = "tokio")]
pub use self::line::{DecodedLine, LineCodec, MAX_IRC_LINE_LEN};
#[cfg(feature = "tokio")]
pub use self::transport::{BoxedStream, Connector, TcpConnector, TlsConnector};
