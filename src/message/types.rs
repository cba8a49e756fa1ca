//! Parsed inbound message.

use std::str::FromStr;

use crate::command::CommandKind;
use crate::error::MessageParseError;
use crate::prefix::{Prefix, User};

use super::parse::tokenize;

/// One parsed protocol line.
///
/// Produced by [`Message::parse`] and consumed by the dispatcher. The
/// trailing parameter is kept apart from the middle parameters so callers
/// can tell `PART #x :bye` from `PART #x bye`, while [`Message::arg`]
/// indexes both as one list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Raw IRCv3 tags without the leading `@`.
    pub tags: Option<String>,
    pub prefix: Option<Prefix>,
    /// The command token as received (word or three-digit numeric).
    pub command: String,
    /// Middle parameters, in order.
    pub params: Vec<String>,
    /// Trailing parameter without its leading `:`.
    pub trailing: Option<String>,
}

impl Message {
    /// Parse one decoded line. A trailing CRLF is ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use slirc_client::Message;
    ///
    /// let msg = Message::parse(":nick!user@host PRIVMSG #chan :hello there").unwrap();
    /// assert_eq!(msg.command, "PRIVMSG");
    /// assert_eq!(msg.params, vec!["#chan"]);
    /// assert_eq!(msg.trailing.as_deref(), Some("hello there"));
    /// ```
    pub fn parse(line: &str) -> Result<Self, MessageParseError> {
        let tokens = tokenize(line)?;
        Ok(Message {
            tags: tokens.tags.map(str::to_owned),
            prefix: tokens.prefix.map(Prefix::parse),
            command: tokens.command.to_owned(),
            params: tokens.middle.into_iter().map(str::to_owned).collect(),
            trailing: tokens.trailing.map(str::to_owned),
        })
    }

    /// Classification of the command token.
    pub fn kind(&self) -> CommandKind {
        CommandKind::from_token(&self.command)
    }

    /// Number of parameters, trailing included.
    pub fn arg_count(&self) -> usize {
        self.params.len() + usize::from(self.trailing.is_some())
    }

    /// Parameter `n`, counting the trailing parameter as the last one.
    pub fn arg(&self, n: usize) -> Option<&str> {
        match self.params.get(n) {
            Some(param) => Some(param.as_str()),
            None if n == self.params.len() => self.trailing.as_deref(),
            None => None,
        }
    }

    /// The sender as a user, if the line carried a prefix.
    pub fn source(&self) -> Option<User> {
        self.prefix.as_ref().map(Prefix::to_user)
    }
}

impl FromStr for Message {
    type Err = MessageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Message::parse(s)
    }
}
