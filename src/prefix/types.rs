//! Message source types.
//!
//! A prefix identifies where a line came from: either a server name or a
//! user's `nick!user@host` mask.
//!
//! # Reference
//! - RFC 2812 Section 2.3.1: Message format

use std::str::FromStr;

/// A user identity parsed from a hostmask.
///
/// Any string is accepted: `nick`, `nick!user`, `nick@host` and
/// `nick!user@host` all parse, with absent parts left empty. Only the
/// nickname takes part in channel membership; username and hostname are
/// informational.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct User {
    nickname: String,
    username: String,
    hostname: String,
}

#[derive(Copy, Clone, Eq, PartialEq)]
enum Part {
    Name,
    User,
    Host,
}

/// Split a mask into its three parts. The first `!` before any `@` starts
/// the username, the first `@` starts the hostname.
fn split_mask(s: &str) -> (String, String, String, bool) {
    let mut name = String::new();
    let mut user = String::new();
    let mut host = String::new();
    let mut part = Part::Name;
    let mut dotted_name = false;

    for c in s.chars() {
        match c {
            '!' if part == Part::Name => part = Part::User,
            '@' if part != Part::Host => part = Part::Host,
            _ => {
                if c == '.' && part == Part::Name {
                    dotted_name = true;
                }
                match part {
                    Part::Name => &mut name,
                    Part::User => &mut user,
                    Part::Host => &mut host,
                }
                .push(c);
            }
        }
    }

    (name, user, host, dotted_name)
}

impl User {
    /// Parse a hostmask. Never fails.
    pub fn parse(s: &str) -> Self {
        let (nickname, username, hostname, _) = split_mask(s);
        User {
            nickname,
            username,
            hostname,
        }
    }

    /// Build a user from its components.
    ///
    /// # Example
    ///
    /// ```
    /// use slirc_client::User;
    ///
    /// let user = User::new("bob", "robert", "example.org");
    /// assert_eq!(user.to_string(), "bob!robert@example.org");
    /// ```
    pub fn new(
        nickname: impl Into<String>,
        username: impl Into<String>,
        hostname: impl Into<String>,
    ) -> Self {
        User {
            nickname: nickname.into(),
            username: username.into(),
            hostname: hostname.into(),
        }
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// Username (ident); empty when the mask carried none.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Hostname; empty when the mask carried none.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }
}

impl FromStr for User {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(User::parse(s))
    }
}

impl From<&str> for User {
    fn from(s: &str) -> Self {
        User::parse(s)
    }
}

/// IRC message prefix.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Prefix {
    /// Server name (e.g., "irc.example.com")
    ServerName(String),
    /// A user's hostmask.
    User(User),
}

impl Prefix {
    /// Parse a prefix string (without the leading `:`).
    ///
    /// A bare name containing a dot and no `!`/`@` is taken to be a server.
    pub fn parse(s: &str) -> Self {
        let (name, user, host, dotted_name) = split_mask(s);
        if dotted_name && !s.contains(['!', '@']) {
            Prefix::ServerName(name)
        } else {
            Prefix::User(User {
                nickname: name,
                username: user,
                hostname: host,
            })
        }
    }

    pub fn is_server(&self) -> bool {
        matches!(self, Prefix::ServerName(_))
    }

    /// The sender as a [`User`]. A server name becomes a bare nickname.
    pub fn to_user(&self) -> User {
        match self {
            Prefix::User(user) => user.clone(),
            Prefix::ServerName(name) => User::new(name.as_str(), "", ""),
        }
    }
}

impl From<&str> for Prefix {
    fn from(s: &str) -> Self {
        Prefix::parse(s)
    }
}
