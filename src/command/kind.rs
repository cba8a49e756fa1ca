//! The closed set of inbound commands the dispatcher understands.

/// `RPL_WELCOME`
pub const RPL_WELCOME: u16 = 1;
/// `RPL_NAMREPLY`
pub const RPL_NAMREPLY: u16 = 353;
/// `RPL_ENDOFNAMES`
pub const RPL_ENDOFNAMES: u16 = 366;

/// Classification of an inbound command token.
///
/// Every token maps to exactly one variant; anything the engine does not
/// act on lands in [`CommandKind::Unknown`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Ping,
    Pong,
    Privmsg,
    Notice,
    Join,
    Part,
    Kick,
    Quit,
    Nick,
    Error,
    /// Three-digit numeric reply.
    Numeric(u16),
    Unknown,
}

impl CommandKind {
    /// Classify a command token. Words are matched case-insensitively.
    pub fn from_token(token: &str) -> Self {
        if token.len() == 3 && token.bytes().all(|b| b.is_ascii_digit()) {
            // three ASCII digits always fit
            return token.parse().map_or(CommandKind::Unknown, CommandKind::Numeric);
        }

        match token.to_ascii_uppercase().as_str() {
            "PING" => CommandKind::Ping,
            "PONG" => CommandKind::Pong,
            "PRIVMSG" => CommandKind::Privmsg,
            "NOTICE" => CommandKind::Notice,
            "JOIN" => CommandKind::Join,
            "PART" => CommandKind::Part,
            "KICK" => CommandKind::Kick,
            "QUIT" => CommandKind::Quit,
            "NICK" => CommandKind::Nick,
            "ERROR" => CommandKind::Error,
            _ => CommandKind::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words() {
        assert_eq!(CommandKind::from_token("PRIVMSG"), CommandKind::Privmsg);
        assert_eq!(CommandKind::from_token("privmsg"), CommandKind::Privmsg);
        assert_eq!(CommandKind::from_token("Nick"), CommandKind::Nick);
    }

    #[test]
    fn test_numerics() {
        assert_eq!(CommandKind::from_token("353"), CommandKind::Numeric(RPL_NAMREPLY));
        assert_eq!(CommandKind::from_token("001"), CommandKind::Numeric(RPL_WELCOME));
        assert_eq!(CommandKind::from_token("366"), CommandKind::Numeric(RPL_ENDOFNAMES));
    }

    #[test]
    fn test_unknown() {
        assert_eq!(CommandKind::from_token("CAP"), CommandKind::Unknown);
        assert_eq!(CommandKind::from_token("12"), CommandKind::Unknown);
        assert_eq!(CommandKind::from_token("1234"), CommandKind::Unknown);
        assert_eq!(CommandKind::from_token("3a3"), CommandKind::Unknown);
    }
}
