//! Protocol events reported to the consumer.

use crate::prefix::User;

/// Something observed on the wire that the consumer may care about.
///
/// Produced by the dispatcher after it has applied any membership change,
/// so a snapshot taken while handling the event already reflects it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Event {
    UserJoined {
        user: User,
        channel: String,
    },
    UserLeft {
        user: User,
        channel: String,
        reason: Option<String>,
    },
    NicknameChanged {
        user: User,
        nickname: String,
    },
    UserKicked {
        /// Who issued the KICK.
        kicker: User,
        /// Nickname that was removed.
        kicked: String,
        channel: String,
        reason: Option<String>,
    },
    UserQuit {
        user: User,
        reason: Option<String>,
    },
    ChannelMessage {
        user: User,
        channel: String,
        text: String,
    },
    PrivateMessage {
        user: User,
        text: String,
    },
    ChannelNotice {
        user: User,
        channel: String,
        text: String,
    },
    PrivateNotice {
        user: User,
        text: String,
    },
    /// The NAMES reply for `channel` is complete.
    NamesComplete {
        channel: String,
    },
}
