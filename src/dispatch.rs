//! Inbound message dispatch.
//!
//! The dispatcher is sans-IO: it applies membership changes to the
//! [`SessionState`] and returns at most one [`Action`] for the caller to
//! carry out, either a reply to write or an event to deliver.

use tracing::debug;

use crate::command::{Command, CommandKind, RPL_ENDOFNAMES, RPL_NAMREPLY, RPL_WELCOME};
use crate::event::Event;
use crate::message::Message;
use crate::prefix::User;
use crate::state::SessionState;

/// Channel name prefixes (RFC 2812 Section 1.3).
const CHANNEL_PREFIXES: &[char] = &['#', '&', '+', '!'];

/// Membership prefixes that may precede a nickname in a NAMES reply.
const MEMBERSHIP_PREFIXES: &[char] = &['~', '&', '@', '%', '+'];

/// Outcome of dispatching one message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Write this command to the server.
    Send(Command),
    /// Deliver this event to the consumer.
    Notify(Event),
}

/// Whether `target` names a channel rather than a user.
pub fn is_channel_name(target: &str) -> bool {
    target.starts_with(CHANNEL_PREFIXES)
}

/// Apply `msg` to `state` and return what the caller should do next.
pub fn dispatch(state: &SessionState, msg: &Message) -> Option<Action> {
    match msg.kind() {
        CommandKind::Ping => on_ping(msg),
        CommandKind::Privmsg => on_privmsg(msg),
        CommandKind::Notice => on_notice(msg),
        CommandKind::Join => on_join(state, msg),
        CommandKind::Part => on_part(state, msg),
        CommandKind::Kick => on_kick(state, msg),
        CommandKind::Quit => on_quit(state, msg),
        CommandKind::Nick => on_nick(state, msg),
        CommandKind::Numeric(RPL_WELCOME) => on_welcome(state, msg),
        CommandKind::Numeric(RPL_NAMREPLY) => on_names(state, msg),
        CommandKind::Numeric(RPL_ENDOFNAMES) => on_end_of_names(msg),
        CommandKind::Pong | CommandKind::Error | CommandKind::Numeric(_) => None,
        CommandKind::Unknown => {
            debug!(command = %msg.command, "ignoring unhandled command");
            None
        }
    }
}

/// The sender and the first `n` arguments, or `None` if any is missing.
fn sender_and_args<'a, const N: usize>(msg: &'a Message) -> Option<(User, [&'a str; N])> {
    let user = msg.source()?;
    let mut args = [""; N];
    for (i, slot) in args.iter_mut().enumerate() {
        *slot = msg.arg(i)?;
    }
    Some((user, args))
}

fn malformed(msg: &Message) -> Option<Action> {
    debug!(command = %msg.command, args = msg.arg_count(), "dropping malformed message");
    None
}

fn on_ping(msg: &Message) -> Option<Action> {
    match msg.arg(0) {
        Some(token) => Some(Action::Send(Command::PONG(token.to_owned()))),
        None => malformed(msg),
    }
}

fn on_privmsg(msg: &Message) -> Option<Action> {
    let Some((user, [target, text])) = sender_and_args::<2>(msg) else {
        return malformed(msg);
    };

    let event = if is_channel_name(target) {
        Event::ChannelMessage {
            user,
            channel: target.to_owned(),
            text: text.to_owned(),
        }
    } else {
        Event::PrivateMessage {
            user,
            text: text.to_owned(),
        }
    };
    Some(Action::Notify(event))
}

fn on_notice(msg: &Message) -> Option<Action> {
    let Some((user, [target, text])) = sender_and_args::<2>(msg) else {
        return malformed(msg);
    };

    let from_server = msg.prefix.as_ref().is_some_and(|p| p.is_server());
    if from_server || target == "*" {
        debug!(%text, "server notice");
        return None;
    }

    let event = if is_channel_name(target) {
        Event::ChannelNotice {
            user,
            channel: target.to_owned(),
            text: text.to_owned(),
        }
    } else {
        Event::PrivateNotice {
            user,
            text: text.to_owned(),
        }
    };
    Some(Action::Notify(event))
}

fn on_join(state: &SessionState, msg: &Message) -> Option<Action> {
    let Some((user, [channel])) = sender_and_args::<1>(msg) else {
        return malformed(msg);
    };

    let channels = state.channels();
    if state.is_me(user.nickname()) {
        channels.ensure(channel);
    }
    channels.add_member(channel, user.nickname());

    Some(Action::Notify(Event::UserJoined {
        user,
        channel: channel.to_owned(),
    }))
}

fn on_part(state: &SessionState, msg: &Message) -> Option<Action> {
    let Some((user, [channel])) = sender_and_args::<1>(msg) else {
        return malformed(msg);
    };

    if state.is_me(user.nickname()) {
        state.channels().remove(channel);
    } else {
        state.channels().remove_member(channel, user.nickname());
    }

    Some(Action::Notify(Event::UserLeft {
        user,
        channel: channel.to_owned(),
        reason: msg.arg(1).map(str::to_owned),
    }))
}

fn on_kick(state: &SessionState, msg: &Message) -> Option<Action> {
    let Some((kicker, [channel, kicked])) = sender_and_args::<2>(msg) else {
        return malformed(msg);
    };

    if state.is_me(kicked) {
        state.channels().remove(channel);
    } else {
        state.channels().remove_member(channel, kicked);
    }

    Some(Action::Notify(Event::UserKicked {
        kicker,
        kicked: kicked.to_owned(),
        channel: channel.to_owned(),
        reason: msg.arg(2).map(str::to_owned),
    }))
}

fn on_quit(state: &SessionState, msg: &Message) -> Option<Action> {
    let Some((user, [])) = sender_and_args::<0>(msg) else {
        return malformed(msg);
    };

    state.channels().remove_member_everywhere(user.nickname());

    Some(Action::Notify(Event::UserQuit {
        user,
        reason: msg.arg(0).map(str::to_owned),
    }))
}

fn on_nick(state: &SessionState, msg: &Message) -> Option<Action> {
    let Some((user, [nickname])) = sender_and_args::<1>(msg) else {
        return malformed(msg);
    };

    state.channels().rename_member(user.nickname(), nickname);
    if state.is_me(user.nickname()) {
        state.set_nickname(nickname);
    }

    Some(Action::Notify(Event::NicknameChanged {
        user,
        nickname: nickname.to_owned(),
    }))
}

/// The first argument of `001` is the nickname the server registered us
/// under, which may differ from the one requested.
fn on_welcome(state: &SessionState, msg: &Message) -> Option<Action> {
    if let Some(nickname) = msg.arg(0) {
        state.set_nickname(nickname);
    }
    None
}

/// `353 <me> [=*@] <channel> :<names>`; the symbol is absent on some
/// older servers, so the channel is taken as the second-to-last argument.
fn on_names(state: &SessionState, msg: &Message) -> Option<Action> {
    let count = msg.arg_count();
    if count < 3 {
        return malformed(msg);
    }
    let (Some(channel), Some(names)) = (msg.arg(count - 2), msg.arg(count - 1)) else {
        return malformed(msg);
    };

    let channels = state.channels();
    for entry in names.split(' ').filter(|n| !n.is_empty()) {
        let nick = entry.trim_start_matches(MEMBERSHIP_PREFIXES);
        if nick.is_empty() {
            continue;
        }
        if !channels.add_member(channel, nick) {
            debug!(%channel, "NAMES reply for untracked channel");
            break;
        }
    }
    None
}

fn on_end_of_names(msg: &Message) -> Option<Action> {
    match msg.arg(1) {
        Some(channel) => Some(Action::Notify(Event::NamesComplete {
            channel: channel.to_owned(),
        })),
        None => malformed(msg),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn feed(state: &SessionState, line: &str) -> Option<Action> {
        dispatch(state, &Message::parse(line).unwrap())
    }

    fn members(state: &SessionState, channel: &str) -> HashSet<String> {
        state.channels().snapshot(channel).unwrap_or_default()
    }

    #[test]
    fn test_channel_message() {
        let state = SessionState::new("me");
        let action = feed(&state, ":nick!user@host PRIVMSG #chan :hello there");
        assert_eq!(
            action,
            Some(Action::Notify(Event::ChannelMessage {
                user: User::new("nick", "user", "host"),
                channel: "#chan".into(),
                text: "hello there".into(),
            }))
        );
    }

    #[test]
    fn test_private_message() {
        let state = SessionState::new("me");
        let action = feed(&state, ":nick!user@host PRIVMSG me :psst");
        assert!(matches!(
            action,
            Some(Action::Notify(Event::PrivateMessage { ref text, .. })) if text == "psst"
        ));
    }

    #[test]
    fn test_ping_replies_without_event() {
        let state = SessionState::new("me");
        assert_eq!(
            feed(&state, "PING abc123"),
            Some(Action::Send(Command::PONG("abc123".into())))
        );
        assert_eq!(
            feed(&state, "PING :irc.example.com"),
            Some(Action::Send(Command::PONG("irc.example.com".into())))
        );
        assert_eq!(feed(&state, "PING"), None);
    }

    #[test]
    fn test_notices() {
        let state = SessionState::new("me");
        assert!(matches!(
            feed(&state, ":bob!b@h NOTICE #x :heads up"),
            Some(Action::Notify(Event::ChannelNotice { .. }))
        ));
        assert!(matches!(
            feed(&state, ":bob!b@h NOTICE me :psst"),
            Some(Action::Notify(Event::PrivateNotice { .. }))
        ));
        assert_eq!(
            feed(&state, ":irc.example.com NOTICE * :*** Looking up your hostname"),
            None
        );
        assert_eq!(feed(&state, ":irc.example.com NOTICE me :motd soon"), None);
    }

    #[test]
    fn test_join_then_part() {
        let state = SessionState::new("me");
        feed(&state, ":me!m@h JOIN #x");
        let action = feed(&state, ":bob!b@h JOIN #x");
        assert!(matches!(
            action,
            Some(Action::Notify(Event::UserJoined { ref channel, .. })) if channel == "#x"
        ));
        assert!(members(&state, "#x").contains("bob"));

        let action = feed(&state, ":bob!b@h PART #x :later");
        assert_eq!(
            action,
            Some(Action::Notify(Event::UserLeft {
                user: User::new("bob", "b", "h"),
                channel: "#x".into(),
                reason: Some("later".into()),
            }))
        );
        assert!(!members(&state, "#x").contains("bob"));
        assert!(members(&state, "#x").contains("me"));
    }

    #[test]
    fn test_foreign_join_does_not_track_channel() {
        let state = SessionState::new("me");
        let action = feed(&state, ":bob!b@h JOIN #notmine");
        assert!(matches!(action, Some(Action::Notify(Event::UserJoined { .. }))));
        assert!(!state.channels().contains("#notmine"));
        assert!(state.channels().is_empty());
    }

    #[test]
    fn test_join_with_trailing_channel() {
        let state = SessionState::new("me");
        feed(&state, ":me!m@h JOIN :#x");
        assert!(state.channels().contains("#x"));
    }

    #[test]
    fn test_own_part_forgets_channel() {
        let state = SessionState::new("me");
        feed(&state, ":me!m@h JOIN #x");
        feed(&state, ":bob!b@h JOIN #x");
        feed(&state, ":ME!m@h PART #x");
        assert!(!state.channels().contains("#x"));
    }

    #[test]
    fn test_kick() {
        let state = SessionState::new("me");
        feed(&state, ":me!m@h JOIN #x");
        feed(&state, ":bob!b@h JOIN #x");
        let action = feed(&state, ":op!o@h KICK #x bob :behave");
        assert_eq!(
            action,
            Some(Action::Notify(Event::UserKicked {
                kicker: User::new("op", "o", "h"),
                kicked: "bob".into(),
                channel: "#x".into(),
                reason: Some("behave".into()),
            }))
        );
        assert!(!members(&state, "#x").contains("bob"));

        feed(&state, ":op!o@h KICK #x me");
        assert!(!state.channels().contains("#x"));
    }

    #[test]
    fn test_quit_removes_everywhere() {
        let state = SessionState::new("me");
        for chan in ["#x", "#y"] {
            feed(&state, &format!(":me!m@h JOIN {}", chan));
            feed(&state, &format!(":bob!b@h JOIN {}", chan));
        }
        let action = feed(&state, ":bob!b@h QUIT :Ping timeout");
        assert!(matches!(
            action,
            Some(Action::Notify(Event::UserQuit { ref reason, .. }))
                if reason.as_deref() == Some("Ping timeout")
        ));
        assert!(!members(&state, "#x").contains("bob"));
        assert!(!members(&state, "#y").contains("bob"));
    }

    #[test]
    fn test_nick_change_rekeys_membership() {
        let state = SessionState::new("me");
        for chan in ["#x", "#y"] {
            feed(&state, &format!(":me!m@h JOIN {}", chan));
            feed(&state, &format!(":bob!b@h JOIN {}", chan));
        }
        feed(&state, ":bob!b@h NICK robert");
        for chan in ["#x", "#y"] {
            let set = members(&state, chan);
            assert!(set.contains("robert"));
            assert!(!set.contains("bob"));
        }
        assert_eq!(state.nickname(), "me");
    }

    #[test]
    fn test_own_nick_change_updates_nickname() {
        let state = SessionState::new("me");
        feed(&state, ":me!m@h JOIN #x");
        let action = feed(&state, ":me!m@h NICK :me_");
        assert!(matches!(
            action,
            Some(Action::Notify(Event::NicknameChanged { ref nickname, .. })) if nickname == "me_"
        ));
        assert_eq!(state.nickname(), "me_");
        assert!(members(&state, "#x").contains("me_"));
    }

    #[test]
    fn test_names_reply() {
        let state = SessionState::new("me");
        feed(&state, ":me!m@h JOIN #x");
        assert_eq!(
            feed(&state, ":irc.example.com 353 me = #x :@op +voice ~owner plain"),
            None
        );
        let set = members(&state, "#x");
        for nick in ["me", "op", "voice", "owner", "plain"] {
            assert!(set.contains(nick), "missing {}", nick);
        }

        assert_eq!(
            feed(&state, ":irc.example.com 366 me #x :End of /NAMES list."),
            Some(Action::Notify(Event::NamesComplete {
                channel: "#x".into()
            }))
        );
    }

    #[test]
    fn test_names_without_symbol() {
        let state = SessionState::new("me");
        feed(&state, ":me!m@h JOIN #x");
        feed(&state, ":irc.example.com 353 me #x :bob");
        assert!(members(&state, "#x").contains("bob"));
    }

    #[test]
    fn test_names_for_untracked_channel_is_ignored() {
        let state = SessionState::new("me");
        feed(&state, ":irc.example.com 353 me = #other :bob");
        assert!(state.channels().snapshot("#other").is_none());
    }

    #[test]
    fn test_missing_arguments_are_dropped() {
        let state = SessionState::new("me");
        assert_eq!(feed(&state, ":bob!b@h PRIVMSG #x"), None);
        assert_eq!(feed(&state, ":bob!b@h JOIN"), None);
        assert_eq!(feed(&state, ":op!o@h KICK #x"), None);
        assert_eq!(feed(&state, "JOIN #x"), None);
        assert!(state.channels().is_empty());
    }

    #[test]
    fn test_unknown_commands_are_ignored() {
        let state = SessionState::new("me");
        assert_eq!(feed(&state, ":irc.example.com CAP * LS :sasl"), None);
        assert_eq!(feed(&state, ":bob!b@h PONG me"), None);
    }

    #[test]
    fn test_welcome_confirms_nickname() {
        let state = SessionState::new("averyverylongnick");
        assert_eq!(
            feed(&state, ":irc.example.com 001 averyvery :Welcome to IRC"),
            None
        );
        assert_eq!(state.nickname(), "averyvery");
    }

    #[test]
    fn test_is_channel_name() {
        assert!(is_channel_name("#rust"));
        assert!(is_channel_name("&local"));
        assert!(!is_channel_name("bob"));
        assert!(!is_channel_name(""));
    }
}
