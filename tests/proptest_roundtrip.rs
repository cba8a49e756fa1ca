//! Property-based tests for line parsing and hostmasks.
//!
//! Uses proptest to generate random IRC components and verify that:
//! 1. Hostmasks survive parse and re-serialization
//! 2. The parser never panics, whatever the input
//! 3. Outbound commands parse back into the same target and text
//!
//! Run with: `cargo test --test proptest_roundtrip`

use proptest::prelude::*;
use slirc_client::message::MAX_MIDDLE_PARAMS;
use slirc_client::{irc_eq, irc_to_lower, Command, Message, User};

// =============================================================================
// STRATEGIES - Generators for valid IRC components
// =============================================================================

/// Nickname: letter or special char, then letters, digits or specials.
fn nickname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z\\[\\]\\\\^_`{|}][a-zA-Z0-9\\-\\[\\]\\\\^_`{|}]{0,15}")
        .expect("valid regex")
}

/// Username (ident), optionally with the `~` of an unverified ident.
fn username_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("~?[a-zA-Z][a-zA-Z0-9]{0,9}").expect("valid regex")
}

fn hostname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]+(\\.[a-z0-9]+)*").expect("valid regex")
}

fn channel_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[#&][a-zA-Z0-9_\\-]{1,49}").expect("valid regex")
}

/// Message text without CR, LF or NUL.
fn message_text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[^\r\n\0]{0,400}").expect("valid regex")
}

/// A middle parameter: non-empty, no spaces, not starting with `:`.
fn middle_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9#&*=_\\-][a-zA-Z0-9#&*=_\\-:]{0,10}")
        .expect("valid regex")
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// A full `nick!user@host` mask re-serializes to itself.
    #[test]
    fn hostmask_roundtrip(
        nick in nickname_strategy(),
        user in username_strategy(),
        host in hostname_strategy(),
    ) {
        let mask = format!("{}!{}@{}", nick, user, host);
        let parsed = User::parse(&mask);
        prop_assert_eq!(parsed.nickname(), nick.as_str());
        prop_assert_eq!(parsed.username(), user.as_str());
        prop_assert_eq!(parsed.hostname(), host.as_str());
        prop_assert_eq!(parsed.to_string(), mask);
    }

    /// Any string is accepted as a hostmask.
    #[test]
    fn hostmask_never_fails(s in any::<String>()) {
        let user = User::parse(&s);
        prop_assert!(s.starts_with(user.nickname()));
    }

    /// The parser returns an error rather than panicking.
    #[test]
    fn parse_never_panics(s in any::<String>()) {
        if let Ok(msg) = Message::parse(&s) {
            prop_assert!(!msg.command.is_empty());
            prop_assert!(msg.params.len() <= MAX_MIDDLE_PARAMS);
        }
    }

    /// Every space-separated word after the command is an argument, and
    /// past the middle-parameter limit the rest becomes the trailing one.
    #[test]
    fn middle_params_are_bounded(words in prop::collection::vec(middle_strategy(), 0..24)) {
        let line = format!("CMD {}", words.join(" "));
        let msg = Message::parse(&line).expect("valid line");

        if words.len() <= MAX_MIDDLE_PARAMS {
            prop_assert_eq!(&msg.params, &words);
            prop_assert_eq!(msg.trailing, None);
        } else {
            prop_assert_eq!(&msg.params[..], &words[..MAX_MIDDLE_PARAMS]);
            let rest = words[MAX_MIDDLE_PARAMS..].join(" ");
            prop_assert_eq!(msg.trailing.as_deref(), Some(rest.as_str()));
        }
    }

    /// An outbound PRIVMSG parses back to the same target and text.
    #[test]
    fn privmsg_roundtrip(
        prefix in prop::option::of((nickname_strategy(), hostname_strategy())),
        target in channel_strategy(),
        text in message_text_strategy(),
    ) {
        let command = Command::PRIVMSG(target.clone(), text.clone()).to_string();
        let line = match &prefix {
            Some((nick, host)) => format!(":{}!u@{} {}", nick, host, command),
            None => command,
        };

        let msg = Message::parse(&line).expect("valid line");
        prop_assert_eq!(msg.command.as_str(), "PRIVMSG");
        prop_assert_eq!(msg.arg(0), Some(target.as_str()));
        prop_assert_eq!(msg.arg(1), Some(text.as_str()));
        prop_assert_eq!(msg.arg_count(), 2);
        if let Some((nick, _)) = &prefix {
            let source = msg.source().map(|user| user.nickname().to_owned());
            prop_assert_eq!(source.as_deref(), Some(nick.as_str()));
        }
    }

    /// Folding is idempotent and folded forms compare equal.
    #[test]
    fn casemap_folding(s in nickname_strategy()) {
        let folded = irc_to_lower(&s);
        prop_assert_eq!(irc_to_lower(&folded), folded.clone());
        prop_assert!(irc_eq(&s, &folded));
        prop_assert!(irc_eq(&s.to_uppercase(), &s));
    }
}
