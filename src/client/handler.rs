//! Notification interface.

use crate::error::ClientError;
use crate::event::Event;
use crate::line::DecodedLine;
use crate::prefix::User;
use crate::state::CloseReason;

use super::Client;

/// Receiver for client notifications.
///
/// Every method has an empty default body; implement only the ones you
/// need. Methods are called from the client's I/O tasks and must not
/// block. To issue commands from a callback, spawn a task with a clone of
/// the client.
#[allow(unused_variables)]
pub trait Handler: Send + Sync {
    /// The transport has been acquired; registration has not been sent.
    fn socket_created(&self, client: &Client) {}

    /// A line arrived, before parsing. Malformed lines are only visible here.
    fn line_received(&self, client: &Client, line: &DecodedLine) {}

    /// A line was written, without its terminator.
    fn line_sent(&self, client: &Client, line: &str) {}

    /// NICK and USER have been sent.
    fn connection_established(&self, client: &Client) {}

    /// `connect` failed before the session was established.
    fn connect_failed(&self, client: &Client, error: &ClientError) {}

    fn user_joined(&self, client: &Client, user: &User, channel: &str) {}

    fn user_left(&self, client: &Client, user: &User, channel: &str, reason: Option<&str>) {}

    /// `user` still carries the old nickname.
    fn nickname_changed(&self, client: &Client, user: &User, nickname: &str) {}

    fn user_kicked(
        &self,
        client: &Client,
        kicker: &User,
        kicked: &str,
        channel: &str,
        reason: Option<&str>,
    ) {
    }

    fn user_quit(&self, client: &Client, user: &User, reason: Option<&str>) {}

    fn channel_message(&self, client: &Client, user: &User, channel: &str, text: &str) {}

    fn private_message(&self, client: &Client, user: &User, text: &str) {}

    fn channel_notice(&self, client: &Client, user: &User, channel: &str, text: &str) {}

    fn private_notice(&self, client: &Client, user: &User, text: &str) {}

    fn names_complete(&self, client: &Client, channel: &str) {}

    /// The session ended. Called once per successful `connect`.
    fn connection_closed(&self, client: &Client, reason: &CloseReason) {}
}

/// Route `event` to the matching handler method.
pub(crate) fn deliver(handler: &dyn Handler, client: &Client, event: &Event) {
    match event {
        Event::UserJoined { user, channel } => handler.user_joined(client, user, channel),
        Event::UserLeft {
            user,
            channel,
            reason,
        } => handler.user_left(client, user, channel, reason.as_deref()),
        Event::NicknameChanged { user, nickname } => {
            handler.nickname_changed(client, user, nickname)
        }
        Event::UserKicked {
            kicker,
            kicked,
            channel,
            reason,
        } => handler.user_kicked(client, kicker, kicked, channel, reason.as_deref()),
        Event::UserQuit { user, reason } => handler.user_quit(client, user, reason.as_deref()),
        Event::ChannelMessage {
            user,
            channel,
            text,
        } => handler.channel_message(client, user, channel, text),
        Event::PrivateMessage { user, text } => handler.private_message(client, user, text),
        Event::ChannelNotice {
            user,
            channel,
            text,
        } => handler.channel_notice(client, user, channel, text),
        Event::PrivateNotice { user, text } => handler.private_notice(client, user, text),
        Event::NamesComplete { channel } => handler.names_complete(client, channel),
    }
}

