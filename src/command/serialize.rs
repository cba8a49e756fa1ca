use std::fmt::{self, Write};

use super::types::Command;

/// Write a command with arguments.
/// The last argument gets a `:` prefix only when it needs one.
fn write_cmd(f: &mut fmt::Formatter<'_>, cmd: &str, args: &[&str]) -> fmt::Result {
    let Some((trailing, middle)) = args.split_last() else {
        return f.write_str(cmd);
    };

    f.write_str(cmd)?;
    for param in middle {
        f.write_char(' ')?;
        f.write_str(param)?;
    }
    f.write_char(' ')?;

    if trailing.is_empty() || trailing.contains(' ') || trailing.starts_with(':') {
        f.write_char(':')?;
    }
    f.write_str(trailing)
}

/// Write a command whose last argument is always colon-prefixed.
fn write_cmd_freeform(f: &mut fmt::Formatter<'_>, cmd: &str, args: &[&str]) -> fmt::Result {
    match args.split_last() {
        Some((suffix, middle)) => {
            f.write_str(cmd)?;
            for arg in middle {
                f.write_char(' ')?;
                f.write_str(arg)?;
            }
            f.write_str(" :")?;
            f.write_str(suffix)
        }
        None => f.write_str(cmd),
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::NICK(nick) => write_cmd(f, "NICK", &[nick.as_str()]),
            Command::USER(user, mode, realname) => {
                write_cmd_freeform(
                    f,
                    "USER",
                    &[user.as_str(), mode.as_str(), "*", realname.as_str()],
                )
            }
            Command::JOIN(chan) => write_cmd(f, "JOIN", &[chan.as_str()]),
            Command::PART(chan, Some(reason)) => {
                write_cmd_freeform(f, "PART", &[chan.as_str(), reason.as_str()])
            }
            Command::PART(chan, None) => write_cmd(f, "PART", &[chan.as_str()]),
            Command::PRIVMSG(target, text) => {
                write_cmd_freeform(f, "PRIVMSG", &[target.as_str(), text.as_str()])
            }
            Command::NOTICE(target, text) => {
                write_cmd_freeform(f, "NOTICE", &[target.as_str(), text.as_str()])
            }
            Command::KICK(chan, user, Some(reason)) => {
                write_cmd_freeform(f, "KICK", &[chan.as_str(), user.as_str(), reason.as_str()])
            }
            Command::KICK(chan, user, None) => {
                write_cmd(f, "KICK", &[chan.as_str(), user.as_str()])
            }
            Command::QUIT(Some(reason)) => write_cmd_freeform(f, "QUIT", &[reason.as_str()]),
            Command::QUIT(None) => f.write_str("QUIT"),
            Command::PING(token) => write_cmd(f, "PING", &[token.as_str()]),
            Command::PONG(token) => write_cmd(f, "PONG", &[token.as_str()]),
            Command::Raw(line) => f.write_str(line),
        }
    }
}
