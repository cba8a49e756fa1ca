use std::fmt;

use super::types::{Prefix, User};

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.nickname())?;
        if !self.username().is_empty() {
            write!(f, "!{}", self.username())?;
        }
        if !self.hostname().is_empty() {
            write!(f, "@{}", self.hostname())?;
        }
        Ok(())
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::ServerName(name) => f.write_str(name),
            Prefix::User(user) => fmt::Display::fmt(user, f),
        }
    }
}
