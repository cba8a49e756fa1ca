mod kind;
mod serialize;
mod types;

pub use kind::{CommandKind, RPL_ENDOFNAMES, RPL_NAMREPLY, RPL_WELCOME};
pub use types::Command;
