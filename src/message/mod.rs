mod parse;
mod serialize;
mod types;

pub use self::parse::MAX_MIDDLE_PARAMS;
pub use self::types::Message;
