//! Line protocol spoken on stdin and stdout

pub mod command;
pub mod protocol;

pub use command::parse_command;
pub use protocol::{handle_command, Response};
