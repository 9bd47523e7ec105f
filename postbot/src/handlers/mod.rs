//! Update handlers: commands, media staging, forwarded-channel registration,
//! and callback dispatch.

mod callback;
mod commands;
mod media;

pub use callback::handle_callback;
pub use commands::{handle_command, Command};
pub use media::{handle_forwarded, handle_media};
