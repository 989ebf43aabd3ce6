//! Chat command surface of the bot.

mod dispatch;
mod help;
mod parse;

pub use dispatch::{Dispatcher, user_message};
pub use parse::{Command, HelpTopic};
