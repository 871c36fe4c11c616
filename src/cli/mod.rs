//! CLI module - argument parsing and interactive prompts

mod args;
mod prompts;

pub use args::{ensure_choice_not_attribute, Cli, DEFAULT_CHOICE_COLUMN};
pub use prompts::*;
