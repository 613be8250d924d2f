//! Terminal front end using cliclack (Charm-style inline prompts)
//!
//! This module is optional and only available when the `tui` feature is enabled.

mod console;
mod prompts;

pub use console::ConsoleObserver;
pub use prompts::{print_error, run, CreateArgs};
