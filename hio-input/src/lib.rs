//! Vim-style modal keyboard input handling for the Home-IO meter tile

mod commands;
mod modal;

pub use commands::{Command, VOLUME_STEP};
pub use modal::{InputHandler, Mode};
