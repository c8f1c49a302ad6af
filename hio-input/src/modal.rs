//! Modal state machine for vim-style input handling

use crossterm::event::{KeyCode, KeyEvent};

use crate::commands::{Command, VOLUME_STEP};

/// Input modes (vim-style)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Command,
    Help,
}

impl Mode {
    /// Get display name for the mode
    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Command => "COMMAND",
            Mode::Help => "HELP",
        }
    }
}

/// Handles keyboard input and converts to commands
pub struct InputHandler {
    mode: Mode,
    command_buffer: String,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            command_buffer: String::new(),
        }
    }

    /// Get current mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Get current command buffer (for display)
    pub fn command_buffer(&self) -> &str {
        &self.command_buffer
    }

    /// Handle a key event and return a command if applicable
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        match self.mode {
            Mode::Normal => self.handle_normal_mode(key),
            Mode::Command => self.handle_command_mode(key),
            Mode::Help => self.handle_help_mode(key),
        }
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            // Mode switching
            KeyCode::Char(':') => {
                self.mode = Mode::Command;
                self.command_buffer.clear();
                Some(Command::EnterCommandMode)
            }
            KeyCode::Char('?') => {
                self.mode = Mode::Help;
                Some(Command::ToggleHelp)
            }

            // Quit (plain or Ctrl-q)
            KeyCode::Char('q') => Some(Command::Quit),

            // Volume
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => {
                Some(Command::AdjustVolume(VOLUME_STEP))
            }
            KeyCode::Char('-') | KeyCode::Char('_') | KeyCode::Down => {
                Some(Command::AdjustVolume(-VOLUME_STEP))
            }
            KeyCode::Char('0') => Some(Command::SetVolume(0.0)),
            KeyCode::Char('m') => Some(Command::SetVolume(1.0)),

            // Meter
            KeyCode::Char('f') | KeyCode::Char(' ') => Some(Command::ToggleFreeze),
            KeyCode::Char('r') => Some(Command::ResetMeter),

            // Theme
            KeyCode::Char('t') => Some(Command::CycleTheme),

            KeyCode::Esc => Some(Command::Cancel),

            _ => None,
        }
    }

    fn handle_command_mode(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Enter => {
                let cmd = self.parse_command();
                // `:help` opens the same overlay as `?`
                self.mode = if cmd == Some(Command::ToggleHelp) {
                    Mode::Help
                } else {
                    Mode::Normal
                };
                let buffer = std::mem::take(&mut self.command_buffer);
                cmd.or(Some(Command::ExecuteCommand(buffer)))
            }
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.command_buffer.clear();
                Some(Command::EnterNormalMode)
            }
            KeyCode::Backspace => {
                self.command_buffer.pop();
                if self.command_buffer.is_empty() {
                    self.mode = Mode::Normal;
                    Some(Command::EnterNormalMode)
                } else {
                    None
                }
            }
            KeyCode::Char(c) => {
                self.command_buffer.push(c);
                None
            }
            _ => None,
        }
    }

    fn parse_command(&self) -> Option<Command> {
        let input = self.command_buffer.trim();

        // Handle simple commands first
        match input {
            "q" | "quit" => return Some(Command::Quit),
            "help" => return Some(Command::ToggleHelp),
            "reset" => return Some(Command::ResetMeter),
            "freeze" | "hold" => return Some(Command::ToggleFreeze),
            "theme" => return Some(Command::CycleTheme),
            _ => {}
        }

        if let Some(name) = input.strip_prefix("theme ") {
            let name = name.trim();
            if !name.is_empty() {
                return Some(Command::SetTheme(name.to_string()));
            }
        }

        // Volume as a percentage: "volume 40" or "vol 40%"
        let volume = input
            .strip_prefix("volume ")
            .or_else(|| input.strip_prefix("vol "));
        if let Some(value) = volume {
            let value = value.trim().trim_end_matches('%');
            if let Ok(percent) = value.parse::<f32>() {
                if percent.is_finite() {
                    return Some(Command::SetVolume((percent / 100.0).clamp(0.0, 1.0)));
                }
            }
        }

        None
    }

    fn handle_help_mode(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
                self.mode = Mode::Normal;
                Some(Command::ToggleHelp)
            }
            _ => None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
