//! Application state management (Elm architecture)

use hio_input::Mode;
use hio_meter::StereoFrame;

use crate::theme::{Theme, ThemeKind};

/// Message severity for the status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageType {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// Everything the UI renders
#[derive(Debug, Clone)]
pub struct AppState {
    // Meter
    pub frame: StereoFrame,
    pub frozen: bool,
    /// Zone volume (0.0-1.0)
    pub volume: f32,

    // Theme
    pub theme_kind: ThemeKind,
    pub theme: Theme,

    // UI state
    pub mode: Mode,
    pub command_buffer: String,
    pub message: Option<String>,
    pub message_type: MessageType,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            frame: StereoFrame::default(),
            frozen: false,
            volume: 0.5,
            theme_kind: ThemeKind::default(),
            theme: ThemeKind::default().theme(),
            mode: Mode::Normal,
            command_buffer: String::new(),
            message: None,
            message_type: MessageType::Info,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest rendered meter frame
    pub fn update_frame(&mut self, frame: StereoFrame) {
        self.frame = frame;
    }

    /// Help overlay follows the input mode
    pub fn help_visible(&self) -> bool {
        self.mode == Mode::Help
    }

    /// Set current mode
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        if mode != Mode::Command {
            self.command_buffer.clear();
        }
    }

    /// Apply a theme without touching the message line
    pub fn apply_theme(&mut self, kind: ThemeKind) {
        self.theme_kind = kind;
        self.theme = kind.theme();
    }

    /// Set theme by name
    pub fn set_theme(&mut self, name: &str) {
        match name.parse::<ThemeKind>() {
            Ok(kind) => {
                self.apply_theme(kind);
                self.set_success(format!("Theme set to: {}", self.theme.name));
            }
            Err(err) => self.set_error(err.to_string()),
        }
    }

    /// Advance to the next theme
    pub fn cycle_theme(&mut self) {
        self.apply_theme(self.theme_kind.cycle());
        self.set_success(format!("Theme set to: {}", self.theme.name));
    }

    /// Set zone volume, clamped to 0.0-1.0. Returns the stored value.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        self.volume = if volume.is_nan() {
            self.volume
        } else {
            volume.clamp(0.0, 1.0)
        };
        self.set_message(format!("Volume {:.0}%", self.volume * 100.0));
        self.volume
    }

    /// Nudge zone volume. Returns the stored value.
    pub fn adjust_volume(&mut self, delta: f32) -> f32 {
        self.set_volume(self.volume + delta)
    }

    /// Flip the needle hold. Returns the new state.
    pub fn toggle_freeze(&mut self) -> bool {
        self.frozen = !self.frozen;
        if self.frozen {
            self.set_warning("Meter held");
        } else {
            self.set_message("Meter running");
        }
        self.frozen
    }

    /// Clear any displayed message
    pub fn clear_message(&mut self) {
        self.message = None;
        self.message_type = MessageType::Info;
    }

    /// Set a message to display (info level)
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.message_type = MessageType::Info;
    }

    /// Set a success message (green)
    pub fn set_success(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.message_type = MessageType::Success;
    }

    /// Set a warning message (yellow)
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.message_type = MessageType::Warning;
    }

    /// Set an error message (red)
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.message_type = MessageType::Error;
    }
}

/// Main application wrapper
pub struct App {
    pub state: AppState,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
