//! Status bar widget - mode indicator, command line, zone readout

use crate::app::MessageType;
use crate::theme::Theme;
use hio_input::Mode;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Widget for displaying the status bar with mode and command input
pub struct StatusBarWidget<'a> {
    mode: Mode,
    command_buffer: &'a str,
    message: Option<&'a str>,
    message_type: MessageType,
    theme: &'a Theme,
    volume: f32,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(mode: Mode, command_buffer: &'a str, theme: &'a Theme) -> Self {
        Self {
            mode,
            command_buffer,
            message: None,
            message_type: MessageType::Info,
            theme,
            volume: 0.0,
        }
    }

    pub fn message(mut self, msg: Option<&'a str>, msg_type: MessageType) -> Self {
        self.message = msg;
        self.message_type = msg_type;
        self
    }

    pub fn volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    fn mode_style(&self) -> Style {
        match self.mode {
            Mode::Normal | Mode::Help => self.theme.highlight(),
            Mode::Command => Style::from(self.theme.accent),
        }
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let chunks = Layout::horizontal([
            Constraint::Length(10), // Mode indicator
            Constraint::Min(20),    // Command/message area
            Constraint::Length(24), // Theme + volume
        ])
        .split(area);

        let mode_line = Line::from(vec![
            Span::raw("["),
            Span::styled(self.mode.display_name(), self.mode_style()),
            Span::raw("]"),
        ]);
        Paragraph::new(mode_line).render(chunks[0], buf);

        let content = if self.mode == Mode::Command {
            Line::from(vec![
                Span::styled(":", Style::from(self.theme.accent)),
                Span::styled(self.command_buffer, self.theme.normal()),
                Span::styled("█", self.theme.highlight()), // Cursor
            ])
        } else if let Some(msg) = self.message {
            let msg_style = match self.message_type {
                MessageType::Info => self.theme.dim(),
                MessageType::Success => Style::from(self.theme.accent),
                MessageType::Warning => Style::default().fg(self.theme.warning),
                MessageType::Error => Style::default().fg(self.theme.danger),
            };
            Line::from(Span::styled(msg, msg_style))
        } else {
            Line::from(Span::styled(
                "Ready. Press ? for help, : for commands",
                self.theme.dim(),
            ))
        };
        Paragraph::new(content).render(chunks[1], buf);

        let readout = Line::from(vec![
            Span::styled(self.theme.name, self.theme.dim()),
            Span::raw("  "),
            Span::styled("vol ", self.theme.dim()),
            Span::styled(
                format!("{:>3.0}%", self.volume * 100.0),
                self.theme.normal(),
            ),
        ]);
        Paragraph::new(readout).render(chunks[2], buf);
    }
}

/// Help overlay widget
pub struct HelpWidget<'a> {
    theme: &'a Theme,
}

impl<'a> HelpWidget<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    fn help_lines() -> Vec<&'static str> {
        vec![
            "╔══════════════════════════════════════════════╗",
            "║           HOME-IO ANALOG METER               ║",
            "╠══════════════════════════════════════════════╣",
            "║ ZONE                                         ║",
            "║   + / = / ↑     Volume up 5%                 ║",
            "║   - / _ / ↓     Volume down 5%               ║",
            "║   0 / m         Mute / full volume           ║",
            "╠──────────────────────────────────────────────╣",
            "║ METER                                        ║",
            "║   f / Space     Freeze needles (hold)        ║",
            "║   r             Reset needles and peaks      ║",
            "║   t             Cycle theme                  ║",
            "╠──────────────────────────────────────────────╣",
            "║ COMMANDS (:)                                 ║",
            "║   :theme <name>   green / amber / cyber      ║",
            "║   :volume <0-100> Set zone volume            ║",
            "║   :reset          Reset meter                ║",
            "║   :freeze         Toggle hold                ║",
            "║   :q              Quit                       ║",
            "╠══════════════════════════════════════════════╣",
            "║          Press Esc or ? to close help        ║",
            "║               q / Ctrl-Q to quit             ║",
            "╚══════════════════════════════════════════════╝",
        ]
    }
}

impl Widget for HelpWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Clear background
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                buf[(x, y)].set_char(' ').set_style(self.theme.normal());
            }
        }

        let help_text = Self::help_lines();
        let start_x = area.x + area.width.saturating_sub(48) / 2;

        for (i, line) in help_text.iter().take(area.height as usize).enumerate() {
            let y = area.y + i as u16;
            for (j, ch) in line.chars().enumerate() {
                let x = start_x + j as u16;
                if x >= area.x + area.width {
                    break;
                }

                let style = if matches!(ch, '║' | '╔' | '╗' | '╚' | '╝' | '═' | '╠' | '╣' | '─') {
                    self.theme.border()
                } else {
                    self.theme.normal()
                };

                buf[(x, y)].set_char(ch).set_style(style);
            }
        }
    }
}
