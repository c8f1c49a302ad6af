//! Analog VU meter widget - dial arc, needle and peak-hold tick
//!
//! The needle pivots at the bottom centre of the dial. Terminal cells are
//! about twice as tall as they are wide, so horizontal offsets are doubled
//! to keep the arc round.

use hio_meter::scale::{MIN_ANGLE_DEG, SWEEP_DEG};
use hio_meter::{Channel, MeterFrame, MAX_DB, MIN_DB};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::Span,
    widgets::{Block, Borders, Widget},
};

use crate::theme::Theme;

/// Width/height ratio of a terminal cell, inverted
const CELL_ASPECT: f32 = 2.0;

/// dB values that get a tick on the arc
const TICK_MARKS: [f32; 8] = [-60.0, -40.0, -20.0, -10.0, -5.0, 0.0, 3.0, 6.0];
/// dB values that get a numeric label under the arc
const LABEL_MARKS: [i32; 5] = [-60, -40, -20, -10, 0];

/// Widget for one channel of an analog meter
pub struct AnalogMeterWidget<'a> {
    theme: &'a Theme,
    channel: Channel,
    frame: MeterFrame,
    frozen: bool,
}

impl<'a> AnalogMeterWidget<'a> {
    pub fn new(theme: &'a Theme, channel: Channel) -> Self {
        Self {
            theme,
            channel,
            frame: MeterFrame::default(),
            frozen: false,
        }
    }

    pub fn frame(mut self, frame: MeterFrame) -> Self {
        self.frame = frame;
        self
    }

    pub fn frozen(mut self, frozen: bool) -> Self {
        self.frozen = frozen;
        self
    }
}

/// Line character that best follows a needle at `angle_deg` from vertical
pub fn needle_char(angle_deg: f32) -> char {
    if angle_deg < -60.0 || angle_deg > 60.0 {
        '─'
    } else if angle_deg < -12.0 {
        '\\'
    } else if angle_deg > 12.0 {
        '/'
    } else {
        '│'
    }
}

/// Dial angle (degrees) back to the dB it reads
fn angle_to_db(angle_deg: f32) -> f32 {
    let unit = (angle_deg - MIN_ANGLE_DEG) / SWEEP_DEG;
    MIN_DB + unit * (MAX_DB - MIN_DB)
}

/// Dial geometry inside a widget area
struct Dial {
    pivot_x: f32,
    pivot_y: f32,
    radius: f32,
}

impl Dial {
    fn fit(area: Rect) -> Self {
        let pivot_x = area.x as f32 + area.width as f32 / 2.0;
        let pivot_y = (area.y + area.height - 1) as f32;
        // sin(45) of the horizontal radius must fit in half the width
        let max_by_width = (area.width as f32 / 2.0 - 1.0) / (CELL_ASPECT * 0.7072);
        let max_by_height = (area.height - 1) as f32;
        Self {
            pivot_x,
            pivot_y,
            radius: max_by_height.min(max_by_width).max(1.0),
        }
    }

    /// Cell position at `radius_frac` of the radius along `angle_deg`
    fn point(&self, angle_deg: f32, radius_frac: f32) -> (f32, f32) {
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        let r = self.radius * radius_frac;
        (self.pivot_x + sin * r * CELL_ASPECT, self.pivot_y - cos * r)
    }
}

fn plot(buf: &mut Buffer, area: Rect, (x, y): (f32, f32), ch: char, style: Style) {
    let (x, y) = (x.round(), y.round());
    if x < area.x as f32 || y < area.y as f32 {
        return;
    }
    let (x, y) = (x as u16, y as u16);
    if x >= area.x + area.width || y >= area.y + area.height {
        return;
    }
    buf[(x, y)].set_char(ch).set_style(style);
}

fn put_str(buf: &mut Buffer, area: Rect, x: u16, y: u16, text: &str, style: Style) {
    for (i, ch) in text.chars().enumerate() {
        let cx = x + i as u16;
        if cx >= area.x + area.width || y >= area.y + area.height {
            break;
        }
        buf[(cx, y)].set_char(ch).set_style(style);
    }
}

impl Widget for AnalogMeterWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.frozen {
            format!(" VU {} [HOLD] ", self.channel.label())
        } else {
            format!(" VU {} ", self.channel.label())
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border())
            .title(Span::styled(title, self.theme.title()));

        let inner = block.inner(area);
        block.render(area, buf);

        // Minimum size check
        if inner.width < 12 || inner.height < 5 {
            return;
        }

        // Bottom row is the numeric readout
        let dial_area = Rect {
            height: inner.height - 1,
            ..inner
        };
        let dial = Dial::fit(dial_area);

        // Arc, coloured by zone
        let steps = ((dial.radius * CELL_ASPECT * 1.6) as usize).max(8);
        for i in 0..=steps {
            let angle = MIN_ANGLE_DEG + SWEEP_DEG * i as f32 / steps as f32;
            let style = self.theme.zone_style(angle_to_db(angle));
            plot(buf, dial_area, dial.point(angle, 1.0), '·', style);
        }
        for db in TICK_MARKS {
            let angle = hio_meter::db_to_angle(db);
            plot(buf, dial_area, dial.point(angle, 1.0), '•', self.theme.zone_style(db));
        }

        // Scale labels just inside the arc
        if dial.radius >= 4.0 {
            for db in LABEL_MARKS {
                let text = db.to_string();
                let (x, y) = dial.point(hio_meter::db_to_angle(db as f32), 0.75);
                let x = (x - text.len() as f32 / 2.0).round().max(dial_area.x as f32) as u16;
                put_str(buf, dial_area, x, y.round() as u16, &text, self.theme.dim());
            }
        }

        // Needle from pivot toward the arc
        let angle = self.frame.needle_angle_deg;
        let ch = needle_char(angle);
        let (hub, tip) = (0.1, 0.9);
        let needle_steps = ((dial.radius * CELL_ASPECT * 2.0) as usize).max(4);
        for i in 0..=needle_steps {
            let frac = hub + (tip - hub) * i as f32 / needle_steps as f32;
            plot(buf, dial_area, dial.point(angle, frac), ch, self.theme.needle_style());
        }

        // Peak hold tick rides on the arc
        plot(
            buf,
            dial_area,
            dial.point(self.frame.peak_angle_deg, 1.0),
            '▼',
            self.theme.peak_style(),
        );

        plot(buf, dial_area, (dial.pivot_x, dial.pivot_y), '●', self.theme.normal());

        // Readout row
        let readout_y = inner.y + inner.height - 1;
        let level = format!(
            "{:+6.1} dB  pk {:+5.1}",
            self.frame.needle_db.clamp(MIN_DB, MAX_DB),
            self.frame.peak_db.clamp(MIN_DB, MAX_DB)
        );
        let x = inner.x + inner.width.saturating_sub(level.len() as u16) / 2;
        put_str(buf, inner, x, readout_y, &level, self.theme.normal());

        if self.frame.is_clipping() {
            put_str(
                buf,
                inner,
                inner.x,
                readout_y,
                "CLIP",
                Style::default().fg(self.theme.danger),
            );
        }
    }
}
