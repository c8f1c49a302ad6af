//! Stereo pair of independent meter channels

use crate::config::MeterConfig;
use crate::state::{MeterFrame, MeterState};

/// Channel selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Left,
    Right,
}

impl Channel {
    pub fn label(self) -> &'static str {
        match self {
            Channel::Left => "L",
            Channel::Right => "R",
        }
    }
}

/// Input levels for one frame (dB)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StereoLevels {
    pub left_db: f32,
    pub right_db: f32,
}

impl StereoLevels {
    pub fn new(left_db: f32, right_db: f32) -> Self {
        Self { left_db, right_db }
    }

    /// Same level on both channels
    pub fn mono(db: f32) -> Self {
        Self::new(db, db)
    }
}

/// Render parameters for both channels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StereoFrame {
    pub left: MeterFrame,
    pub right: MeterFrame,
}

impl StereoFrame {
    pub fn channel(&self, channel: Channel) -> &MeterFrame {
        match channel {
            Channel::Left => &self.left,
            Channel::Right => &self.right,
        }
    }
}

/// Left and right meters; each channel owns its own state
#[derive(Debug, Clone, PartialEq)]
pub struct StereoMeter {
    left: MeterState,
    right: MeterState,
    rest_db: f32,
}

impl StereoMeter {
    pub fn new(config: &MeterConfig) -> Self {
        Self {
            left: MeterState::new(config),
            right: MeterState::new(config),
            rest_db: config.initial_db,
        }
    }

    pub fn channel(&self, channel: Channel) -> &MeterState {
        match channel {
            Channel::Left => &self.left,
            Channel::Right => &self.right,
        }
    }

    pub fn set_levels(&mut self, levels: StereoLevels) {
        self.left.set_level(levels.left_db);
        self.right.set_level(levels.right_db);
    }

    /// Advance both needles one frame and render
    pub fn tick_frame(&mut self) -> StereoFrame {
        StereoFrame {
            left: self.left.tick_frame(),
            right: self.right.tick_frame(),
        }
    }

    pub fn render_frame(&self) -> StereoFrame {
        StereoFrame {
            left: self.left.render_frame(),
            right: self.right.render_frame(),
        }
    }

    /// One decay tick on both peak holds
    pub fn decay_peaks(&mut self) {
        self.left.decay_peak();
        self.right.decay_peak();
    }

    /// Drop both channels back to the resting level
    pub fn reset(&mut self) {
        self.left.reset(self.rest_db);
        self.right.reset(self.rest_db);
    }
}
