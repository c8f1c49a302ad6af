//! Per-channel analog meter state
//!
//! A channel tracks three values:
//! - the raw input level, set from outside every frame
//! - the needle position, which chases the input level
//! - the peak hold, which latches upward instantly and releases on decay ticks
//!
//! The needle update is a single-term exponential approach:
//! `position += (target - position) * spring_factor`. There is no velocity
//! term, so the needle lags but never overshoots or oscillates.

use crate::config::MeterConfig;
use crate::scale::db_to_angle;

/// Render parameters for one channel, one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeterFrame {
    /// Needle angle from vertical (-45 to 45)
    pub needle_angle_deg: f32,
    /// Peak tick angle from vertical (-45 to 45)
    pub peak_angle_deg: f32,
    /// Needle position in dB (unclamped)
    pub needle_db: f32,
    /// Peak hold in dB
    pub peak_db: f32,
}

impl MeterFrame {
    /// Needle is in the red zone above 0 dB
    pub fn is_clipping(&self) -> bool {
        self.needle_db > 0.0
    }
}

/// Move `position` one frame toward `target`.
///
/// Closes `spring_factor` of the remaining distance. For a factor in (0, 1]
/// the result lies between `position` and `target` inclusive.
#[inline]
pub fn advance_needle(position: f32, target: f32, spring_factor: f32) -> f32 {
    let distance = target - position;
    position + distance * spring_factor
}

/// Numeric state of one meter channel
#[derive(Debug, Clone, PartialEq)]
pub struct MeterState {
    current_level_db: f32,
    needle_position_db: f32,
    peak_hold_db: f32,
    peak_decay_db: f32,
    spring_factor: f32,
}

impl MeterState {
    /// Create a channel at the configured resting level
    pub fn new(config: &MeterConfig) -> Self {
        Self::with_levels(config, config.initial_db, config.initial_db)
    }

    /// Create a channel with an explicit starting level and peak.
    ///
    /// The needle starts at `level_db`.
    pub fn with_levels(config: &MeterConfig, level_db: f32, peak_db: f32) -> Self {
        Self {
            current_level_db: level_db,
            needle_position_db: level_db,
            peak_hold_db: peak_db,
            peak_decay_db: config.peak_decay_db,
            spring_factor: config.spring_factor,
        }
    }

    pub fn current_level_db(&self) -> f32 {
        self.current_level_db
    }

    pub fn needle_position_db(&self) -> f32 {
        self.needle_position_db
    }

    pub fn peak_hold_db(&self) -> f32 {
        self.peak_hold_db
    }

    /// Record a new input level and latch the peak if it rose.
    ///
    /// Non-finite levels are dropped and the previous level is kept.
    pub fn set_level(&mut self, db: f32) {
        if !db.is_finite() {
            tracing::trace!(db, "ignoring non-finite meter level");
            return;
        }
        self.current_level_db = db;
        self.update_peak_hold(db);
    }

    /// Advance the needle one frame toward `target_db`
    pub fn advance_needle(&mut self, target_db: f32) -> f32 {
        self.needle_position_db =
            advance_needle(self.needle_position_db, target_db, self.spring_factor);
        self.needle_position_db
    }

    /// Raise the peak hold to `current_db` if it is higher (instant attack)
    pub fn update_peak_hold(&mut self, current_db: f32) -> f32 {
        if current_db > self.peak_hold_db {
            self.peak_hold_db = current_db;
        }
        self.peak_hold_db
    }

    /// One decay tick (slow release).
    ///
    /// Lowers the peak by the decay step while it is above the current level,
    /// stopping at the current level.
    pub fn decay_peak(&mut self) -> f32 {
        if self.peak_hold_db > self.current_level_db {
            self.peak_hold_db =
                (self.peak_hold_db - self.peak_decay_db).max(self.current_level_db);
        }
        self.peak_hold_db
    }

    /// Render parameters for the current state
    pub fn render_frame(&self) -> MeterFrame {
        MeterFrame {
            needle_angle_deg: db_to_angle(self.needle_position_db),
            peak_angle_deg: db_to_angle(self.peak_hold_db),
            needle_db: self.needle_position_db,
            peak_db: self.peak_hold_db,
        }
    }

    /// Advance the needle toward the current level and render
    pub fn tick_frame(&mut self) -> MeterFrame {
        self.advance_needle(self.current_level_db);
        self.render_frame()
    }

    /// Return every value to `level_db`, keeping the tuning
    pub fn reset(&mut self, level_db: f32) {
        self.current_level_db = level_db;
        self.needle_position_db = level_db;
        self.peak_hold_db = level_db;
    }
}
