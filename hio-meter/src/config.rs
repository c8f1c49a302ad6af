//! Meter tuning constants

use std::time::Duration;

use crate::error::MeterError;
use crate::scale::MIN_DB;

/// Default fraction of the remaining gap closed per frame
pub const DEFAULT_SPRING_FACTOR: f32 = 0.08;
/// Default peak-hold release per decay tick (dB)
pub const DEFAULT_PEAK_DECAY_DB: f32 = 0.5;
/// Default frame rate of the needle animation
pub const DEFAULT_FPS: u32 = 60;
/// Default decay tick interval
pub const DEFAULT_DECAY_INTERVAL: Duration = Duration::from_secs(1);

/// Tuning for one meter (both channels of a stereo pair share it)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterConfig {
    /// Fraction of the gap to target closed per frame, in (0, 1]
    pub spring_factor: f32,
    /// dB removed from the peak hold on every decay tick
    pub peak_decay_db: f32,
    /// Animation frame period
    pub frame_interval: Duration,
    /// Peak decay period
    pub decay_interval: Duration,
    /// Level, needle and peak at creation
    pub initial_db: f32,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            spring_factor: DEFAULT_SPRING_FACTOR,
            peak_decay_db: DEFAULT_PEAK_DECAY_DB,
            frame_interval: Self::interval_for_fps(DEFAULT_FPS),
            decay_interval: DEFAULT_DECAY_INTERVAL,
            initial_db: MIN_DB,
        }
    }
}

impl MeterConfig {
    /// Frame period for a frame rate (0 fps is treated as 1)
    pub fn interval_for_fps(fps: u32) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(fps.max(1)))
    }

    pub fn with_spring_factor(mut self, spring_factor: f32) -> Self {
        self.spring_factor = spring_factor;
        self
    }

    pub fn with_peak_decay(mut self, peak_decay_db: f32) -> Self {
        self.peak_decay_db = peak_decay_db;
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.frame_interval = Self::interval_for_fps(fps);
        self
    }

    pub fn with_decay_interval(mut self, interval: Duration) -> Self {
        self.decay_interval = interval;
        self
    }

    /// Check every constant is usable
    pub fn validate(&self) -> Result<(), MeterError> {
        let k = self.spring_factor;
        if !k.is_finite() || k <= 0.0 || k > 1.0 {
            return Err(MeterError::InvalidSpringFactor(k));
        }
        if !self.peak_decay_db.is_finite() || self.peak_decay_db < 0.0 {
            return Err(MeterError::InvalidDecayRate(self.peak_decay_db));
        }
        if self.frame_interval.is_zero() {
            return Err(MeterError::ZeroInterval("Frame"));
        }
        if self.decay_interval.is_zero() {
            return Err(MeterError::ZeroInterval("Decay"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = MeterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.spring_factor, 0.08);
        assert_eq!(config.peak_decay_db, 0.5);
        assert_eq!(config.frame_interval, Duration::from_micros(16_666));
        assert_eq!(config.initial_db, -60.0);
    }

    #[test]
    fn test_spring_factor_bounds() {
        let base = MeterConfig::default();
        assert!(base.with_spring_factor(1.0).validate().is_ok());
        assert!(base.with_spring_factor(0.001).validate().is_ok());

        for bad in [0.0, -0.1, 1.01, f32::NAN, f32::INFINITY] {
            assert!(
                matches!(
                    base.with_spring_factor(bad).validate(),
                    Err(MeterError::InvalidSpringFactor(_))
                ),
                "spring factor {} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_decay_rate_bounds() {
        let base = MeterConfig::default();
        assert!(base.with_peak_decay(0.0).validate().is_ok());
        assert!(matches!(
            base.with_peak_decay(-0.5).validate(),
            Err(MeterError::InvalidDecayRate(_))
        ));
    }

    #[test]
    fn test_zero_intervals_rejected() {
        let config = MeterConfig::default().with_decay_interval(Duration::ZERO);
        assert!(matches!(
            config.validate(),
            Err(MeterError::ZeroInterval("Decay"))
        ));

        let mut config = MeterConfig::default();
        config.frame_interval = Duration::ZERO;
        assert!(matches!(
            config.validate(),
            Err(MeterError::ZeroInterval("Frame"))
        ));
    }

    #[test]
    fn test_zero_fps_is_one() {
        assert_eq!(MeterConfig::interval_for_fps(0), Duration::from_secs(1));
    }
}
