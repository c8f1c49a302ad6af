//! Level sources feeding the meter each frame
//!
//! The dashboard has no real audio telemetry yet, so the default source
//! synthesizes levels proportional to the zone volume. A telemetry-backed
//! source only needs to implement [`LevelSource`].

use crate::scale::{MAX_DB, MIN_DB};
use crate::stereo::StereoLevels;

/// Something that produces stereo levels once per frame
pub trait LevelSource {
    /// Levels for the next frame
    fn next_levels(&mut self) -> StereoLevels;

    /// Zone volume changed (0.0-1.0). Sources that measure real audio ignore it.
    fn set_volume(&mut self, _volume: f32) {}
}

/// Pseudo-random levels scaled by a volume setting
#[derive(Debug, Clone)]
pub struct SyntheticLevelSource {
    volume: f32,
    random_state: u64,
}

impl SyntheticLevelSource {
    /// Lower bound of the random swing, as a fraction of the volume span
    const SWING_FLOOR: f32 = 0.7;

    pub fn new(volume: f32) -> Self {
        Self::with_seed(volume, 0xDEADBEEF_CAFEBABE)
    }

    pub fn with_seed(volume: f32, seed: u64) -> Self {
        Self {
            volume: Self::clamp_volume(volume),
            // xorshift never leaves zero
            random_state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    fn clamp_volume(volume: f32) -> f32 {
        if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        }
    }

    /// xorshift64 PRNG in [0, 1)
    fn next_random(&mut self) -> f32 {
        self.random_state ^= self.random_state << 13;
        self.random_state ^= self.random_state >> 7;
        self.random_state ^= self.random_state << 17;
        unit_from_state(self.random_state)
    }

    fn next_level(&mut self) -> f32 {
        let swing = Self::SWING_FLOOR + (1.0 - Self::SWING_FLOOR) * self.next_random();
        MIN_DB + self.volume * (MAX_DB - MIN_DB) * swing
    }
}

/// Top 24 bits of the PRNG state as a float in [0, 1).
///
/// 24 bits fit the f32 mantissa exactly, so the result never rounds up to 1.
fn unit_from_state(state: u64) -> f32 {
    (state >> 40) as f32 / (1u64 << 24) as f32
}

impl Default for SyntheticLevelSource {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl LevelSource for SyntheticLevelSource {
    fn next_levels(&mut self) -> StereoLevels {
        let left_db = self.next_level();
        let right_db = self.next_level();
        StereoLevels { left_db, right_db }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = Self::clamp_volume(volume);
    }
}

/// Fixed levels every frame
#[derive(Debug, Clone, Copy)]
pub struct ConstantLevelSource {
    levels: StereoLevels,
}

impl ConstantLevelSource {
    pub fn new(levels: StereoLevels) -> Self {
        Self { levels }
    }

    /// Both channels at the dial floor
    pub fn silence() -> Self {
        Self::new(StereoLevels::mono(MIN_DB))
    }
}

impl LevelSource for ConstantLevelSource {
    fn next_levels(&mut self) -> StereoLevels {
        self.levels
    }
}

impl<S: LevelSource + ?Sized> LevelSource for Box<S> {
    fn next_levels(&mut self) -> StereoLevels {
        (**self).next_levels()
    }

    fn set_volume(&mut self, volume: f32) {
        (**self).set_volume(volume)
    }
}
