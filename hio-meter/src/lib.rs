//! Analog VU meter simulation for Home-IO
//!
//! Turns a stream of dB levels into needle and peak-tick angles for an
//! analog dial. The numeric core ([`MeterState`], [`scale`]) has no I/O;
//! [`MeterDriver`] and [`PollTask`] add the scoped clocks that drive it.

mod config;
mod driver;
mod error;
mod poll;
pub mod scale;
mod source;
mod state;
mod stereo;

pub use config::{
    MeterConfig, DEFAULT_DECAY_INTERVAL, DEFAULT_FPS, DEFAULT_PEAK_DECAY_DB, DEFAULT_SPRING_FACTOR,
};
pub use driver::{MeterCommand, MeterDriver};
pub use error::MeterError;
pub use poll::PollTask;
pub use scale::{db_to_angle, db_to_unit, unit_to_angle, MAX_DB, MIN_DB};
pub use source::{ConstantLevelSource, LevelSource, SyntheticLevelSource};
pub use state::{advance_needle, MeterFrame, MeterState};
pub use stereo::{Channel, StereoFrame, StereoLevels, StereoMeter};
