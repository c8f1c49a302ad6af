//! Dial scale mapping: decibels -> unit interval -> needle angle
//!
//! The dial spans -60 dB to +6 dB over a 90 degree arc centred on vertical.

/// Lowest level shown on the dial
pub const MIN_DB: f32 = -60.0;
/// Highest level shown on the dial
pub const MAX_DB: f32 = 6.0;

/// Needle angle at the left stop (degrees from vertical)
pub const MIN_ANGLE_DEG: f32 = -45.0;
/// Total sweep of the dial
pub const SWEEP_DEG: f32 = 90.0;

/// Map a dB value to the unit interval.
///
/// Values are clamped into `[MIN_DB, MAX_DB]` first, so the result is always
/// in `[0, 1]`. NaN is treated as silence and maps to 0.
#[inline]
pub fn db_to_unit(db: f32) -> f32 {
    if db.is_nan() {
        return 0.0;
    }
    let clamped = db.clamp(MIN_DB, MAX_DB);
    (clamped - MIN_DB) / (MAX_DB - MIN_DB)
}

/// Map a unit-interval position to a needle angle in degrees (-45 to 45).
#[inline]
pub fn unit_to_angle(u: f32) -> f32 {
    MIN_ANGLE_DEG + u * SWEEP_DEG
}

/// Shorthand for `unit_to_angle(db_to_unit(db))`
#[inline]
pub fn db_to_angle(db: f32) -> f32 {
    unit_to_angle(db_to_unit(db))
}
