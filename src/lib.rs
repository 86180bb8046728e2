//! Skill Check - a rotating reaction-test indicator
//!
//! Core modules:
//! - `sim`: Deterministic skill-check logic (sweep, key normalization, outcome)
//! - `platform`: Frame scheduler and keyboard source abstraction (browser + manual)
//! - `renderer`: Rotation transform and target arc output
//! - `settings`: Difficulty presets and persisted preferences

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Difficulty, Settings};
pub use sim::{ActivationConfig, Indicator, RawKey, SkillCheckDescriptor};

use glam::DVec2;

/// Skill-check configuration constants
pub mod consts {
    /// Time for one full sweep at speed multiplier 1.0 (milliseconds)
    pub const BASE_DURATION_MS: f64 = 2000.0;
    /// Floor for the speed multiplier so the sweep never stalls
    pub const MIN_SPEED_MULTIPLIER: f64 = 0.0001;

    /// Sweep begins at the top of the dial
    pub const SWEEP_START_ANGLE: f64 = -90.0;
    /// One full revolution (degrees)
    pub const SWEEP_DEGREES: f64 = 360.0;
    /// Last angle the sweep reaches before timing out
    pub const SWEEP_END_ANGLE: f64 = SWEEP_START_ANGLE + SWEEP_DEGREES;

    /// Code point of GREEK CAPITAL LETTER HETA; anything at or above is non-Latin
    pub const NON_LATIN_CODE_POINT: u32 = 880;

    /// Dial geometry (SVG user units, 500x500 viewBox)
    pub const DIAL_CENTER: (f64, f64) = (250.0, 250.0);
    pub const DIAL_RADIUS: f64 = 200.0;
}

/// Clamp a speed multiplier to something that yields a finite, progressing sweep
#[inline]
pub fn clamp_speed(multiplier: f64) -> f64 {
    if multiplier.is_nan() {
        return consts::MIN_SPEED_MULTIPLIER;
    }
    multiplier.max(consts::MIN_SPEED_MULTIPLIER)
}

/// Convert polar (r, degrees) to cartesian (x, y), y pointing down as on screen
#[inline]
pub fn polar_to_cartesian(r: f64, degrees: f64) -> DVec2 {
    let theta = degrees.to_radians();
    DVec2::new(r * theta.cos(), r * theta.sin())
}
