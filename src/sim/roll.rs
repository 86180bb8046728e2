//! Seeded generation of skill checks
//!
//! Same settings and same RNG state always produce the same check.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{ActivationConfig, SkillCheckDescriptor};
use crate::consts::{SWEEP_DEGREES, SWEEP_START_ANGLE};
use crate::settings::Settings;

/// The target never starts within the first third of the sweep
pub const MIN_TARGET_OFFSET: f64 = 120.0;

/// Roll a descriptor and config from settings
pub fn roll_check(settings: &Settings, rng: &mut Pcg32) -> (SkillCheckDescriptor, ActivationConfig) {
    let keys = settings.input_keys();
    let key = keys[rng.random_range(0..keys.len())];

    let mut descriptor = SkillCheckDescriptor::new(key);
    if keys.len() > 1 {
        descriptor = descriptor.with_allowed_keys(keys);
    }

    let area = settings.area_size().max(0.0);
    let span = (SWEEP_DEGREES - area) - MIN_TARGET_OFFSET;
    let offset = if span > 0.0 {
        rng.random_range(0.0..span).floor() + MIN_TARGET_OFFSET
    } else {
        MIN_TARGET_OFFSET
    };

    let config = ActivationConfig::new(
        SWEEP_START_ANGLE + offset,
        area,
        settings.speed_multiplier(),
    );
    (descriptor, config)
}
