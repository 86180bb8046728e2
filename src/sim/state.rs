//! Skill-check state and descriptor types
//!
//! Descriptor and config are supplied by the caller and never change during an
//! activation; `IndicatorState` is owned by the indicator and reset on every
//! new activation.

use serde::{Deserialize, Serialize};

use super::arc::TargetArc;
use crate::clamp_speed;
use crate::consts::*;

/// Which key(s) the player must press
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DescriptorFields")]
pub struct SkillCheckDescriptor {
    /// The canonical key that must be pressed for success
    pub key: char,
    /// Keys that end the round when pressed; anything else is ignored.
    /// When absent, every press ends the round.
    pub keys: Option<Vec<char>>,
}

/// Descriptor as written by callers, before key canonicalization
#[derive(Deserialize)]
struct DescriptorFields {
    key: char,
    #[serde(default)]
    keys: Option<Vec<char>>,
}

impl From<DescriptorFields> for SkillCheckDescriptor {
    fn from(fields: DescriptorFields) -> Self {
        let descriptor = Self::new(fields.key);
        match fields.keys {
            Some(keys) => descriptor.with_allowed_keys(keys),
            None => descriptor,
        }
    }
}

impl SkillCheckDescriptor {
    pub fn new(key: char) -> Self {
        Self {
            key: to_canonical(key),
            keys: None,
        }
    }

    /// Descriptor for a key given as text; `None` unless it is exactly one char
    pub fn from_key_str(key: &str) -> Option<Self> {
        single_char(key).map(Self::new)
    }

    /// Restrict which presses are evaluated
    pub fn with_allowed_keys(mut self, keys: impl IntoIterator<Item = char>) -> Self {
        self.keys = Some(keys.into_iter().map(to_canonical).collect());
        self
    }

    /// Whether a candidate press should be evaluated at all
    pub fn accepts(&self, candidate: &str) -> bool {
        match &self.keys {
            None => true,
            Some(keys) => single_char(candidate).is_some_and(|c| keys.contains(&c)),
        }
    }

    /// Whether a candidate press is the expected key
    pub fn is_expected(&self, candidate: &str) -> bool {
        single_char(candidate) == Some(self.key)
    }
}

/// Lowercase a key, keeping it unchanged if it has no single-char lowercase form
fn to_canonical(key: char) -> char {
    let mut lower = key.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(c), None) => c,
        _ => key,
    }
}

/// The only char of a candidate, or None for empty/multi-char key names ("enter")
fn single_char(candidate: &str) -> Option<char> {
    let mut chars = candidate.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Target arc and speed for one activation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivationConfig {
    /// Start of the success arc (degrees, sweep coordinates)
    pub target_start_angle: f64,
    /// Width of the success arc (degrees)
    pub target_arc_width: f64,
    /// Sweep speed scale; missing or non-positive values are floored
    #[serde(default)]
    pub speed_multiplier: f64,
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self {
            target_start_angle: 0.0,
            target_arc_width: 40.0,
            speed_multiplier: 1.0,
        }
    }
}

impl ActivationConfig {
    pub fn new(target_start_angle: f64, target_arc_width: f64, speed_multiplier: f64) -> Self {
        Self {
            target_start_angle,
            target_arc_width,
            speed_multiplier,
        }
    }

    pub fn target_arc(&self) -> TargetArc {
        TargetArc::new(self.target_start_angle, self.target_arc_width)
    }

    /// Speed multiplier after flooring
    pub fn effective_speed(&self) -> f64 {
        clamp_speed(self.speed_multiplier)
    }

    /// Time for one full sweep (milliseconds)
    pub fn duration_ms(&self) -> f64 {
        BASE_DURATION_MS / self.effective_speed()
    }
}

/// Result of one activation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    /// Wrong key, right key outside the arc, or sweep timed out
    Failure,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl From<bool> for Outcome {
    fn from(success: bool) -> Self {
        if success {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }
}

/// Lifecycle of the indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No activation yet, or the last one was cancelled externally
    Idle,
    /// Sweep in progress, listener installed
    Running,
    /// Result emitted; terminal until the next activation
    Completed(Outcome),
}

/// Per-activation mutable state
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorState {
    /// Current pointer angle (degrees), in [-90, 270]
    pub current_angle: f64,
    /// Timestamp of the first frame, captured lazily
    pub sweep_start_time: Option<f64>,
    /// Latch: set once per activation, suppresses every later callback
    pub completed: bool,
    /// Most recent normalized press awaiting evaluation
    pub last_pressed_key: Option<String>,
}

impl Default for IndicatorState {
    fn default() -> Self {
        Self {
            current_angle: SWEEP_START_ANGLE,
            sweep_start_time: None,
            completed: false,
            last_pressed_key: None,
        }
    }
}

impl IndicatorState {
    /// Reset for a fresh activation
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Degrees swept so far
    pub fn swept(&self) -> f64 {
        self.current_angle - SWEEP_START_ANGLE
    }
}
