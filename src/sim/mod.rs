//! Deterministic skill-check module
//!
//! All timing and input-validation logic lives here. This module must be pure:
//! - Time only arrives as frame timestamps from the host
//! - Key presses only arrive as `RawKey` values from the host
//! - No rendering or platform dependencies beyond the scheduler/key traits

pub mod arc;
pub mod indicator;
pub mod input;
pub mod outcome;
pub mod roll;
pub mod state;
pub mod sweep;

pub use arc::TargetArc;
pub use indicator::Indicator;
pub use input::{RawKey, normalize_key};
pub use outcome::{Verdict, evaluate};
pub use roll::roll_check;
pub use state::{ActivationConfig, IndicatorState, Outcome, Phase, SkillCheckDescriptor};
pub use sweep::{SweepStep, advance, angle_at, sweep_duration_ms};
