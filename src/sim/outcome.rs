//! Outcome evaluation for a candidate key press

use super::arc::TargetArc;
use super::state::{Outcome, SkillCheckDescriptor};

/// Decision for a single candidate press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Key outside the allowed set; the sweep carries on
    Ignored,
    /// The round ends with this outcome
    Decided(Outcome),
}

/// Judge a normalized press made while the pointer sits at `angle`
pub fn evaluate(
    descriptor: &SkillCheckDescriptor,
    arc: &TargetArc,
    candidate: &str,
    angle: f64,
) -> Verdict {
    if !descriptor.accepts(candidate) {
        return Verdict::Ignored;
    }

    let success = descriptor.is_expected(candidate) && arc.contains_angle(angle);
    Verdict::Decided(Outcome::from(success))
}
