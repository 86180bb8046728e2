//! Frame-driven sweep of the indicator
//!
//! The sweep is a pure function of elapsed time: each frame recomputes the
//! angle from the first frame's timestamp, so dropped or uneven frames never
//! accumulate drift.

use super::state::IndicatorState;
use crate::clamp_speed;
use crate::consts::*;

/// What the sweep did on a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SweepStep {
    /// Angle advanced; schedule another frame
    Advanced(f64),
    /// Full circle reached without a qualifying press
    Closed,
}

/// Time for a full revolution at the given multiplier (milliseconds)
#[inline]
pub fn sweep_duration_ms(speed_multiplier: f64) -> f64 {
    BASE_DURATION_MS / clamp_speed(speed_multiplier)
}

/// Indicator angle after `elapsed_ms` of a sweep lasting `duration_ms`
pub fn angle_at(elapsed_ms: f64, duration_ms: f64) -> f64 {
    let progress = if duration_ms > 0.0 {
        (elapsed_ms / duration_ms).clamp(0.0, 1.0)
    } else {
        1.0
    };
    SWEEP_START_ANGLE + progress * SWEEP_DEGREES
}

/// Advance the sweep to frame timestamp `time`
pub fn advance(state: &mut IndicatorState, time: f64, speed_multiplier: f64) -> SweepStep {
    let start = *state.sweep_start_time.get_or_insert(time);
    let elapsed = (time - start).max(0.0);
    let angle = angle_at(elapsed, sweep_duration_ms(speed_multiplier));

    // A host clock stepping backwards must not rewind the pointer
    state.current_angle = angle.max(state.current_angle);

    if state.swept() >= SWEEP_DEGREES {
        SweepStep::Closed
    } else {
        SweepStep::Advanced(state.current_angle)
    }
}
