//! Target arc geometry
//!
//! The arc lives in the sweep's own coordinate system: degrees, with the sweep
//! starting at -90 (top of the dial) and increasing clockwise on screen.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::polar_to_cartesian;

/// Angular window in which a correct press counts as success
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetArc {
    /// Start angle (degrees)
    pub start: f64,
    /// Angular width (degrees, never negative)
    pub width: f64,
}

impl TargetArc {
    pub fn new(start: f64, width: f64) -> Self {
        // NaN and negative widths collapse to an empty (single-angle) arc
        let width = if width > 0.0 { width } else { 0.0 };
        Self { start, width }
    }

    /// End angle of the arc
    #[inline]
    pub fn end(&self) -> f64 {
        self.start + self.width
    }

    /// Check if an angle is within the arc (inclusive both ends)
    pub fn contains_angle(&self, angle: f64) -> bool {
        angle >= self.start && angle <= self.end()
    }

    /// Sample points along the arc at the given radius around `center`
    pub fn sample_edge(&self, center: DVec2, radius: f64, num_points: usize) -> Vec<DVec2> {
        (0..num_points)
            .map(|i| {
                let t = i as f64 / (num_points - 1).max(1) as f64;
                center + polar_to_cartesian(radius, self.start + t * self.width)
            })
            .collect()
    }
}
