//! Rotation of the indicator around the dial center

use glam::DVec2;

use crate::consts::{DIAL_CENTER, SWEEP_START_ANGLE};

/// Rotation by `angle` degrees around `center`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationTransform {
    pub angle: f64,
    pub center: DVec2,
}

impl Default for RotationTransform {
    fn default() -> Self {
        Self::around_dial(SWEEP_START_ANGLE)
    }
}

impl RotationTransform {
    pub fn new(angle: f64, center: DVec2) -> Self {
        Self { angle, center }
    }

    /// Rotation around the standard dial center
    pub fn around_dial(angle: f64) -> Self {
        Self::new(angle, DVec2::new(DIAL_CENTER.0, DIAL_CENTER.1))
    }

    /// SVG `transform` attribute value
    pub fn to_svg(&self) -> String {
        format!("rotate({}, {}, {})", self.angle, self.center.x, self.center.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_attribute() {
        assert_eq!(RotationTransform::default().to_svg(), "rotate(-90, 250, 250)");
        assert_eq!(RotationTransform::around_dial(15.5).to_svg(), "rotate(15.5, 250, 250)");
    }
}
