//! Shape generation for the dial

use glam::DVec2;

use crate::sim::TargetArc;

/// Degrees per sampled segment of an arc outline
const DEGREES_PER_SEGMENT: f64 = 5.0;

/// SVG path data tracing the target arc at `radius` around `center`
pub fn target_arc_path(arc: &TargetArc, center: DVec2, radius: f64) -> String {
    let segments = (arc.width / DEGREES_PER_SEGMENT).ceil().max(1.0) as usize;
    let points = arc.sample_edge(center, radius, segments + 1);

    let mut path = String::with_capacity(points.len() * 16);
    for (i, p) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        if i > 0 {
            path.push(' ');
        }
        path.push_str(&format!("{} {:.2} {:.2}", cmd, p.x, p.y));
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arc_path_quarter() {
        let arc = TargetArc::new(-90.0, 90.0);
        let path = target_arc_path(&arc, DVec2::new(250.0, 250.0), 100.0);
        assert!(path.starts_with("M 250.00 150.00"));
        assert!(path.ends_with("L 350.00 250.00"));
        // 90 degrees at 5 degrees per segment
        assert_eq!(path.matches('L').count(), 18);
    }

    #[test]
    fn test_arc_path_empty_arc() {
        let arc = TargetArc::new(0.0, 0.0);
        let path = target_arc_path(&arc, DVec2::ZERO, 10.0);
        assert_eq!(path, "M 10.00 0.00 L 10.00 0.00");
    }
}
