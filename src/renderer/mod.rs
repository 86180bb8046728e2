//! Rendering output
//!
//! The indicator is painted by the host (an SVG element in the browser). This
//! module only produces what the host applies: a rotation transform per frame
//! and the outline of the target arc per activation.

pub mod shapes;
pub mod transform;

pub use shapes::target_arc_path;
pub use transform::RotationTransform;
