use nalgebra::{Point3, UnitQuaternion};

/// Where an object is, which way it faces, and how big it's drawn.
///
/// This is the transform the host renders. The motion components only ever
/// write new values into it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Point3<f64>,
    pub orientation: UnitQuaternion<f64>,
    /// Uniform scale
    pub scale: f64,
}

impl Pose {
    pub fn at(position: Point3<f64>) -> Self {
        Pose {
            position,
            orientation: UnitQuaternion::identity(),
            scale: 1.0,
        }
    }

    pub fn with_orientation(self, orientation: UnitQuaternion<f64>) -> Self {
        Pose {
            orientation,
            ..self
        }
    }

    pub fn with_scale(self, scale: f64) -> Self {
        Pose { scale, ..self }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Pose::at(Point3::origin())
    }
}
