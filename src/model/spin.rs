use nalgebra::{UnitQuaternion, Vector3};

use super::pose::Pose;
use crate::math::geometry::axis_rotation;

/// The rotation a body makes about its own axis over one tick.
///
/// An infinite or NaN angle gives no rotation at all.
pub fn spin_delta(rate: f64, axis: &Vector3<f64>, dt: f64, time_scale: f64) -> UnitQuaternion<f64> {
    let degrees = rate * time_scale * dt;
    if degrees.is_finite() {
        axis_rotation(axis, degrees)
    } else {
        UnitQuaternion::identity()
    }
}

/// Turns `orientation` by one tick's worth of spin.
///
/// The axis is in the body's own frame, so the delta is composed on the right.
/// This is incremental: whatever happened to the orientation since the last
/// tick is kept.
pub fn spin_step(
    orientation: &UnitQuaternion<f64>,
    rate: f64,
    axis: &Vector3<f64>,
    dt: f64,
    time_scale: f64,
) -> UnitQuaternion<f64> {
    let mut orientation = orientation * spin_delta(rate, axis, dt, time_scale);
    orientation.renormalize();
    orientation
}

/// Spin with no orbit and no table lookup.
///
/// A shadowed spinner keeps its own copy of the orientation and only ever
/// writes it out. Use that when something else may move the same transform
/// between ticks, like a moon riding along with its planet; otherwise the
/// outside writes would leak into the accumulated rotation.
#[derive(Debug, Clone)]
pub struct AxialSpin {
    /// Degrees per second
    pub rate: f64,
    pub axis: Vector3<f64>,
    shadow: Option<UnitQuaternion<f64>>,
}

impl AxialSpin {
    pub fn new(rate: f64, axis: Vector3<f64>) -> Self {
        AxialSpin {
            rate,
            axis,
            shadow: None,
        }
    }

    pub fn shadowed(rate: f64, axis: Vector3<f64>, initial: UnitQuaternion<f64>) -> Self {
        AxialSpin {
            rate,
            axis,
            shadow: Some(initial),
        }
    }

    pub fn is_shadowed(&self) -> bool {
        self.shadow.is_some()
    }

    /// The orientation this spinner intends the body to have, if it keeps one.
    pub fn shadow(&self) -> Option<&UnitQuaternion<f64>> {
        self.shadow.as_ref()
    }

    pub fn tick(&mut self, dt: f64, time_scale: f64, pose: &mut Pose) {
        match &mut self.shadow {
            Some(shadow) => {
                *shadow = spin_step(shadow, self.rate, &self.axis, dt, time_scale);
                pose.orientation = *shadow;
            }
            None => {
                pose.orientation = spin_step(&pose.orientation, self.rate, &self.axis, dt, time_scale);
            }
        }
    }
}
