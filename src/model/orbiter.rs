use nalgebra::{Point3, UnitQuaternion, Vector3};

use super::error::MotionError;
use super::motion::{MotionParameters, MotionTable};
use super::pose::Pose;
use super::spin::spin_delta;
use crate::math::geometry::{axis_rotation, wrap_degrees};

pub const DEFAULT_PREVIEW_SCALE: f64 = 1.0;

/// How far a body has gone around its orbit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrbitState {
    // Invariant: in [0, 360)
    angle: f64,
}

/// What an orbiter does each tick. Only orbiting bodies carry an orbit angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionMode {
    Orbiting(OrbitState),
    /// Orbit suspended; the body spins in place at a fixed scale.
    Preview { scale: f64 },
}

/// The result of one tick, before it's written into a pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitStep {
    /// None in preview mode, where the position belongs to the host.
    pub position: Option<Point3<f64>>,
    /// To be composed onto the current orientation
    pub spin: UnitQuaternion<f64>,
    pub scale: f64,
}

/// Moves one body around its anchor and spins it, driven by its table entry.
#[derive(Debug, Clone)]
pub struct Orbiter {
    body: String,
    mode: MotionMode,
}

impl OrbitState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Angle in degrees, in `[0, 360)`.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Moves the angle on by one tick. An infinite or NaN step leaves the
    /// angle where it was.
    pub fn advance(&mut self, rate: f64, dt: f64, time_scale: f64) {
        let step = rate * time_scale * dt;
        if step.is_finite() {
            self.angle = wrap_degrees(self.angle + step);
        }
    }

    /// Offset from the anchor at the current angle.
    ///
    /// The body starts out along +X and goes around `axis`.
    pub fn offset(&self, axis: &Vector3<f64>, radius: f64) -> Vector3<f64> {
        axis_rotation(axis, self.angle) * Vector3::x() * radius
    }
}

impl MotionMode {
    pub fn orbiting() -> Self {
        MotionMode::Orbiting(OrbitState::new())
    }

    pub fn preview(scale: f64) -> Self {
        MotionMode::Preview { scale }
    }

    pub fn is_preview(&self) -> bool {
        matches!(self, MotionMode::Preview { .. })
    }
}

impl Orbiter {
    pub fn new(body: impl Into<String>, mode: MotionMode) -> Self {
        Orbiter {
            body: body.into(),
            mode,
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn mode(&self) -> &MotionMode {
        &self.mode
    }

    /// Current orbit angle in degrees, or None in preview mode.
    pub fn angle(&self) -> Option<f64> {
        match &self.mode {
            MotionMode::Orbiting(orbit) => Some(orbit.angle()),
            MotionMode::Preview { .. } => None,
        }
    }

    /// Switches modes. The orbit starts over from angle zero.
    pub fn set_mode(&mut self, mode: MotionMode) {
        self.mode = match mode {
            MotionMode::Orbiting(_) => MotionMode::orbiting(),
            preview => preview,
        };
    }

    /// Advances the orbit (if orbiting) and works out where the body goes.
    ///
    /// On error, nothing has changed: the angle is only advanced once the
    /// anchor is known to be there.
    pub fn advance(
        &mut self,
        dt: f64,
        time_scale: f64,
        params: &MotionParameters,
        anchor: Option<&Point3<f64>>,
    ) -> Result<OrbitStep, MotionError> {
        let spin = spin_delta(params.spin_rate, &params.spin_axis, dt, time_scale);
        let body = &self.body;
        match &mut self.mode {
            MotionMode::Orbiting(orbit) => {
                let anchor = anchor.ok_or_else(|| MotionError::MissingAnchor(body.clone()))?;
                orbit.advance(params.orbit_rate, dt, time_scale);
                let offset = orbit.offset(&params.orbit_axis, params.orbit_radius);
                Ok(OrbitStep {
                    position: Some(anchor + offset),
                    spin,
                    scale: params.display_scale,
                })
            }
            MotionMode::Preview { scale } => Ok(OrbitStep {
                position: None,
                spin,
                scale: *scale,
            }),
        }
    }

    /// Looks up this body's parameters, advances, and writes the result into
    /// `pose`. The pose is untouched if anything goes wrong.
    pub fn tick(
        &mut self,
        dt: f64,
        time_scale: f64,
        table: &MotionTable,
        anchor: Option<&Point3<f64>>,
        pose: &mut Pose,
    ) -> Result<(), MotionError> {
        let params = table.lookup(&self.body)?;
        let step = self.advance(dt, time_scale, params, anchor)?;

        if let Some(position) = step.position {
            pose.position = position;
        }
        pose.orientation *= step.spin;
        pose.orientation.renormalize();
        pose.scale = step.scale;
        Ok(())
    }
}
