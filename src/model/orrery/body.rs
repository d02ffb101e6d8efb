use nalgebra::{Point3, Vector3};

use crate::model::orbiter::Orbiter;
use crate::model::pose::Pose;
use crate::model::spin::AxialSpin;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BodyID(pub usize);

// All the immutable info about a body
#[derive(Debug, Clone)]
pub struct BodyInfo {
    /// Also the key into the motion table
    pub name: String,
    pub color: Point3<f32>,
}

#[derive(Debug, Clone)]
pub enum BodyMotion {
    /// Never moves on its own
    Fixed,
    /// Table-driven orbit around another body, plus spin
    Orbit {
        orbiter: Orbiter,
        anchor: Option<BodyID>,
    },
    /// Spin in place, no table
    Spin(AxialSpin),
}

/// Makes a body ride along with another one, at a fixed offset.
///
/// This writes the body's position every frame from outside its own motion,
/// which is why attached bodies usually want a shadowed spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attachment {
    pub parent: BodyID,
    pub offset: Vector3<f64>,
}

#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyID,
    pub info: BodyInfo,
    pub pose: Pose,
    pub motion: BodyMotion,
    pub attachment: Option<Attachment>,
}

impl Body {
    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn position(&self) -> Point3<f64> {
        self.pose.position
    }

    pub fn orbiter(&self) -> Option<&Orbiter> {
        match &self.motion {
            BodyMotion::Orbit { orbiter, .. } => Some(orbiter),
            _ => None,
        }
    }

    pub fn anchor(&self) -> Option<BodyID> {
        match &self.motion {
            BodyMotion::Orbit { anchor, .. } => *anchor,
            _ => None,
        }
    }
}
