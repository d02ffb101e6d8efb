use std::collections::BTreeMap;

use nalgebra::{Point3, Vector3};
use tracing::debug;

use super::error::MotionError;
use super::motion::MotionTable;
use super::orbiter::{MotionMode, Orbiter};
use super::pose::Pose;
use super::spin::AxialSpin;
use super::tracker::PositionSource;

mod body;

pub use body::{Attachment, Body, BodyID, BodyInfo, BodyMotion};

/// All the bodies in the scene, and the table that drives them.
///
/// Bodies are updated in the order they were added, so add an anchor before
/// anything that orbits it.
#[derive(Debug, Clone)]
pub struct Orrery {
    table: MotionTable,
    bodies: BTreeMap<BodyID, Body>,
    next_body_id: usize,
}

impl Orrery {
    pub fn new(table: MotionTable) -> Self {
        Orrery {
            table,
            bodies: BTreeMap::new(),
            next_body_id: 0,
        }
    }

    pub fn table(&self) -> &MotionTable {
        &self.table
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> + '_ {
        self.bodies.values()
    }

    pub fn get_body(&self, id: BodyID) -> Option<&Body> {
        self.bodies.get(&id)
    }

    pub fn get_body_mut(&mut self, id: BodyID) -> Option<&mut Body> {
        self.bodies.get_mut(&id)
    }

    pub fn find_body(&self, name: &str) -> Option<BodyID> {
        self.bodies.values().find(|b| b.info.name == name).map(|b| b.id)
    }

    pub fn position_of(&self, id: BodyID) -> Option<Point3<f64>> {
        self.bodies.get(&id).map(Body::position)
    }

    pub fn add_fixed_body(&mut self, info: BodyInfo, pose: Pose) -> BodyID {
        self.insert_new_body(info, pose, BodyMotion::Fixed)
    }

    pub fn add_spinning_body(&mut self, info: BodyInfo, spin: AxialSpin, pose: Pose) -> BodyID {
        self.insert_new_body(info, pose, BodyMotion::Spin(spin))
    }

    /// Adds a table-driven body. It starts out at orbit angle zero, even in
    /// preview mode.
    pub fn add_orbiting_body(
        &mut self,
        info: BodyInfo,
        anchor: Option<BodyID>,
        mode: MotionMode,
    ) -> BodyID {
        let mut orbiter = Orbiter::new(info.name.clone(), MotionMode::orbiting());
        let anchor_position = anchor.and_then(|id| self.position_of(id));

        // A zero-length tick puts everything in its starting place
        let mut pose = Pose::at(anchor_position.unwrap_or_else(Point3::origin));
        if let Err(err) = orbiter.tick(0.0, 1.0, &self.table, anchor_position.as_ref(), &mut pose) {
            debug!(%err, "could not place new body");
        }
        orbiter.set_mode(mode);

        self.insert_new_body(info, pose, BodyMotion::Orbit { orbiter, anchor })
    }

    /// Has `id` follow `parent` around at a fixed offset from now on.
    pub fn attach(&mut self, id: BodyID, parent: BodyID, offset: Vector3<f64>) {
        let parent_position = self.position_of(parent);
        if let Some(body) = self.bodies.get_mut(&id) {
            body.attachment = Some(Attachment { parent, offset });
            if let Some(p) = parent_position {
                body.pose.position = p + offset;
            }
        }
    }

    pub fn remove_body(&mut self, id: BodyID) -> Option<Body> {
        self.bodies.remove(&id)
    }

    fn insert_new_body(&mut self, info: BodyInfo, pose: Pose, motion: BodyMotion) -> BodyID {
        let id = BodyID(self.next_body_id);
        self.next_body_id += 1;

        let body = Body {
            id,
            info,
            pose,
            motion,
            attachment: None,
        };

        self.bodies.insert(id, body);
        id
    }

    /// Puts every orbiting body into or out of preview mode. Orbits restart
    /// from angle zero when they resume.
    pub fn set_preview(&mut self, preview: bool, scale: f64) {
        for body in self.bodies.values_mut() {
            if let BodyMotion::Orbit { orbiter, .. } = &mut body.motion {
                let mode = if preview {
                    MotionMode::preview(scale)
                } else {
                    MotionMode::orbiting()
                };
                orbiter.set_mode(mode);
            }
        }
    }

    /// Moves every body forward by `dt` seconds. Returns the problems it ran
    /// into; bodies that hit one just stay put this frame.
    ///
    /// Orbits go first, then attachments, then free spins, so each phase sees
    /// the positions from this frame.
    pub fn advance_bodies(&mut self, dt: f64, time_scale: f64) -> Vec<MotionError> {
        let mut errors = vec![];
        let ids: Vec<BodyID> = self.bodies.keys().copied().collect();

        for id in ids.iter() {
            // Read the anchor first, since it's a different body
            let anchor = match self.bodies.get(id).map(|b| &b.motion) {
                Some(BodyMotion::Orbit { anchor, .. }) => anchor.and_then(|a| self.position_of(a)),
                _ => continue,
            };

            if let Some(body) = self.bodies.get_mut(id) {
                if let BodyMotion::Orbit { orbiter, .. } = &mut body.motion {
                    let result = orbiter.tick(dt, time_scale, &self.table, anchor.as_ref(), &mut body.pose);
                    if let Err(err) = result {
                        errors.push(err);
                    }
                }
            }
        }

        for id in ids.iter() {
            let attachment = match self.bodies.get(id).and_then(|b| b.attachment) {
                Some(attachment) => attachment,
                None => continue,
            };
            let parent_position = self.position_of(attachment.parent);
            if let Some(body) = self.bodies.get_mut(id) {
                match parent_position {
                    Some(p) => body.pose.position = p + attachment.offset,
                    None => errors.push(MotionError::MissingAnchor(body.info.name.clone())),
                }
            }
        }

        for body in self.bodies.values_mut() {
            if let BodyMotion::Spin(spin) = &mut body.motion {
                spin.tick(dt, time_scale, &mut body.pose);
            }
        }

        errors
    }
}

impl PositionSource<BodyID> for Orrery {
    fn position_of(&self, target: &BodyID) -> Option<Point3<f64>> {
        Orrery::position_of(self, *target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use nalgebra::UnitQuaternion;

    fn info(name: &str) -> BodyInfo {
        BodyInfo {
            name: name.to_owned(),
            color: Point3::new(1.0, 1.0, 1.0),
        }
    }

    #[test]
    fn test_new_orbiter_starts_on_x_axis() {
        let mut orrery = Orrery::new(MotionTable::builtin());
        let sun = orrery.add_fixed_body(info("Sun"), Pose::at(Point3::new(1.0, 0.0, 0.0)));
        let earth = orrery.add_orbiting_body(info("Earth"), Some(sun), MotionMode::orbiting());

        let body = orrery.get_body(earth).unwrap();
        assert_relative_eq!(body.position(), Point3::new(4.5, 0.0, 0.0));
        assert_eq!(body.pose.scale, 0.045);
        assert_eq!(body.orbiter().unwrap().angle(), Some(0.0));
        assert_eq!(orrery.find_body("Earth"), Some(earth));
    }

    #[test]
    fn test_orbiter_follows_moving_anchor() {
        let mut orrery = Orrery::new(MotionTable::builtin());
        let sun = orrery.add_fixed_body(info("Sun"), Pose::default());
        let earth = orrery.add_orbiting_body(info("Earth"), Some(sun), MotionMode::orbiting());

        orrery.get_body_mut(sun).unwrap().pose.position = Point3::new(0.0, 10.0, 0.0);
        assert!(orrery.advance_bodies(0.0, 1.0).is_empty());
        assert_relative_eq!(orrery.position_of(earth).unwrap(), Point3::new(3.5, 10.0, 0.0));
    }

    #[test]
    fn test_errors_are_collected_not_fatal() {
        let mut orrery = Orrery::new(MotionTable::builtin());
        let sun = orrery.add_fixed_body(info("Sun"), Pose::default());
        let vulcan = orrery.add_orbiting_body(info("Vulcan"), Some(sun), MotionMode::orbiting());
        let lost = orrery.add_orbiting_body(info("Mars"), None, MotionMode::orbiting());
        let earth = orrery.add_orbiting_body(info("Earth"), Some(sun), MotionMode::orbiting());

        let vulcan_before = orrery.get_body(vulcan).unwrap().pose;
        let lost_before = orrery.get_body(lost).unwrap().pose;

        let errors = orrery.advance_bodies(1.0, 1.0);
        assert_eq!(
            errors,
            vec![
                MotionError::UnknownBodyId("Vulcan".to_owned()),
                MotionError::MissingAnchor("Mars".to_owned()),
            ]
        );
        assert_eq!(orrery.get_body(vulcan).unwrap().pose, vulcan_before);
        assert_eq!(orrery.get_body(lost).unwrap().pose, lost_before);

        // Everyone else still moved
        let angle = orrery.get_body(earth).unwrap().orbiter().unwrap().angle();
        assert_relative_eq!(angle.unwrap(), 1.14);
    }

    #[test]
    fn test_removed_anchor() {
        let mut orrery = Orrery::new(MotionTable::builtin());
        let sun = orrery.add_fixed_body(info("Sun"), Pose::default());
        let earth = orrery.add_orbiting_body(info("Earth"), Some(sun), MotionMode::orbiting());
        orrery.remove_body(sun);

        let before = orrery.get_body(earth).unwrap().pose;
        let errors = orrery.advance_bodies(1.0, 1.0);
        assert_eq!(errors, vec![MotionError::MissingAnchor("Earth".to_owned())]);
        assert_eq!(orrery.get_body(earth).unwrap().pose, before);
    }

    #[test]
    fn test_attached_body_rides_along() {
        let mut orrery = Orrery::new(MotionTable::builtin());
        let sun = orrery.add_fixed_body(info("Sun"), Pose::default());
        let earth = orrery.add_orbiting_body(info("Earth"), Some(sun), MotionMode::orbiting());
        let moon = orrery.add_spinning_body(
            info("Moon"),
            AxialSpin::shadowed(10.0, Vector3::y(), UnitQuaternion::identity()),
            Pose::default(),
        );
        let offset = Vector3::new(0.0, 0.0, 0.5);
        orrery.attach(moon, earth, offset);

        for _ in 0..7 {
            orrery.advance_bodies(1.0, 1.0);
            let earth_pos = orrery.position_of(earth).unwrap();
            assert_relative_eq!(orrery.position_of(moon).unwrap(), earth_pos + offset);
        }
        let spun = orrery.get_body(moon).unwrap().pose.orientation.angle().to_degrees();
        assert_relative_eq!(spun, 70.0, epsilon = 1e-9);
    }

    #[test]
    fn test_preview_freezes_positions() {
        let mut orrery = Orrery::new(MotionTable::builtin());
        let sun = orrery.add_fixed_body(info("Sun"), Pose::default());
        let earth = orrery.add_orbiting_body(info("Earth"), Some(sun), MotionMode::orbiting());
        orrery.advance_bodies(10.0, 1.0);
        let parked = orrery.position_of(earth).unwrap();

        orrery.set_preview(true, 2.5);
        for _ in 0..10 {
            orrery.advance_bodies(3.0, 1.0);
            let body = orrery.get_body(earth).unwrap();
            assert_eq!(body.position(), parked);
            assert_eq!(body.pose.scale, 2.5);
        }

        // Back to orbiting, from the start of the orbit
        orrery.set_preview(false, 2.5);
        orrery.advance_bodies(0.0, 1.0);
        assert_relative_eq!(orrery.position_of(earth).unwrap(), Point3::new(3.5, 0.0, 0.0));
    }
}
