use nalgebra::{Point3, Vector3};
use tracing::debug;

use super::error::MotionError;
use super::pose::Pose;
use crate::math::geometry::{centroid, look_rotation};

/// Anything that can say where a target currently is.
///
/// Returning None means the target is gone, at least for this tick.
pub trait PositionSource<K> {
    fn position_of(&self, target: &K) -> Option<Point3<f64>>;
}

impl<K, F> PositionSource<K> for F
where
    F: Fn(&K) -> Option<Point3<f64>>,
{
    fn position_of(&self, target: &K) -> Option<Point3<f64>> {
        self(target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackStatus {
    /// First tick: the offset was recorded and the camera left alone.
    Captured,
    /// The camera was moved; `missing` targets were left out of the centroid.
    Following { missing: usize },
}

/// Keeps a camera at a fixed offset from the centroid of a group of targets,
/// looking at that centroid.
///
/// The offset is whatever it was on the first tick, and never changes after
/// that. If the targets spread out or bunch up, the camera follows the
/// centroid but doesn't back off or close in.
#[derive(Debug, Clone)]
pub struct CentroidTracker<K> {
    targets: Vec<K>,
    initial_offset: Option<Vector3<f64>>,
}

impl<K> CentroidTracker<K> {
    pub fn new(targets: Vec<K>) -> Result<Self, MotionError> {
        if targets.is_empty() {
            return Err(MotionError::EmptyTargetSet);
        }
        Ok(CentroidTracker {
            targets,
            initial_offset: None,
        })
    }

    pub fn targets(&self) -> &[K] {
        &self.targets
    }

    pub fn is_initialized(&self) -> bool {
        self.initial_offset.is_some()
    }

    /// Camera position minus centroid, as of the first tick
    pub fn initial_offset(&self) -> Option<&Vector3<f64>> {
        self.initial_offset.as_ref()
    }

    /// The mean of the targets that are currently available, along with how
    /// many were not.
    pub fn centroid(&self, source: &impl PositionSource<K>) -> (Option<Point3<f64>>, usize) {
        let positions: Vec<_> = self
            .targets
            .iter()
            .filter_map(|target| source.position_of(target))
            .collect();
        let missing = self.targets.len() - positions.len();
        (centroid(positions), missing)
    }

    /// Moves the camera to follow the group. Must run after every target has
    /// moved for this frame, or the camera lags a frame behind.
    ///
    /// If no target is available, the camera stays where it is.
    pub fn tick(
        &mut self,
        source: &impl PositionSource<K>,
        camera: &mut Pose,
    ) -> Result<TrackStatus, MotionError> {
        let (center, missing) = self.centroid(source);
        let center = center.ok_or(MotionError::AllTargetsUnavailable(self.targets.len()))?;
        if missing > 0 {
            debug!(missing, "leaving unavailable targets out of the centroid");
        }

        let offset = match self.initial_offset {
            Some(offset) => offset,
            None => {
                self.initial_offset = Some(camera.position - center);
                return Ok(TrackStatus::Captured);
            }
        };

        camera.position = center + offset;

        // Prefer world-up. If we're looking straight up or down, keep whatever
        // up the camera had before, and failing that, anything that works.
        let prior_up = camera.orientation * Vector3::y();
        let ups = [Vector3::y(), prior_up, Vector3::z(), Vector3::x()];
        // With no offset there's nothing to look along, so keep the old heading
        if let Some(orientation) = look_rotation(&(center - camera.position), &ups) {
            camera.orientation = orientation;
        }

        Ok(TrackStatus::Following { missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use nalgebra::UnitQuaternion;

    fn source(positions: &[Option<Point3<f64>>]) -> impl Fn(&usize) -> Option<Point3<f64>> + '_ {
        move |k: &usize| positions.get(*k).copied().flatten()
    }

    #[test]
    fn test_empty_targets() {
        assert_eq!(
            CentroidTracker::<usize>::new(vec![]).unwrap_err(),
            MotionError::EmptyTargetSet
        );
    }

    #[test]
    fn test_first_tick_only_captures() {
        let mut tracker = CentroidTracker::new(vec![0, 1]).unwrap();
        let positions = [Some(Point3::new(0.0, 0.0, 0.0)), Some(Point3::new(10.0, 0.0, 0.0))];
        let before = Pose::at(Point3::new(5.0, 0.0, -20.0));
        let mut camera = before;

        let status = tracker.tick(&source(&positions), &mut camera).unwrap();
        assert_eq!(status, TrackStatus::Captured);
        assert_eq!(camera, before);
        assert_relative_eq!(*tracker.initial_offset().unwrap(), Vector3::new(0.0, 0.0, -20.0));
    }

    #[test]
    fn test_offset_survives_rigid_motion() {
        let mut tracker = CentroidTracker::new(vec![0, 1, 2]).unwrap();
        let mut positions = [
            Some(Point3::new(1.0, 2.0, 3.0)),
            Some(Point3::new(-4.0, 0.0, 8.0)),
            Some(Point3::new(0.5, -1.0, 2.0)),
        ];
        let mut camera = Pose::at(Point3::new(7.0, 3.0, -2.0));
        tracker.tick(&source(&positions), &mut camera).unwrap();
        tracker.tick(&source(&positions), &mut camera).unwrap();
        let start = camera.position;

        let shift = Vector3::new(3.0, -1.5, 12.25);
        for pos in positions.iter_mut() {
            *pos = pos.map(|p| p + shift);
        }
        tracker.tick(&source(&positions), &mut camera).unwrap();

        assert_relative_eq!(camera.position, start + shift, epsilon = 1e-12);
    }

    #[test]
    fn test_offset_ignores_spread() {
        let mut tracker = CentroidTracker::new(vec![0, 1]).unwrap();
        let mut camera = Pose::at(Point3::new(0.0, 0.0, -10.0));
        let close = [Some(Point3::new(-1.0, 0.0, 0.0)), Some(Point3::new(1.0, 0.0, 0.0))];
        tracker.tick(&source(&close), &mut camera).unwrap();

        // Same centroid, much wider spread: camera doesn't back off
        let wide = [Some(Point3::new(-50.0, 0.0, 0.0)), Some(Point3::new(50.0, 0.0, 0.0))];
        tracker.tick(&source(&wide), &mut camera).unwrap();
        assert_relative_eq!(camera.position, Point3::new(0.0, 0.0, -10.0));
    }

    #[test]
    fn test_missing_targets() {
        let mut tracker = CentroidTracker::new(vec![0, 1]).unwrap();
        let mut camera = Pose::at(Point3::new(5.0, 0.0, -20.0));
        let both = [Some(Point3::new(0.0, 0.0, 0.0)), Some(Point3::new(10.0, 0.0, 0.0))];
        tracker.tick(&source(&both), &mut camera).unwrap();

        // One goes away; the centroid is just the other one
        let one = [None, Some(Point3::new(10.0, 0.0, 0.0))];
        let status = tracker.tick(&source(&one), &mut camera).unwrap();
        assert_eq!(status, TrackStatus::Following { missing: 1 });
        assert_relative_eq!(camera.position, Point3::new(10.0, 0.0, -20.0));

        // Both go away; hold still
        let held = camera;
        let none = [None, None];
        assert_eq!(
            tracker.tick(&source(&none), &mut camera),
            Err(MotionError::AllTargetsUnavailable(2))
        );
        assert_eq!(camera, held);
    }

    #[test]
    fn test_all_missing_before_capture() {
        let mut tracker = CentroidTracker::new(vec![0]).unwrap();
        let mut camera = Pose::at(Point3::new(1.0, 1.0, 1.0));
        assert!(tracker.tick(&source(&[None]), &mut camera).is_err());
        assert!(!tracker.is_initialized());
    }

    #[test]
    fn test_looking_straight_down_keeps_prior_up() {
        let mut tracker = CentroidTracker::new(vec![0]).unwrap();
        // Pitched a little, so the old up leans towards -Z
        let prior = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -0.5);
        let mut camera = Pose::at(Point3::new(0.0, 10.0, 0.0)).with_orientation(prior);
        let target = [Some(Point3::origin())];

        tracker.tick(&source(&target), &mut camera).unwrap();
        tracker.tick(&source(&target), &mut camera).unwrap();

        assert_relative_eq!(camera.orientation * Vector3::z(), -Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(camera.orientation * Vector3::y(), -Vector3::z(), epsilon = 1e-12);
        assert!(camera.orientation.coords.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn test_looking_straight_down_with_useless_prior_up() {
        let mut tracker = CentroidTracker::new(vec![0]).unwrap();
        let prior = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.7);
        let mut camera = Pose::at(Point3::new(0.0, -4.0, 0.0)).with_orientation(prior);
        let target = [Some(Point3::origin())];

        tracker.tick(&source(&target), &mut camera).unwrap();
        tracker.tick(&source(&target), &mut camera).unwrap();

        // Old up was +Y too, so it falls through to +Z
        assert_relative_eq!(camera.orientation * Vector3::z(), Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(camera.orientation * Vector3::y(), Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_zero_offset_keeps_heading() {
        let mut tracker = CentroidTracker::new(vec![0]).unwrap();
        let heading = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.2);
        let mut camera = Pose::at(Point3::new(2.0, 2.0, 2.0)).with_orientation(heading);

        tracker.tick(&source(&[Some(Point3::new(2.0, 2.0, 2.0))]), &mut camera).unwrap();
        tracker.tick(&source(&[Some(Point3::new(3.0, 2.0, 2.0))]), &mut camera).unwrap();

        assert_relative_eq!(camera.position, Point3::new(3.0, 2.0, 2.0));
        assert_eq!(camera.orientation, heading);
    }
}
