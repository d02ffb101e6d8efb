use nalgebra::{Point3, UnitQuaternion, Vector3};
use tracing::{info, warn};

use super::error::MotionError;
use super::motion::MotionTable;
use super::orbiter::{MotionMode, DEFAULT_PREVIEW_SCALE};
use super::orrery::{BodyID, BodyInfo, Orrery};
use super::pose::Pose;
use super::spin::AxialSpin;
use super::tracker::{CentroidTracker, TrackStatus};

pub const PLANETS: [&str; 8] = [
    "Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune",
];

const MOON_SPIN_RATE: f64 = 0.55;
const MOON_SCALE: f64 = 0.012;
const MOON_OFFSET: [f64; 3] = [0.3, 0.02, 0.0];

/// Where the camera starts, relative to the Earth
const CAMERA_OFFSET: [f64; 3] = [-0.4, 0.6, -1.8];

/// Knobs that apply to the whole scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    /// Multiplies every angular rate
    pub time_scale: f64,
    pub preview: bool,
    /// Scale of every orbiting body while in preview
    pub preview_scale: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            time_scale: 1.0,
            preview: false,
            preview_scale: DEFAULT_PREVIEW_SCALE,
        }
    }
}

impl SceneConfig {
    fn mode(&self) -> MotionMode {
        if self.preview {
            MotionMode::preview(self.preview_scale)
        } else {
            MotionMode::orbiting()
        }
    }
}

/// What happened during one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub errors: Vec<MotionError>,
    /// None if there's no tracker or it couldn't find anything to look at
    pub camera: Option<TrackStatus>,
}

/// An orrery plus a camera that follows some of its bodies.
///
/// [Scene::step] is the one place that runs a frame, so the camera always
/// sees positions from the same frame it's drawn in.
pub struct Scene {
    orrery: Orrery,
    camera: Pose,
    tracker: Option<CentroidTracker<BodyID>>,
    config: SceneConfig,
    elapsed: f64,
    // So we only complain about each problem once, not every frame
    last_errors: Vec<MotionError>,
}

impl Scene {
    pub fn new(orrery: Orrery, camera: Pose, config: SceneConfig) -> Self {
        let mut scene = Scene {
            orrery,
            camera,
            tracker: None,
            config,
            elapsed: 0.0,
            last_errors: vec![],
        };
        if config.preview {
            scene.set_preview(true);
        }
        scene
    }

    /// The sun, the planets, the belt, and the moon, with the camera on the
    /// Earth and the moon.
    pub fn solar_system(config: SceneConfig) -> Self {
        Self::from_table(MotionTable::builtin(), config)
    }

    /// Same as [Scene::solar_system], but with motion from a different table.
    pub fn from_table(table: MotionTable, config: SceneConfig) -> Self {
        let mut orrery = Orrery::new(table);
        let mode = config.mode();

        let sun_info = body_info("Sun", [1.0, 0.85, 0.4]);
        let sun = match orrery.table().lookup("Sun") {
            Ok(params) => {
                let spin = AxialSpin::new(params.spin_rate, params.spin_axis);
                let pose = Pose::default().with_scale(params.display_scale);
                orrery.add_spinning_body(sun_info, spin, pose)
            }
            Err(err) => {
                warn!(%err, "the sun will hold still");
                orrery.add_fixed_body(sun_info, Pose::default())
            }
        };

        for name in PLANETS.iter() {
            orrery.add_orbiting_body(body_info(name, planet_color(name)), Some(sun), mode);
        }
        orrery.add_orbiting_body(body_info("AsteroidBelt", [0.45, 0.4, 0.35]), Some(sun), mode);

        let moon = orrery.add_spinning_body(
            body_info("Moon", [0.7, 0.7, 0.7]),
            AxialSpin::shadowed(MOON_SPIN_RATE, Vector3::y(), UnitQuaternion::identity()),
            Pose::default().with_scale(MOON_SCALE),
        );

        let mut targets = vec![moon];
        let mut camera = Pose::at(Point3::from(Vector3::from(CAMERA_OFFSET)));
        if let Some(earth) = orrery.find_body("Earth") {
            orrery.attach(moon, earth, Vector3::from(MOON_OFFSET));
            targets.insert(0, earth);
            if let Some(p) = orrery.position_of(earth) {
                camera.position = p + Vector3::from(CAMERA_OFFSET);
            }
        }

        let mut scene = Scene::new(orrery, camera, config);
        if let Err(err) = scene.track(targets) {
            warn!(%err, "camera will not follow anything");
        }
        scene
    }

    /// Swaps in a new tracker for `targets`, dropping the old one along with
    /// its offset. The new tracker captures its own offset on its first step
    /// and keeps it from then on.
    pub fn track(&mut self, targets: Vec<BodyID>) -> Result<(), MotionError> {
        self.tracker = Some(CentroidTracker::new(targets)?);
        Ok(())
    }

    pub fn orrery(&self) -> &Orrery {
        &self.orrery
    }

    pub fn orrery_mut(&mut self) -> &mut Orrery {
        &mut self.orrery
    }

    pub fn camera(&self) -> &Pose {
        &self.camera
    }

    pub fn tracker(&self) -> Option<&CentroidTracker<BodyID>> {
        self.tracker.as_ref()
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Seconds of frame time stepped so far, before time scaling
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Ignored, with a warning, if `time_scale` is infinite or NaN.
    pub fn set_time_scale(&mut self, time_scale: f64) {
        if time_scale.is_finite() {
            self.config.time_scale = time_scale;
        } else {
            warn!(time_scale, "ignoring bad time scale");
        }
    }

    pub fn set_preview(&mut self, preview: bool) {
        self.config.preview = preview;
        self.orrery.set_preview(preview, self.config.preview_scale);
    }

    /// Runs one frame: every body, then the camera.
    ///
    /// A negative or non-finite `dt` is treated as zero, and so is a
    /// non-finite time scale: the bodies hold still for that frame.
    pub fn step(&mut self, dt: f64) -> FrameReport {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            warn!(dt, "ignoring bad timestep");
            0.0
        };
        self.elapsed += dt;

        let time_scale = self.config.time_scale;
        let mut errors = if time_scale.is_finite() {
            self.orrery.advance_bodies(dt, time_scale)
        } else {
            warn!(time_scale, "ignoring bad time scale");
            vec![]
        };

        let camera = match &mut self.tracker {
            Some(tracker) => match tracker.tick(&self.orrery, &mut self.camera) {
                Ok(status) => {
                    if status == TrackStatus::Captured {
                        info!(offset = ?tracker.initial_offset(), "camera offset captured");
                    }
                    Some(status)
                }
                Err(err) => {
                    errors.push(err);
                    None
                }
            },
            None => None,
        };

        for err in errors.iter() {
            if !self.last_errors.contains(err) {
                warn!(%err, "motion update skipped");
            }
        }
        self.last_errors = errors.clone();

        FrameReport { errors, camera }
    }
}

fn body_info(name: &str, color: [f32; 3]) -> BodyInfo {
    BodyInfo {
        name: name.to_owned(),
        color: Point3::from(color),
    }
}

fn planet_color(name: &str) -> [f32; 3] {
    match name {
        "Mercury" => [0.6, 0.55, 0.5],
        "Venus" => [0.9, 0.75, 0.4],
        "Earth" => [0.2, 0.4, 0.8],
        "Mars" => [0.8, 0.3, 0.15],
        "Jupiter" => [0.8, 0.7, 0.5],
        "Saturn" => [0.85, 0.75, 0.5],
        "Uranus" => [0.5, 0.75, 0.85],
        "Neptune" => [0.25, 0.35, 0.8],
        _ => [1.0, 1.0, 1.0],
    }
}
