//! Kinematic motion for a little solar system.
//!
//! Nothing here integrates forces. Each body has a row in a [MotionTable]
//! with fixed orbit and spin rates, and every tick recomputes where it is from
//! how much time has passed. The pieces:
//! - [Orbiter] moves a body around its anchor and spins it, or in preview
//!   mode, only spins it
//! - [AxialSpin] spins a body with no orbit at all
//! - [CentroidTracker] keeps a camera framed on a group of bodies
//! - [Orrery] and [Scene] hold everything and run frames in the right order

mod error;
mod motion;
mod orbiter;
pub mod orrery;
mod pose;
mod scene;
mod spin;
mod tracker;

pub use error::MotionError;
pub use motion::{MotionParameters, MotionTable};
pub use orbiter::{MotionMode, OrbitState, OrbitStep, Orbiter, DEFAULT_PREVIEW_SCALE};
pub use orrery::{Attachment, Body, BodyID, BodyInfo, BodyMotion, Orrery};
pub use pose::Pose;
pub use scene::{FrameReport, Scene, SceneConfig, PLANETS};
pub use spin::{spin_delta, spin_step, AxialSpin};
pub use tracker::{CentroidTracker, PositionSource, TrackStatus};
