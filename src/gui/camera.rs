use std::f32::consts::PI;

use kiss3d::camera::Camera;
use kiss3d::event::{Action, Key, WindowEvent};
use kiss3d::resource::ShaderUniform;
use kiss3d::window::Canvas;
use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, UnitQuaternion, Vector3};

use crate::model::Pose;

const KEY_CAMERA_ZOOM_IN: Key = Key::Equals;
const KEY_CAMERA_ZOOM_OUT: Key = Key::Minus;

const KEY_ZOOM_STEP: f32 = 1.2;

// A camera with no mind of its own. The scene decides where it is and which
// way it faces every frame; all this does is turn that pose into matrices,
// and let the user widen or narrow the field of view.
//
// The pose looks down its local +Z axis, with local +Y as up.
pub struct TrackingCamera {
    // -- pose --
    eye: Point3<f32>,
    orientation: UnitQuaternion<f32>,
    // -- perspective --
    width: u32,
    height: u32,
    fovy: f32,
    // -- knobs to fiddle with --
    scroll_ratio: f32,
    fovy_limits: (f32, f32),
    znear: f32,
    zfar: f32,
}

impl TrackingCamera {
    pub fn new(pose: &Pose) -> Self {
        let mut camera = TrackingCamera {
            eye: Point3::origin(),
            orientation: UnitQuaternion::identity(),
            width: 800,
            height: 600,
            fovy: PI / 4.0,
            scroll_ratio: 1.1,
            fovy_limits: (PI / 64.0, PI * 0.75),
            znear: 0.01,
            zfar: 1024.0,
        };
        camera.set_pose(pose);
        camera
    }

    pub fn set_pose(&mut self, pose: &Pose) {
        self.eye = nalgebra::convert(pose.position);
        self.orientation = nalgebra::convert(pose.orientation);
    }

    pub fn fovy(&self) -> f32 {
        self.fovy
    }

    pub fn zoom(&mut self, factor: f32) {
        self.fovy = nalgebra::clamp(self.fovy * factor, self.fovy_limits.0, self.fovy_limits.1);
    }

    fn target(&self) -> Point3<f32> {
        self.eye + self.orientation * Vector3::z()
    }

    fn projection(&self) -> Perspective3<f32> {
        Perspective3::new(
            self.width as f32 / self.height as f32,
            self.fovy,
            self.znear,
            self.zfar,
        )
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection().into_inner()
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        self.view_transform().to_homogeneous()
    }
}

impl Camera for TrackingCamera {
    fn handle_event(&mut self, _canvas: &Canvas, event: &WindowEvent) {
        match *event {
            WindowEvent::Scroll(_, off, _) => {
                // scroll up == zoom in
                if off < 0.0 {
                    self.zoom(self.scroll_ratio);
                } else if off > 0.0 {
                    self.zoom(self.scroll_ratio.recip())
                }
            }
            WindowEvent::FramebufferSize(w, h) => {
                self.width = w;
                self.height = h;
            }
            WindowEvent::Key(KEY_CAMERA_ZOOM_IN, Action::Press, _) => {
                self.zoom(KEY_ZOOM_STEP.recip())
            }
            WindowEvent::Key(KEY_CAMERA_ZOOM_OUT, Action::Press, _) => self.zoom(KEY_ZOOM_STEP),
            _ => {}
        }
    }

    fn eye(&self) -> Point3<f32> {
        self.eye
    }

    fn view_transform(&self) -> Isometry3<f32> {
        let up = self.orientation * Vector3::y();
        Isometry3::look_at_rh(&self.eye, &self.target(), &up)
    }

    fn transformation(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    fn inverse_transformation(&self) -> Matrix4<f32> {
        self.transformation()
            .try_inverse()
            .unwrap_or_else(Matrix4::identity)
    }

    fn clip_planes(&self) -> (f32, f32) {
        (self.znear, self.zfar)
    }

    fn update(&mut self, _canvas: &Canvas) {}

    fn upload(
        &self,
        _: usize,
        proj: &mut ShaderUniform<Matrix4<f32>>,
        view: &mut ShaderUniform<Matrix4<f32>>,
    ) {
        proj.upload(&self.projection_matrix());
        view.upload(&self.view_matrix());
    }
}
