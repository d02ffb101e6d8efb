use std::collections::HashMap;

use kiss3d::camera::Camera;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::scene::SceneNode;
use kiss3d::window::Window;
use nalgebra::{Point2, Point3, Translation3, UnitQuaternion};

use super::camera::TrackingCamera;
use super::controller::Controller;
use super::renderer::RingRenderer;
use crate::model::{Body, BodyID, Pose, Scene};

pub struct View {
    // Object state
    scene: Scene,
    body_spheres: HashMap<BodyID, SceneNode>,
    // Camera
    camera: TrackingCamera,
    // Misc
    renderer: RingRenderer,
    show_rings: bool,
}

impl View {
    pub fn new(scene: Scene, window: &mut Window) -> Self {
        let camera = TrackingCamera::new(scene.camera());

        // Create objects for bodies
        let mut body_spheres = HashMap::new();
        for body in scene.orrery().bodies() {
            let sphere = Self::create_body_object(window, body);
            body_spheres.insert(body.id, sphere);
        }

        let mut view = Self {
            scene,
            body_spheres,
            camera,
            renderer: RingRenderer::new(),
            show_rings: true,
        };
        view.update_scene_objects();

        view
    }

    fn create_body_object(window: &mut Window, body: &Body) -> SceneNode {
        // Unit sphere; the body's scale does the rest
        let mut sphere = window.add_sphere(1.0);
        let color = &body.info.color;
        sphere.set_color(color.x, color.y, color.z);
        sphere
    }

    pub fn update_state_by(&mut self, dt: f64) {
        // Run the frame, then move scene objects to the right places
        self.scene.step(dt);
        self.update_scene_objects();
    }

    pub fn time_scale(&self) -> f64 {
        self.scene.config().time_scale
    }

    pub fn set_time_scale(&mut self, time_scale: f64) {
        self.scene.set_time_scale(time_scale);
    }

    pub fn toggle_preview(&mut self) {
        let preview = !self.scene.config().preview;
        self.scene.set_preview(preview);
    }

    pub fn toggle_rings(&mut self) {
        self.show_rings = !self.show_rings;
    }

    fn update_scene_objects(&mut self) {
        // does some nice conversions
        fn set_pose_helper(obj: &mut SceneNode, pose: &Pose) {
            let position: Point3<f32> = nalgebra::convert(pose.position);
            let orientation: UnitQuaternion<f32> = nalgebra::convert(pose.orientation);
            let scale = pose.scale as f32;
            obj.set_local_translation(Translation3::from(position));
            obj.set_local_rotation(orientation);
            obj.set_local_scale(scale, scale, scale);
        }

        for (id, sphere) in self.body_spheres.iter_mut() {
            match self.scene.orrery().get_body(*id) {
                Some(body) => set_pose_helper(sphere, &body.pose),
                None => sphere.set_visible(false),
            }
        }
        self.camera.set_pose(self.scene.camera());
    }

    pub fn prerender_scene(&mut self, window: &mut Window, controller: &Controller) {
        if self.show_rings {
            self.draw_rings();
        }

        // Draw text
        let default_font = kiss3d::text::Font::default();
        let text_color = Point3::new(1.0, 1.0, 1.0);
        window.draw_text(
            &self.left_hand_text(),
            &Point2::origin(),
            60.0,
            &default_font,
            &text_color,
        );
        window.draw_text(
            &self.time_summary_text(controller),
            // no idea why i have to multiply by 2.0, but there it is
            &Point2::new(window.width() as f32 * 2.0 - 600.0, 0.0),
            60.0,
            &default_font,
            &text_color,
        );
    }

    fn draw_rings(&mut self) {
        let orrery = self.scene.orrery();
        for body in orrery.bodies() {
            let orbiting = body.orbiter().map_or(false, |o| !o.mode().is_preview());
            if !orbiting {
                continue;
            }
            let anchor = match body.anchor().and_then(|id| orrery.position_of(id)) {
                Some(p) => p,
                None => continue,
            };
            let params = match orrery.table().lookup(body.name()) {
                Ok(params) => params,
                Err(_) => continue,
            };
            if params.orbit_radius <= 0.0 {
                continue;
            }

            // Dim the body color so the body itself stands out
            let color = Point3::from(body.info.color.coords * 0.5);
            self.renderer
                .draw_ring(anchor, &params.orbit_axis, params.orbit_radius, color);
        }
    }

    fn left_hand_text(&self) -> String {
        let orrery = self.scene.orrery();
        let tracking = match self.scene.tracker() {
            Some(tracker) => tracker
                .targets()
                .iter()
                .map(|id| match orrery.get_body(*id) {
                    Some(body) => body.name().to_owned(),
                    None => String::from("<gone>"),
                })
                .collect::<Vec<_>>()
                .join(", "),
            None => String::from("nothing"),
        };

        format!(
            "Tracking: {}
Mode: {}
Bodies: {}",
            tracking,
            if self.scene.config().preview {
                "preview"
            } else {
                "orbiting"
            },
            orrery.bodies().count(),
        )
    }

    fn time_summary_text(&self, controller: &Controller) -> String {
        let stats = controller.stats();
        format!(
            "Time: {:.1} s{}
Time scale: {}x
Frames stepped: {}
FPS: {:.0}",
            self.scene.elapsed(),
            if controller.is_paused() { " (paused)" } else { "" },
            self.time_scale(),
            stats.stepped_frames(),
            stats.fps(),
        )
    }

    pub fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (Some(&mut self.camera), None, Some(&mut self.renderer), None)
    }
}
