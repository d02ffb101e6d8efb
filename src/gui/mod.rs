use kiss3d::camera::Camera;
use kiss3d::event::EventManager;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::window::{State, Window};

use self::controller::Controller;
use self::view::View;
use crate::model::Scene;

mod camera;
mod controller;
mod renderer;
mod view;

/// Fixed frame time; the window runs at roughly 60 fps.
pub const FRAME_TIME: f64 = 1.0 / 60.0;

pub struct Simulation {
    view: View,
    controller: Controller,
}

impl Simulation {
    pub fn new(scene: Scene, window: &mut Window, paused: bool) -> Self {
        Self {
            view: View::new(scene, window),
            controller: Controller::new(paused),
        }
    }

    /// Handles input, then moves the scene on by one frame unless paused.
    /// Returns whether the scene moved.
    fn advance_frame(&mut self, mut events: EventManager) -> bool {
        for event in events.iter() {
            self.controller.process_event(event, &mut self.view);
        }

        let stepped = !self.controller.is_paused();
        if stepped {
            self.view.update_state_by(FRAME_TIME);
        }
        stepped
    }
}

impl State for Simulation {
    fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        self.view.cameras_and_effect_and_renderer()
    }

    fn step(&mut self, window: &mut Window) {
        let stepped = self.advance_frame(window.events());
        self.view.prerender_scene(window, &self.controller);
        self.controller.stats_mut().record_frame(stepped);
    }
}
