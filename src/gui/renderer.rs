use kiss3d::camera::Camera;
use kiss3d::renderer::{LineRenderer, Renderer};
use nalgebra::{Point3, Vector3};

use crate::math::geometry::axis_rotation;

const RING_SEGMENTS: usize = 180;

/// Draws the path each orbiting body follows.
pub struct RingRenderer {
    line_renderer: LineRenderer,
}

impl RingRenderer {
    pub fn new() -> Self {
        RingRenderer {
            line_renderer: LineRenderer::new(),
        }
    }

    /// Queues up one orbit's worth of line segments for the next render.
    pub fn draw_ring(
        &mut self,
        anchor: Point3<f64>,
        axis: &Vector3<f64>,
        radius: f64,
        color: Point3<f32>,
    ) {
        let f = |degrees: f64| {
            let pt = anchor + axis_rotation(axis, degrees) * Vector3::x() * radius;
            nalgebra::convert::<_, Point3<f32>>(pt)
        };
        draw_path(
            &mut self.line_renderer,
            path_iter_parametric(f, 0.0, 360.0, RING_SEGMENTS),
            &color,
        );
    }
}

impl Renderer for RingRenderer {
    fn render(&mut self, pass: usize, camera: &mut dyn Camera) {
        self.line_renderer.render(pass, camera);
    }
}

pub fn path_iter_parametric<F>(
    f: F,
    t_start: f64,
    t_end: f64,
    num_segments: usize,
) -> impl Iterator<Item = Point3<f32>>
where
    F: Fn(f64) -> Point3<f32>,
{
    // At least one segment, or there's no path
    let num_segments = num_segments.max(1);
    (0..=num_segments)
        .map(move |i| i as f64 / num_segments as f64)
        // u ranges from 0 to 1 (inclusive)
        .map(move |u| t_start + u * (t_end - t_start))
        .map(f)
}

pub fn draw_path<I: Iterator<Item = Point3<f32>>>(
    line_renderer: &mut LineRenderer,
    points: I,
    color: &Point3<f32>,
) {
    let mut prev_pt = None;
    for pt in points {
        if let Some(prev_pt) = prev_pt {
            line_renderer.draw_line(prev_pt, pt, *color);
        }
        prev_pt = Some(pt);
    }
}
