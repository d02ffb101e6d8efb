use std::fs;
use std::path::Path;

use clap::Parser;
use plotters::prelude::*;
use tracing::warn;

use rust_orrery::model::{Scene, SceneConfig, PLANETS};

/// Plots the paths of the planets and the camera, seen from above.
#[derive(Debug, Parser)]
struct Args {
    /// Where to write the picture
    #[arg(long, default_value = "plots/trace.png")]
    output: String,
    /// Simulated seconds to run
    #[arg(long, default_value_t = 400.0)]
    seconds: f64,
    #[arg(long, default_value_t = 10.0)]
    time_scale: f64,
}

const DT: f64 = 1.0 / 30.0;

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config = SceneConfig {
        time_scale: args.time_scale,
        ..SceneConfig::default()
    };
    let mut scene = Scene::solar_system(config);

    let ids: Vec<_> = PLANETS
        .iter()
        .filter_map(|name| scene.orrery().find_body(name))
        .collect();
    let mut paths: Vec<Vec<(f32, f32)>> = vec![vec![]; ids.len()];
    let mut camera_path = vec![];

    let n_steps = (args.seconds / DT).ceil() as usize;
    for _ in 0..n_steps {
        let report = scene.step(DT);
        if !report.errors.is_empty() {
            warn!(errors = report.errors.len(), "frame had errors");
        }
        for (path, id) in paths.iter_mut().zip(ids.iter()) {
            if let Some(p) = scene.orrery().position_of(*id) {
                path.push((p.x as f32, p.z as f32));
            }
        }
        let eye = scene.camera().position;
        camera_path.push((eye.x as f32, eye.z as f32));
    }

    draw_plot(&args.output, &paths, &camera_path)
}

fn draw_plot(
    name: &str,
    paths: &[Vec<(f32, f32)>],
    camera_path: &[(f32, f32)],
) -> Result<(), Box<dyn std::error::Error>> {
    let extent = paths
        .iter()
        .flatten()
        .chain(camera_path.iter())
        .map(|(x, z)| x.abs().max(z.abs()))
        .fold(1.0f32, f32::max)
        * 1.1;

    if let Some(dir) = Path::new(name).parent() {
        fs::create_dir_all(dir)?;
    }

    let root = BitMapBackend::new(name, (640, 640)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(-extent..extent, -extent..extent)?;

    chart.configure_mesh().draw()?;

    for (idx, path) in paths.iter().enumerate() {
        chart.draw_series(LineSeries::new(path.iter().copied(), &Palette99::pick(idx)))?;
    }
    chart.draw_series(LineSeries::new(camera_path.iter().copied(), &BLACK))?;

    Ok(())
}
