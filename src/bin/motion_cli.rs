use std::path::PathBuf;

use clap::Parser;

use rust_orrery::file::{read_table, TableFileError};
use rust_orrery::model::{MotionTable, Scene, SceneConfig};

/// Prints a body's motion parameters, and optionally where it ends up after
/// running the solar system for a while.
#[derive(Debug, Parser)]
struct Args {
    name: String,
    /// Number of frames to run
    #[arg(long, default_value_t = 0)]
    ticks: usize,
    /// Seconds per frame
    #[arg(long, default_value_t = 1.0)]
    dt: f64,
    #[arg(long, default_value_t = 1.0)]
    time_scale: f64,
    /// Motion table to load instead of the built-in one
    #[arg(long)]
    table: Option<PathBuf>,
}

fn main() -> Result<(), TableFileError> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let table = match &args.table {
        Some(path) => read_table(path)?,
        None => MotionTable::builtin(),
    };

    let mut names: Vec<&str> = table
        .iter()
        .map(|(name, _)| name)
        .filter(|name| name.to_lowercase() == args.name.to_lowercase())
        .collect();
    names.sort_unstable();
    if names.is_empty() {
        println!("No body named {} in the table", args.name);
        return Ok(());
    }

    for name in names.iter() {
        let params = match table.lookup(name) {
            Ok(params) => params,
            Err(_) => continue,
        };
        println!("Motion parameters for {}", name);
        println!("- Orbit rate: {} deg/s", params.orbit_rate);
        println!("- Orbit axis: {:?}", params.orbit_axis.as_slice());
        println!("- Orbit radius: {}", params.orbit_radius);
        println!("- Spin rate: {} deg/s", params.spin_rate);
        println!("- Spin axis: {:?}", params.spin_axis.as_slice());
        println!("- Display scale: {}", params.display_scale);
        println!();
    }

    if args.ticks == 0 {
        return Ok(());
    }

    let config = SceneConfig {
        time_scale: args.time_scale,
        ..SceneConfig::default()
    };
    let mut scene = Scene::from_table(table.clone(), config);
    for _ in 0..args.ticks {
        scene.step(args.dt);
    }

    println!("After {} s:", scene.elapsed());
    for name in names.iter() {
        let body = match scene.orrery().find_body(name).and_then(|id| scene.orrery().get_body(id)) {
            Some(body) => body,
            None => {
                println!("- {} is not part of the solar system scene", name);
                continue;
            }
        };
        let (axis, angle) = body
            .pose
            .orientation
            .axis_angle()
            .map(|(axis, angle)| (axis.into_inner(), angle.to_degrees()))
            .unwrap_or_else(|| (nalgebra::Vector3::y(), 0.0));
        println!("- {} position: {:?}", name, body.position().coords.as_slice());
        println!("  orbit angle: {:?}", body.orbiter().and_then(|o| o.angle()));
        println!("  spun {:.3} deg about {:?}", angle, axis.as_slice());
    }
    let camera = scene.camera();
    println!("- Camera position: {:?}", camera.position.coords.as_slice());
    Ok(())
}
