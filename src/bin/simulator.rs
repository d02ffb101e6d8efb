use std::path::PathBuf;

use clap::Parser;
use kiss3d::light::Light;
use kiss3d::window::Window;
use tracing::info;

use rust_orrery::file::{read_table, TableFileError};
use rust_orrery::gui::Simulation;
use rust_orrery::model::{MotionTable, Scene, SceneConfig, DEFAULT_PREVIEW_SCALE};

/// The whole solar system, with the camera riding along behind the Earth and
/// the Moon.
#[derive(Debug, Parser)]
struct Args {
    /// Multiplies every rate in the table
    #[arg(long, default_value_t = 1.0)]
    time_scale: f64,
    /// Start with orbits suspended, so bodies only spin in place
    #[arg(long)]
    preview: bool,
    /// Size of every orbiting body while previewing
    #[arg(long, default_value_t = DEFAULT_PREVIEW_SCALE)]
    preview_scale: f64,
    /// Motion table to load instead of the built-in one
    #[arg(long)]
    table: Option<PathBuf>,
    /// Start paused; press space to go
    #[arg(long)]
    paused: bool,
}

fn main() -> Result<(), TableFileError> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let table = match &args.table {
        Some(path) => read_table(path)?,
        None => MotionTable::builtin(),
    };
    info!(bodies = table.len(), "loaded motion table");

    let config = SceneConfig {
        time_scale: args.time_scale,
        preview: args.preview,
        preview_scale: args.preview_scale,
    };
    let scene = Scene::from_table(table, config);

    let mut window = Window::new("Orrery");
    window.set_light(Light::StickToCamera);
    window.set_framerate_limit(Some(60));

    let simulation = Simulation::new(scene, &mut window, args.paused);
    window.render_loop(simulation);
    Ok(())
}
