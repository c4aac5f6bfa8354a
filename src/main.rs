use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use raylib::prelude::*;
use serde::Deserialize;

mod app;

use app::App;
use gloam_io::JsonWallStore;
use gloam_session::{Session, SessionConfig};

/// Fog-of-war overlay for tabletop battle maps.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Battle map image (png/jpg) to annotate.
    map: PathBuf,
    /// Wall layout file. Created on first save.
    #[arg(long, default_value = "walls.json")]
    walls: PathBuf,
    /// Optional TOML config overriding session defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Import a previously exported wall layout before starting.
    #[arg(long)]
    import: Option<PathBuf>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct AppConfig {
    sight_radius_ft: Option<f32>,
    target_fps: Option<u32>,
}

fn load_config(path: &PathBuf) -> Result<AppConfig, Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    Ok(toml::from_str(&text)?)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let cfg = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    let mut session_cfg = SessionConfig::default();
    if let Some(feet) = cfg.sight_radius_ft {
        session_cfg.sight_radius_ft = feet;
    }

    // Import replaces the stored layout before the session sees it.
    let walls = match &args.import {
        Some(path) => {
            let imported = gloam_io::import_walls(&fs::read_to_string(path)?)?;
            gloam_io::save_walls(&args.walls, &imported)?;
            log::info!("imported {} walls from {}", imported.len(), path.display());
            imported
        }
        None => gloam_io::load_walls(&args.walls),
    };

    let map_path = args
        .map
        .to_str()
        .ok_or("map path is not valid UTF-8")?
        .to_string();
    let image = Image::load_image(&map_path)?;
    let (w, h) = (image.width(), image.height());
    if w <= 0 || h <= 0 {
        return Err(format!("map image {map_path} has zero area").into());
    }

    let (mut rl, thread) = raylib::init()
        .size(w, h)
        .title("Gloam: Fog of War")
        .build();
    rl.set_target_fps(cfg.target_fps.unwrap_or(60));

    let store = JsonWallStore::new(&args.walls);
    let mut session = Session::new(session_cfg, Box::new(store));
    session.attach_surface(w as u32, h as u32)?;
    session.install_walls(walls);

    let mut app = App::new(&mut rl, &thread, &image, session, args.walls.clone())?;
    while !rl.window_should_close() {
        app.step(&mut rl);
        let mut d = rl.begin_drawing(&thread);
        app.render(&mut d);
    }
    Ok(())
}
