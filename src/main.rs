use anyhow::Result;

mod camera;
mod chair;
mod color;
mod config;
mod customizer;
mod engine;
mod input;
mod material_manager;
mod model;
mod motion;
mod overlay;
mod page;
mod rendering;
mod scene_graph;
mod showcase;
mod tween;
mod window;

fn main() -> Result<()> {
    pretty_env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::CONFIG_FILE.to_string());
    let config = config::ShowcaseConfig::load(&path)?;

    window::run(config)
}
