use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use log::{error, info};

use asgraph::layout::SimulationParameters;
use asgraph::renderer::{render_page, RenderConfig, RenderState};
use asgraph::shared::DefaultPaths;

fn load_params(path: &Path) -> Result<SimulationParameters, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Artifact location as the page will request it
fn data_url(page: &Path, artifact: &Path) -> String {
    let relative = page
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .and_then(|dir| artifact.strip_prefix(dir).ok())
        .unwrap_or(artifact);
    relative.to_string_lossy().replace('\\', "/")
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let artifact = env::var("ASGRAPH_ARTIFACT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DefaultPaths::ARTIFACT));
    let page = env::var("ASGRAPH_PAGE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DefaultPaths::PAGE));

    let mut config = RenderConfig::default().with_data_url(&data_url(&page, &artifact));
    if let Ok(params_path) = env::var("ASGRAPH_LAYOUT") {
        match load_params(Path::new(&params_path)) {
            Ok(params) => config = config.with_params(params),
            Err(e) => {
                error!("Could not read layout parameters from {}: {}", params_path, e);
                process::exit(1);
            }
        }
    }

    let mut state = RenderState::load_path(&artifact, config);
    if let Some(scene) = state.scene_mut() {
        let ticks = scene.run_to_steady_state();
        info!("Layout settled after {} ticks", ticks);
    }

    if let Some(parent) = page.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Could not create {:?}: {}", parent, e);
                process::exit(1);
            }
        }
    }
    if let Err(e) = fs::write(&page, render_page(&state)) {
        error!("Could not write {:?}: {}", page, e);
        process::exit(1);
    }
    info!("Wrote {:?}", page);
    info!("The page animates through ./pkg/asgraph.js, built with `wasm-pack build --target web --no-default-features --features web`");

    if state.error().is_some() {
        process::exit(1);
    }
}
