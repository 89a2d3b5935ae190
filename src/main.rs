use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use model_viewer::{ViewerApp, ViewerConfig};

#[derive(Parser, Debug)]
#[command(name = "model-viewer")]
#[command(about = "View .gltf, .glb and .babylon models")]
struct Cli {
    /// Model to open on startup
    path: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // info+ for the viewer, quiet GPU backends; RUST_LOG overrides
    let default = "info,wgpu_hal=warn,wgpu_core=warn,naga=warn";
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp_secs()
        .try_init();

    let cli = Cli::parse();

    ViewerApp::new(ViewerConfig::default())
        .with_initial_file(cli.path)
        .run()
        .context("model viewer stopped with an error")
}
