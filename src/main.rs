use anyhow::{Context, Result};
use clap::Parser;
use log::info;

mod cli;
mod logger;

use cli::Args;
use logger::init_logger;
use marchtrace::config::RenderConfig;
use marchtrace::output::save_image;
use marchtrace::renderer::{FrameInputs, FrameRenderer};

/// Load the config file, if any, and apply command line overrides on top.
fn resolve_config(args: &Args) -> Result<RenderConfig> {
    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => RenderConfig::default(),
    };

    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(samples) = args.samples_per_pixel {
        config.params.samples_per_pixel = samples;
    }
    if let Some(bounces) = args.bounces {
        config.params.bounces = bounces;
    }
    if let Some(seed) = args.seed {
        config.params.seed = seed;
    }
    if let Some(time) = args.time {
        config.time = time;
    }

    config.validate().context("invalid render settings")?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logger(args.debug_level.clone().into());

    // Log application startup with version information
    info!("MarchTrace - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));

    let config = resolve_config(&args)?;
    info!(
        "Image resolution: {}x{}, mode: {}, samples per pixel: {}",
        config.width,
        config.height,
        config.mode.as_str(),
        config.params.samples_per_pixel
    );

    let scene = config.scene().context("building scene")?;
    let camera = config.camera().context("building camera")?;
    let skybox = config.skybox();
    info!("Scene: {} spheres at t = {}", scene.spheres().len(), config.time);

    let inputs = FrameInputs {
        scene: &scene,
        params: &config.params,
        skybox: &skybox,
        camera: &camera,
        mode: config.mode,
    };

    let mut renderer = FrameRenderer::new().with_progress(!args.quiet);
    let frame = renderer
        .render(&inputs, config.width, config.height)
        .context("rendering frame")?;

    save_image(frame, &args.output).with_context(|| format!("writing {}", args.output.display()))?;
    Ok(())
}
