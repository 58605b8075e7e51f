use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

use glint_core::{load_scene, Scene};
use glint_math::Camera;
use glint_renderer::{
    kernel_by_name, prepare_geometry, AccumulatorConfig, FrameBuffer, Intersector,
    ProgressiveAccumulator, RayTracer, RenderConfig, SceneSnapshot,
};

mod cli;
mod demo;
mod logger;

use cli::{Args, Mode};
use logger::init_logger;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let (scene, camera) = match &args.scene {
        Some(path) => load_scene(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => {
            info!("No scene given, rendering the built-in demo scene");
            demo::demo_scene()
        }
    };
    info!(
        "Scene '{}': {} objects, {} lights",
        scene.name,
        scene.object_count(),
        scene.light_count()
    );

    let config = RenderConfig {
        resolution_scale: args.scale,
        proxy_shape: args.proxy.into(),
        ..Default::default()
    };

    let start = Instant::now();
    let image = match args.mode {
        Mode::Static => render_static(&scene, &camera, args, config)?,
        Mode::Progressive => render_progressive(&scene, &camera, args, &config)?,
    };
    info!("Rendered {}x{} in {:.2?}", image.width(), image.height(), start.elapsed());

    save_png(&image, &args.output)
}

fn render_static(
    scene: &Scene,
    camera: &Camera,
    args: &Args,
    config: RenderConfig,
) -> Result<image::RgbaImage> {
    let mut tracer = RayTracer::new(config);
    tracer
        .start(scene, camera, args.size)
        .context("Static render failed")?;
    tracer
        .frame()
        .map(FrameBuffer::to_image)
        .context("Static render produced no frame")
}

fn render_progressive(
    scene: &Scene,
    camera: &Camera,
    args: &Args,
    config: &RenderConfig,
) -> Result<image::RgbaImage> {
    let resolution = config.resolution(args.size)?;
    let primitives = prepare_geometry(scene, config.proxy_shape);
    let intersector = Intersector::new(&primitives);
    let snapshot = SceneSnapshot::from_config(&intersector, scene, config);

    let kernel = kernel_by_name(&args.kernel, args.threads)?;
    let mut accumulator = ProgressiveAccumulator::new(
        kernel,
        AccumulatorConfig {
            jitter: !args.no_jitter,
            seed: args.seed,
        },
    );
    info!(
        "Accumulating {} passes with the {} kernel",
        args.passes,
        accumulator.kernel_name()
    );

    for pass in 0..args.passes.max(1) {
        let pass_start = Instant::now();
        accumulator
            .accumulate(camera, &snapshot, resolution)
            .with_context(|| format!("Pass {pass} failed"))?;
        debug!(
            "Pass {} done in {:.2?} (offset {:?})",
            pass,
            pass_start.elapsed(),
            accumulator.last_offset()
        );
    }

    Ok(accumulator.frame().to_image())
}

fn save_png(image: &image::RgbaImage, path: &Path) -> Result<()> {
    image
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Saved {}", path.display());
    Ok(())
}
