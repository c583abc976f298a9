// std
use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
// others
use clap::Parser;
use log::{info, warn};
// pbrt
use rs_pathtracer::accelerators::bvh::SplitMethod;
use rs_pathtracer::core::config::{FilterKind, RenderConfig, SamplerKind, SceneKind};
use rs_pathtracer::core::lightdistrib::LightSampleStrategy;
use rs_pathtracer::core::pbrt::Float;
use rs_pathtracer::core::sampler::Sampler;
use rs_pathtracer::integrators::path::PathIntegrator;
use rs_pathtracer::integrators::{render, RenderStatus};
use rs_pathtracer::scenes::create_scene;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Render one of the built-in scenes with the path tracer.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Scene to render
    #[arg(long, value_enum, default_value_t = SceneKind::CornellBox)]
    scene: SceneKind,
    /// Image width in pixels
    #[arg(short = 'x', long, default_value_t = 400)]
    width: i32,
    /// Image height in pixels
    #[arg(short = 'y', long, default_value_t = 400)]
    height: i32,
    /// Samples per pixel
    #[arg(short = 's', long, default_value_t = 16)]
    spp: u32,
    #[arg(long, value_enum, default_value_t = SamplerKind::Stratified)]
    sampler: SamplerKind,
    /// Pixel reconstruction filter
    #[arg(long, value_enum, default_value_t = FilterKind::Box)]
    filter: FilterKind,
    /// Maximum number of bounces
    #[arg(short = 'd', long, default_value_t = 5)]
    max_depth: u32,
    /// Russian roulette kicks in below this path throughput
    #[arg(long, default_value_t = 1.0)]
    rr_threshold: Float,
    #[arg(long, value_enum, default_value_t = LightSampleStrategy::Power)]
    light_strategy: LightSampleStrategy,
    #[arg(long, value_enum, default_value_t = SplitMethod::SAH)]
    split_method: SplitMethod,
    #[arg(long, default_value_t = 4)]
    max_prims_in_node: usize,
    /// use specified number of threads for rendering (0 = all cores)
    #[arg(short = 't', long = "nthreads", default_value_t = 0)]
    nthreads: usize,
    #[arg(long, default_value_t = 16)]
    tile_size: i32,
    /// Stop rendering after this many seconds and keep what is done
    #[arg(long)]
    time_limit: Option<u64>,
    /// Hide the progress bar
    #[arg(short = 'q', long)]
    quiet: bool,
    /// Output image
    #[arg(short = 'o', long, default_value = "pathtracer.png")]
    output: String,
}

impl Cli {
    fn to_config(&self) -> RenderConfig {
        RenderConfig {
            x_resolution: self.width,
            y_resolution: self.height,
            samples_per_pixel: self.spp,
            sampler: self.sampler,
            filter: self.filter,
            max_depth: self.max_depth,
            rr_threshold: self.rr_threshold,
            light_sample_strategy: self.light_strategy,
            split_method: self.split_method,
            max_prims_in_node: self.max_prims_in_node,
            num_threads: self.nthreads,
            tile_size: self.tile_size,
            output: self.output.clone(),
            scene: self.scene,
            progress: !self.quiet,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Cli::parse();
    let config: RenderConfig = args.to_config();
    config.validate()?;
    info!(
        "rs_pathtracer version {} [Detected {} cores]",
        VERSION,
        num_cpus::get()
    );
    let (scene, camera) = create_scene(&config)?;
    let sampler: Sampler = config.create_sampler();
    let mut integrator: PathIntegrator =
        PathIntegrator::new(config.max_depth, config.rr_threshold, config.light_sample_strategy);
    let cancel: Arc<AtomicBool> = Arc::new(AtomicBool::new(false));
    if let Some(seconds) = args.time_limit {
        let cancel = cancel.clone();
        // the watchdog is detached; it dies with the process
        thread::spawn(move || {
            thread::sleep(Duration::from_secs(seconds));
            cancel.store(true, Ordering::Relaxed);
        });
    }
    let start: Instant = Instant::now();
    let status: RenderStatus = render(&scene, &camera, &sampler, &mut integrator, &config, &cancel)?;
    match status {
        RenderStatus::Completed => info!("Rendering took {:.3?}", start.elapsed()),
        RenderStatus::Cancelled {
            tiles_done,
            tiles_total,
        } => warn!(
            "Time limit reached after {:.3?}: {} of {} tiles rendered",
            start.elapsed(),
            tiles_done,
            tiles_total
        ),
    }
    camera.get_film().write_image()?;
    Ok(())
}
