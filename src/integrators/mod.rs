//! The tile based render harness shared by all sampler integrators,
//! plus the integrators themselves.
//!
//! ## Path Tracing
//!
//! Path tracing incrementally generates paths of scattering events
//! starting at the camera and ending at light sources in the scene.
//! At every non-specular vertex one light is sampled explicitly and
//! combined with the BSDF sample through multiple importance
//! sampling.
//!
//! ![Path Tracing](/doc/img/cornell_box_pbrt_rust_path.png)

// std
use std::io::Stderr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
// others
use log::{info, warn};
use pbr::ProgressBar;
// pbrt
use crate::blockqueue::BlockQueue;
use crate::core::camera::{Camera, CameraSample};
use crate::core::config::RenderConfig;
use crate::core::error::SceneError;
use crate::core::film::{Film, FilmTile};
use crate::core::geometry::{Bounds2i, Point2i, Vector2i};
use crate::core::integrator::SamplerIntegrator;
use crate::core::pbrt::{Float, Spectrum};
use crate::core::sampler::Sampler;
use crate::core::scene::Scene;

pub mod path;

/// How a call to [`render`] ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RenderStatus {
    Completed,
    /// The cancel flag was raised; only `tiles_done` of `tiles_total`
    /// tiles made it into the film.
    Cancelled { tiles_done: usize, tiles_total: usize },
}

/// Replace radiance no pixel should ever receive by black.
fn sanitize_radiance(l: Spectrum, pixel: &Point2i, sample: i64) -> Spectrum {
    if l.has_nans() {
        warn!(
            "Not-a-number radiance value returned for pixel ({}, {}), sample {}. Setting to black.",
            pixel.x, pixel.y, sample
        );
        return Spectrum::default();
    }
    let y: Float = l.y();
    if y < -10.0e-5 as Float {
        warn!(
            "Negative luminance value, {}, returned for pixel ({}, {}), sample {}. Setting to black.",
            y, pixel.x, pixel.y, sample
        );
        return Spectrum::default();
    }
    if l.has_infs() || y.is_infinite() {
        warn!(
            "Infinite luminance value returned for pixel ({}, {}), sample {}. Setting to black.",
            pixel.x, pixel.y, sample
        );
        return Spectrum::default();
    }
    l
}

/// Render one tile; `None` when the cancel flag was raised before
/// the tile was complete.
fn render_tile<'a>(
    tile_bounds: &Bounds2i,
    film: &'a Film,
    scene: &Scene,
    camera: &Arc<dyn Camera + Send + Sync>,
    sampler: &mut Sampler,
    integrator: &(dyn SamplerIntegrator + Send + Sync),
    cancel: &AtomicBool,
) -> Option<FilmTile<'a>> {
    let mut film_tile: FilmTile = film.get_film_tile(tile_bounds);
    for pixel in tile_bounds {
        if cancel.load(Ordering::Relaxed) {
            return None;
        }
        sampler.start_pixel(&pixel);
        loop {
            let camera_sample: CameraSample = sampler.get_camera_sample(&pixel);
            let (ray, ray_weight) = camera.generate_ray(&camera_sample);
            let mut l: Spectrum = Spectrum::default();
            if ray_weight > 0.0 as Float {
                l = integrator.li(&ray, scene, sampler, 0_i32);
            }
            l = sanitize_radiance(l, &pixel, sampler.get_current_sample_number());
            film_tile.add_sample(&camera_sample.p_film, l, ray_weight);
            if !sampler.start_next_sample() {
                break;
            }
        }
    }
    Some(film_tile)
}

/// Render the camera's film. The integrator is preprocessed once,
/// then worker threads pull tiles from a shared queue and send the
/// finished tiles to this thread, which merges them into the film.
/// Writing the image is left to the caller.
pub fn render(
    scene: &Scene,
    camera: &Arc<dyn Camera + Send + Sync>,
    sampler: &Sampler,
    integrator: &mut (dyn SamplerIntegrator + Send + Sync),
    config: &RenderConfig,
    cancel: &Arc<AtomicBool>,
) -> Result<RenderStatus, SceneError> {
    config.validate()?;
    let film: Arc<Film> = camera.get_film();
    let sample_bounds: Bounds2i = film.get_sample_bounds();
    integrator.preprocess(scene);
    let integrator: &(dyn SamplerIntegrator + Send + Sync) = integrator;
    let sample_extent: Vector2i = sample_bounds.diagonal();
    let tile_size: i32 = config.tile_size;
    let n_tiles: Point2i = Point2i {
        x: (sample_extent.x + tile_size - 1) / tile_size,
        y: (sample_extent.y + tile_size - 1) / tile_size,
    };
    let num_cores: usize = config.num_cores();
    info!(
        "Rendering {} tiles with {} thread(s) ...",
        n_tiles.x * n_tiles.y,
        num_cores
    );
    let block_queue: BlockQueue = BlockQueue::new((n_tiles.x as u32, n_tiles.y as u32));
    let tiles_total: usize = block_queue.len();
    let bq = &block_queue;
    let film_ref: &Film = &film;
    let tiles_done: usize = crossbeam::scope(|scope| {
        let (tile_tx, tile_rx) = crossbeam_channel::bounded(num_cores);
        for _ in 0..num_cores {
            let tile_tx = tile_tx.clone();
            let cancel: &AtomicBool = cancel;
            scope.spawn(move |_| {
                while let Some((x, y)) = bq.next() {
                    if cancel.load(Ordering::Relaxed) {
                        break;
                    }
                    let tile: Point2i = Point2i {
                        x: x as i32,
                        y: y as i32,
                    };
                    let seed: i32 = tile.y * n_tiles.x + tile.x;
                    let mut tile_sampler: Sampler = sampler.clone_with_seed(seed as u64);
                    let x0: i32 = sample_bounds.p_min.x + tile.x * tile_size;
                    let x1: i32 = std::cmp::min(x0 + tile_size, sample_bounds.p_max.x);
                    let y0: i32 = sample_bounds.p_min.y + tile.y * tile_size;
                    let y1: i32 = std::cmp::min(y0 + tile_size, sample_bounds.p_max.y);
                    let tile_bounds: Bounds2i =
                        Bounds2i::new(Point2i { x: x0, y: y0 }, Point2i { x: x1, y: y1 });
                    match render_tile(
                        &tile_bounds,
                        film_ref,
                        scene,
                        camera,
                        &mut tile_sampler,
                        integrator,
                        cancel,
                    ) {
                        Some(film_tile) => {
                            // the collector is gone only if it panicked
                            if tile_tx.send(film_tile).is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
            });
        }
        drop(tile_tx);
        let mut progress: Option<ProgressBar<Stderr>> = if config.progress {
            Some(ProgressBar::on(std::io::stderr(), tiles_total as u64))
        } else {
            None
        };
        let mut merged: usize = 0;
        for film_tile in tile_rx.iter() {
            film_ref.merge_film_tile(&film_tile);
            merged += 1;
            if let Some(pb) = progress.as_mut() {
                pb.inc();
            }
        }
        if let Some(pb) = progress.as_mut() {
            pb.finish();
        }
        merged
    })
    .map_err(|_| SceneError::WorkerPanic)?;
    if tiles_done < tiles_total {
        warn!(
            "Rendering cancelled after {} of {} tiles",
            tiles_done, tiles_total
        );
        return Ok(RenderStatus::Cancelled {
            tiles_done,
            tiles_total,
        });
    }
    Ok(RenderStatus::Completed)
}
