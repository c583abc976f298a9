//! The **Film** models the sensor of the simulated camera. Workers
//! accumulate filtered samples into private **FilmTile**s, which are
//! merged into the shared pixel buffer once a tile is complete, so
//! the buffer only sees whole tiles.
//!
//! Pixels store linear RGB; gamma correction and quantization only
//! happen in `write_image`.

// std
use std::path::Path;
use std::sync::RwLock;
// others
use image;
use log::info;
// pbrt
use crate::core::error::{ConfigError, SceneError};
use crate::core::filter::Filter;
use crate::core::geometry::{bnd2_intersect_bnd2i, pnt2_ceil, pnt2_floor, pnt2_inside_exclusivei};
use crate::core::geometry::{pnt2_max_pnt2i, pnt2_min_pnt2i};
use crate::core::geometry::{Bounds2f, Bounds2i, Point2f, Point2i, Vector2f};
use crate::core::pbrt::{clamp_t, gamma_correct};
use crate::core::pbrt::{Float, Spectrum};

pub const FILTER_TABLE_WIDTH: usize = 16;

#[derive(Debug, Default, Copy, Clone)]
pub struct Pixel {
    rgb: [Float; 3],
    filter_weight_sum: Float,
}

#[derive(Debug, Default, Copy, Clone)]
pub struct FilmTilePixel {
    contrib_sum: Spectrum,
    filter_weight_sum: Float,
}

pub struct FilmTile<'a> {
    pub pixel_bounds: Bounds2i,
    filter_radius: Vector2f,
    inv_filter_radius: Vector2f,
    filter_table: &'a [Float; FILTER_TABLE_WIDTH * FILTER_TABLE_WIDTH],
    pixels: Vec<FilmTilePixel>,
    max_sample_luminance: Float,
}

impl<'a> FilmTile<'a> {
    pub fn new(
        pixel_bounds: Bounds2i,
        filter_radius: Vector2f,
        filter_table: &'a [Float; FILTER_TABLE_WIDTH * FILTER_TABLE_WIDTH],
        max_sample_luminance: Float,
    ) -> Self {
        FilmTile {
            pixel_bounds,
            filter_radius,
            inv_filter_radius: Vector2f {
                x: 1.0 / filter_radius.x,
                y: 1.0 / filter_radius.y,
            },
            filter_table,
            pixels: vec![FilmTilePixel::default(); pixel_bounds.area().max(0) as usize],
            max_sample_luminance,
        }
    }
    /// Splat radiance `l` at film position `p_film` into every pixel
    /// within the filter support.
    pub fn add_sample(&mut self, p_film: &Point2f, l: Spectrum, sample_weight: Float) {
        let mut l: Spectrum = l;
        if l.y() > self.max_sample_luminance {
            l = l * (self.max_sample_luminance / l.y());
        }
        // sample's raster bounds
        let p_film_discrete: Point2f = *p_film - Vector2f { x: 0.5, y: 0.5 };
        let p0f: Point2f = pnt2_ceil(p_film_discrete - self.filter_radius);
        let p1f: Point2f = pnt2_floor(p_film_discrete + self.filter_radius);
        let p0: Point2i = pnt2_max_pnt2i(
            Point2i {
                x: p0f.x as i32,
                y: p0f.y as i32,
            },
            self.pixel_bounds.p_min,
        );
        let p1: Point2i = pnt2_min_pnt2i(
            Point2i {
                x: p1f.x as i32 + 1,
                y: p1f.y as i32 + 1,
            },
            self.pixel_bounds.p_max,
        );
        if p1.x <= p0.x || p1.y <= p0.y {
            return;
        }
        let table_size: Float = FILTER_TABLE_WIDTH as Float;
        let ifx: Vec<usize> = (p0.x..p1.x)
            .map(|x| {
                let fx: Float = ((x as Float - p_film_discrete.x)
                    * self.inv_filter_radius.x
                    * table_size)
                    .abs();
                fx.floor().min(table_size - 1.0) as usize
            })
            .collect();
        let ify: Vec<usize> = (p0.y..p1.y)
            .map(|y| {
                let fy: Float = ((y as Float - p_film_discrete.y)
                    * self.inv_filter_radius.y
                    * table_size)
                    .abs();
                fy.floor().min(table_size - 1.0) as usize
            })
            .collect();
        for y in p0.y..p1.y {
            for x in p0.x..p1.x {
                let offset: usize =
                    ify[(y - p0.y) as usize] * FILTER_TABLE_WIDTH + ifx[(x - p0.x) as usize];
                let filter_weight: Float = self.filter_table[offset];
                let idx: usize = self.get_pixel_index(x, y);
                let pixel: &mut FilmTilePixel = &mut self.pixels[idx];
                pixel.contrib_sum += l * (sample_weight * filter_weight);
                pixel.filter_weight_sum += filter_weight;
            }
        }
    }
    fn get_pixel_index(&self, x: i32, y: i32) -> usize {
        let width: i32 = self.pixel_bounds.p_max.x - self.pixel_bounds.p_min.x;
        ((y - self.pixel_bounds.p_min.y) * width + (x - self.pixel_bounds.p_min.x)) as usize
    }
}

pub struct Film {
    /// The overall resolution of the image in pixels
    pub full_resolution: Point2i,
    /// A filter function
    pub filter: Box<dyn Filter + Sync + Send>,
    /// The filename of the output image
    pub filename: String,
    /// A crop window that may specify a subset of the image to render
    pub cropped_pixel_bounds: Bounds2i,
    pixels: RwLock<Vec<Pixel>>,
    filter_table: [Float; FILTER_TABLE_WIDTH * FILTER_TABLE_WIDTH],
    scale: Float,
    max_sample_luminance: Float,
}

impl Film {
    pub fn new(
        resolution: Point2i,
        crop_window: Bounds2f,
        filter: Box<dyn Filter + Sync + Send>,
        filename: String,
        scale: Float,
        max_sample_luminance: Float,
    ) -> Result<Self, SceneError> {
        if resolution.x <= 0 || resolution.y <= 0 {
            return Err(ConfigError::ZeroResolution {
                x: resolution.x,
                y: resolution.y,
            }
            .into());
        }
        let cropped_pixel_bounds: Bounds2i = Bounds2i {
            p_min: Point2i {
                x: (resolution.x as Float * crop_window.p_min.x).ceil() as i32,
                y: (resolution.y as Float * crop_window.p_min.y).ceil() as i32,
            },
            p_max: Point2i {
                x: (resolution.x as Float * crop_window.p_max.x).ceil() as i32,
                y: (resolution.y as Float * crop_window.p_max.y).ceil() as i32,
            },
        };
        if cropped_pixel_bounds.area() <= 0 {
            return Err(ConfigError::ZeroResolution {
                x: cropped_pixel_bounds.diagonal().x,
                y: cropped_pixel_bounds.diagonal().y,
            }
            .into());
        }
        // tabulate the filter over one quadrant of its support
        let mut filter_table: [Float; FILTER_TABLE_WIDTH * FILTER_TABLE_WIDTH] =
            [0.0; FILTER_TABLE_WIDTH * FILTER_TABLE_WIDTH];
        let filter_radius: Vector2f = filter.get_radius();
        for y in 0..FILTER_TABLE_WIDTH {
            for x in 0..FILTER_TABLE_WIDTH {
                let p: Point2f = Point2f {
                    x: (x as Float + 0.5) * filter_radius.x / FILTER_TABLE_WIDTH as Float,
                    y: (y as Float + 0.5) * filter_radius.y / FILTER_TABLE_WIDTH as Float,
                };
                filter_table[y * FILTER_TABLE_WIDTH + x] = filter.evaluate(&p);
            }
        }
        Ok(Film {
            full_resolution: resolution,
            filter,
            filename,
            cropped_pixel_bounds,
            pixels: RwLock::new(vec![
                Pixel::default();
                cropped_pixel_bounds.area() as usize
            ]),
            filter_table,
            scale,
            max_sample_luminance,
        })
    }
    /// The whole image without luminance clamping.
    pub fn full_frame(
        resolution: Point2i,
        filter: Box<dyn Filter + Sync + Send>,
        filename: &str,
    ) -> Result<Self, SceneError> {
        Film::new(
            resolution,
            Bounds2f {
                p_min: Point2f { x: 0.0, y: 0.0 },
                p_max: Point2f { x: 1.0, y: 1.0 },
            },
            filter,
            filename.to_string(),
            1.0,
            Float::INFINITY,
        )
    }
    /// Pixel area that camera samples have to cover, which extends
    /// past the cropped image by the filter radius.
    pub fn get_sample_bounds(&self) -> Bounds2i {
        let half_pixel: Vector2f = Vector2f { x: 0.5, y: 0.5 };
        let radius: Vector2f = self.filter.get_radius();
        let f: Point2f =
            pnt2_floor(Point2f::from(self.cropped_pixel_bounds.p_min) + half_pixel - radius);
        let c: Point2f =
            pnt2_ceil(Point2f::from(self.cropped_pixel_bounds.p_max) - half_pixel + radius);
        Bounds2i {
            p_min: Point2i {
                x: f.x as i32,
                y: f.y as i32,
            },
            p_max: Point2i {
                x: c.x as i32,
                y: c.y as i32,
            },
        }
    }
    /// A tile covering every image pixel that samples from
    /// `sample_bounds` may contribute to.
    pub fn get_film_tile(&self, sample_bounds: &Bounds2i) -> FilmTile {
        let half_pixel: Vector2f = Vector2f { x: 0.5, y: 0.5 };
        let radius: Vector2f = self.filter.get_radius();
        let p_min: Point2f = Point2f::from(sample_bounds.p_min) - half_pixel - radius;
        let p_max: Point2f = Point2f::from(sample_bounds.p_max) - half_pixel + radius;
        let p0: Point2i = Point2i {
            x: p_min.x.ceil() as i32,
            y: p_min.y.ceil() as i32,
        };
        let p1: Point2i = Point2i {
            x: p_max.x.floor() as i32,
            y: p_max.y.floor() as i32,
        } + Point2i { x: 1, y: 1 };
        let tile_pixel_bounds: Bounds2i = bnd2_intersect_bnd2i(
            &Bounds2i {
                p_min: p0,
                p_max: p1,
            },
            &self.cropped_pixel_bounds,
        );
        FilmTile::new(
            tile_pixel_bounds,
            radius,
            &self.filter_table,
            self.max_sample_luminance,
        )
    }
    fn pixel_offset(&self, p: &Point2i) -> usize {
        let width: i32 = self.cropped_pixel_bounds.p_max.x - self.cropped_pixel_bounds.p_min.x;
        ((p.x - self.cropped_pixel_bounds.p_min.x)
            + (p.y - self.cropped_pixel_bounds.p_min.y) * width) as usize
    }
    pub fn merge_film_tile(&self, tile: &FilmTile) {
        let mut pixels = match self.pixels.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        for pixel in &tile.pixel_bounds {
            if !pnt2_inside_exclusivei(pixel, &self.cropped_pixel_bounds) {
                continue;
            }
            let tile_pixel: &FilmTilePixel = &tile.pixels[tile.get_pixel_index(pixel.x, pixel.y)];
            let merge_pixel: &mut Pixel = &mut pixels[self.pixel_offset(&pixel)];
            for i in 0..3 {
                merge_pixel.rgb[i] += tile_pixel.contrib_sum[i];
            }
            merge_pixel.filter_weight_sum += tile_pixel.filter_weight_sum;
        }
    }
    pub fn get_pixel(&self, p: &Point2i) -> Option<Pixel> {
        if !pnt2_inside_exclusivei(*p, &self.cropped_pixel_bounds) {
            return None;
        }
        let pixels = match self.pixels.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Some(pixels[self.pixel_offset(p)])
    }
    /// Final linear RGB values in row-major order, normalized by the
    /// filter weights and scaled; negative values are clamped to zero.
    pub fn to_rgb(&self) -> Vec<Float> {
        let pixels = match self.pixels.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut rgb: Vec<Float> = Vec::with_capacity(3 * pixels.len());
        for pixel in pixels.iter() {
            let inv_wt: Float = if pixel.filter_weight_sum != 0.0 as Float {
                1.0 as Float / pixel.filter_weight_sum
            } else {
                0.0 as Float
            };
            for c in pixel.rgb.iter() {
                rgb.push((c * inv_wt).max(0.0 as Float) * self.scale);
            }
        }
        rgb
    }
    /// Write an 8-bit sRGB PNG (or whatever format the file extension
    /// selects) to `self.filename`.
    pub fn write_image(&self) -> Result<(), SceneError> {
        let rgb: Vec<Float> = self.to_rgb();
        let diagonal: Point2i = Point2i {
            x: self.cropped_pixel_bounds.diagonal().x,
            y: self.cropped_pixel_bounds.diagonal().y,
        };
        let (width, height) = (diagonal.x as u32, diagonal.y as u32);
        info!(
            "Writing image {:?} with bounds {:?}",
            self.filename, self.cropped_pixel_bounds
        );
        let buffer: Vec<u8> = rgb
            .iter()
            .map(|v| {
                if v.is_finite() {
                    clamp_t(255.0 as Float * gamma_correct(*v) + 0.5, 0.0, 255.0) as u8
                } else {
                    0_u8
                }
            })
            .collect();
        image::save_buffer(
            Path::new(&self.filename),
            &buffer,
            width,
            height,
            image::ColorType::Rgb8,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::boxfilter::BoxFilter;

    fn film(x: i32, y: i32) -> Film {
        Film::full_frame(
            Point2i { x, y },
            Box::new(BoxFilter::default()),
            "test.png",
        )
        .unwrap()
    }

    #[test]
    fn zero_resolution_is_rejected() {
        assert!(Film::full_frame(
            Point2i { x: 0, y: 4 },
            Box::new(BoxFilter::default()),
            "x.png"
        )
        .is_err());
    }

    #[test]
    fn merged_tile_averages_samples() {
        let film: Film = film(4, 4);
        let bounds: Bounds2i = film.get_sample_bounds();
        assert_eq!(bounds.p_min, Point2i { x: 0, y: 0 });
        assert_eq!(bounds.p_max, Point2i { x: 4, y: 4 });
        let mut tile: FilmTile = film.get_film_tile(&bounds);
        tile.add_sample(&Point2f { x: 1.5, y: 2.5 }, Spectrum::new(2.0), 1.0);
        tile.add_sample(&Point2f { x: 1.5, y: 2.5 }, Spectrum::new(4.0), 1.0);
        film.merge_film_tile(&tile);
        let rgb: Vec<Float> = film.to_rgb();
        let idx: usize = 3 * (2 * 4 + 1);
        assert!((rgb[idx] - 3.0).abs() < 1e-5);
        assert_eq!(rgb[0], 0.0);
        assert!(film.get_pixel(&Point2i { x: 4, y: 0 }).is_none());
    }

    #[test]
    fn bright_samples_are_clamped() {
        let film: Film = Film::new(
            Point2i { x: 2, y: 2 },
            Bounds2f {
                p_min: Point2f { x: 0.0, y: 0.0 },
                p_max: Point2f { x: 1.0, y: 1.0 },
            },
            Box::new(BoxFilter::default()),
            "clamp.png".to_string(),
            1.0,
            1.0,
        )
        .unwrap();
        let mut tile: FilmTile = film.get_film_tile(&film.get_sample_bounds());
        tile.add_sample(&Point2f { x: 0.5, y: 0.5 }, Spectrum::new(100.0), 1.0);
        film.merge_film_tile(&tile);
        let rgb: Vec<Float> = film.to_rgb();
        assert!((rgb[0] - 1.0).abs() < 1e-4);
    }
}
