// std
use std::sync::Arc;
// others
use log::debug;
// pbrt
use crate::core::camera::{Camera, CameraSample};
use crate::core::error::SceneError;
use crate::core::film::Film;
use crate::core::geometry::{Bounds2f, Point2f, Point2i, Point3f, Ray, Vector3f};
use crate::core::pbrt::Float;
use crate::core::sampling::concentric_sample_disk;
use crate::core::transform::Transform;

pub struct PerspectiveCamera {
    pub camera_to_world: Transform,
    pub film: Arc<Film>,
    pub raster_to_camera: Transform,
    pub lens_radius: Float,
    pub focal_distance: Float,
    /// Area of the image plane at z = 1
    pub a: Float,
}

impl PerspectiveCamera {
    pub fn new(
        camera_to_world: Transform,
        screen_window: Bounds2f,
        lens_radius: Float,
        focal_distance: Float,
        fov: Float,
        film: Arc<Film>,
    ) -> Result<Self, SceneError> {
        if !(fov > 0.0 && fov < 180.0) {
            return Err(SceneError::InvalidCamera(format!(
                "field of view {} outside (0, 180)",
                fov
            )));
        }
        if lens_radius < 0.0 || focal_distance <= 0.0 {
            return Err(SceneError::InvalidCamera(format!(
                "lens radius {} / focal distance {}",
                lens_radius, focal_distance
            )));
        }
        let camera_to_screen: Transform = Transform::perspective(fov, 1e-2, 1000.0)?;
        // projective camera screen transformations
        let scale1: Transform = Transform::scale(
            film.full_resolution.x as Float,
            film.full_resolution.y as Float,
            1.0,
        )?;
        let scale2: Transform = Transform::scale(
            1.0 / (screen_window.p_max.x - screen_window.p_min.x),
            1.0 / (screen_window.p_min.y - screen_window.p_max.y),
            1.0,
        )?;
        let translate: Transform = Transform::translate(&Vector3f {
            x: -screen_window.p_min.x,
            y: -screen_window.p_max.y,
            z: 0.0,
        });
        let screen_to_raster: Transform = scale1 * scale2 * translate;
        let raster_to_screen: Transform = screen_to_raster.inverse();
        let raster_to_camera: Transform = camera_to_screen.inverse() * raster_to_screen;
        // image plane bounds at z = 1
        let res: Point2i = film.full_resolution;
        let mut p_min: Point3f = raster_to_camera.transform_point(&Point3f::default());
        let mut p_max: Point3f = raster_to_camera.transform_point(&Point3f {
            x: res.x as Float,
            y: res.y as Float,
            z: 0.0,
        });
        p_min /= p_min.z;
        p_max /= p_max.z;
        let a: Float = ((p_max.x - p_min.x) * (p_max.y - p_min.y)).abs();
        Ok(PerspectiveCamera {
            camera_to_world,
            film,
            raster_to_camera,
            lens_radius,
            focal_distance,
            a,
        })
    }
    /// Camera at `eye` looking at `target`; `fov` is the field of view
    /// of the shorter image axis in degrees.
    pub fn look_at(
        eye: &Point3f,
        target: &Point3f,
        up: &Vector3f,
        fov: Float,
        lens_radius: Float,
        focal_distance: Float,
        film: Arc<Film>,
    ) -> Result<Self, SceneError> {
        let world_to_camera: Transform = Transform::look_at(eye, target, up)?;
        let frame: Float = film.full_resolution.x as Float / film.full_resolution.y as Float;
        let mut screen: Bounds2f = Bounds2f::default();
        if frame > 1.0 {
            screen.p_min.x = -frame;
            screen.p_max.x = frame;
            screen.p_min.y = -1.0;
            screen.p_max.y = 1.0;
        } else {
            screen.p_min.x = -1.0;
            screen.p_max.x = 1.0;
            screen.p_min.y = -1.0 / frame;
            screen.p_max.y = 1.0 / frame;
        }
        debug!(
            "perspective camera at {:?} looking at {:?}, fov {}",
            eye, target, fov
        );
        PerspectiveCamera::new(
            world_to_camera.inverse(),
            screen,
            lens_radius,
            focal_distance,
            fov,
            film,
        )
    }
}

impl Camera for PerspectiveCamera {
    fn generate_ray(&self, sample: &CameraSample) -> (Ray, Float) {
        let p_film: Point3f = Point3f {
            x: sample.p_film.x,
            y: sample.p_film.y,
            z: 0.0,
        };
        let p_camera: Point3f = self.raster_to_camera.transform_point(&p_film);
        let mut ray: Ray = Ray::new(Point3f::default(), Vector3f::from(p_camera).normalize());
        ray.time = sample.time;
        // depth of field
        if self.lens_radius > 0.0 as Float {
            let p_lens: Point2f = concentric_sample_disk(&sample.p_lens) * self.lens_radius;
            let ft: Float = self.focal_distance / ray.d.z;
            let p_focus: Point3f = ray.position(ft);
            ray.o = Point3f {
                x: p_lens.x,
                y: p_lens.y,
                z: 0.0 as Float,
            };
            ray.d = (p_focus - ray.o).normalize();
        }
        (self.camera_to_world.transform_ray(&ray), 1.0)
    }
    fn get_film(&self) -> Arc<Film> {
        self.film.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::boxfilter::BoxFilter;
    use approx::assert_relative_eq;

    fn camera(lens_radius: Float) -> PerspectiveCamera {
        let film: Arc<Film> = Arc::new(
            Film::full_frame(
                Point2i { x: 20, y: 10 },
                Box::new(BoxFilter::default()),
                "camera.png",
            )
            .unwrap(),
        );
        PerspectiveCamera::look_at(
            &Point3f {
                x: 0.0,
                y: 0.0,
                z: -5.0,
            },
            &Point3f::default(),
            &Vector3f {
                x: 0.0,
                y: 1.0,
                z: 0.0,
            },
            45.0,
            lens_radius,
            5.0,
            film,
        )
        .unwrap()
    }

    #[test]
    fn center_ray_points_at_target() {
        let cam: PerspectiveCamera = camera(0.0);
        let sample: CameraSample = CameraSample {
            p_film: Point2f { x: 10.0, y: 5.0 },
            p_lens: Point2f { x: 0.5, y: 0.5 },
            time: 0.0,
        };
        let (ray, weight) = cam.generate_ray(&sample);
        assert_eq!(weight, 1.0);
        assert_relative_eq!(ray.o.z, -5.0, epsilon = 1e-4);
        assert_relative_eq!(ray.d.z, 1.0, epsilon = 1e-4);
        assert_relative_eq!(ray.d.length(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn thin_lens_rays_meet_at_focal_plane() {
        let cam: PerspectiveCamera = camera(0.5);
        for u in &[0.1, 0.4, 0.9] {
            let sample: CameraSample = CameraSample {
                p_film: Point2f { x: 10.0, y: 5.0 },
                p_lens: Point2f { x: *u, y: 1.0 - *u },
                time: 0.0,
            };
            let (ray, _weight) = cam.generate_ray(&sample);
            let t: Float = (0.0 - ray.o.z) / ray.d.z;
            let p: Point3f = ray.position(t);
            assert_relative_eq!(p.x, 0.0, epsilon = 1e-3);
            assert_relative_eq!(p.y, 0.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn invalid_fov_is_rejected() {
        let film: Arc<Film> = Arc::new(
            Film::full_frame(
                Point2i { x: 2, y: 2 },
                Box::new(BoxFilter::default()),
                "x.png",
            )
            .unwrap(),
        );
        assert!(PerspectiveCamera::new(
            Transform::default(),
            Bounds2f::default(),
            0.0,
            1.0,
            0.0,
            film
        )
        .is_err());
    }
}
