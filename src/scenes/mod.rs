//! Built-in scenes, each returned together with a camera whose film
//! matches the render configuration.
//!
//! - Cornell box: a closed room with one ceiling light and two spheres
//! - Emissive sphere: a single glowing sphere and nothing else
//! - Spheres: matte, glossy, mirror and glass spheres on a ground plane, lit
//!   by a point light and a constant sky

// std
use std::sync::Arc;
// others
use log::info;
// pbrt
use crate::cameras::perspective::PerspectiveCamera;
use crate::core::api::{make_glass, make_matte, make_mirror, make_uber, pnt3, SceneBuilder};
use crate::core::camera::Camera;
use crate::core::config::{RenderConfig, SceneKind};
use crate::core::error::SceneError;
use crate::core::film::Film;
use crate::core::geometry::{Point2i, Point3f, Vector3f, XYZEnum};
use crate::core::material::Material;
use crate::core::pbrt::{Float, Spectrum};
use crate::core::scene::Scene;

pub type SceneAndCamera = (Scene, Arc<dyn Camera + Send + Sync>);

pub fn create_film(config: &RenderConfig) -> Result<Arc<Film>, SceneError> {
    let film: Film = Film::full_frame(
        Point2i {
            x: config.x_resolution,
            y: config.y_resolution,
        },
        config.create_filter(),
        &config.output,
    )?;
    Ok(Arc::new(film))
}

fn pinhole(
    eye: Point3f,
    target: Point3f,
    fov: Float,
    config: &RenderConfig,
) -> Result<Arc<dyn Camera + Send + Sync>, SceneError> {
    let up: Vector3f = Vector3f {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };
    let camera: PerspectiveCamera = PerspectiveCamera::look_at(
        &eye,
        &target,
        &up,
        fov,
        0.0 as Float,
        1.0e6 as Float,
        create_film(config)?,
    )?;
    Ok(Arc::new(camera))
}

pub fn create_scene(config: &RenderConfig) -> Result<SceneAndCamera, SceneError> {
    config.validate()?;
    info!("Creating scene {}", config.scene);
    match config.scene {
        SceneKind::CornellBox => cornell_box(config),
        SceneKind::EmissiveSphere => emissive_sphere(config),
        SceneKind::Spheres => spheres(config),
    }
}

/// Room spanning `[-1, 1] x [0, 2] x [-1, 1]`, open towards the camera
/// at +z, with a square light just below the ceiling.
pub fn cornell_box(config: &RenderConfig) -> Result<SceneAndCamera, SceneError> {
    let mut builder: SceneBuilder = SceneBuilder::new();
    let white: Spectrum = builder.spectrum("white", [0.73, 0.73, 0.73]);
    let red: Spectrum = builder.spectrum("red", [0.65, 0.05, 0.05]);
    let green: Spectrum = builder.spectrum("green", [0.12, 0.45, 0.15]);
    let light: Spectrum = builder.spectrum("light", [17.0, 12.0, 4.0]);
    // floor and back wall face into the room
    builder.material(make_matte(&white, 0.0));
    let floor = builder.rectangle(XYZEnum::Y, (-1.0, 1.0), (-1.0, 1.0), 0.0)?;
    builder.add_shape(floor);
    let back = builder.rectangle(XYZEnum::Z, (-1.0, 1.0), (0.0, 2.0), -1.0)?;
    builder.add_shape(back);
    builder.attribute_begin();
    builder.reverse_orientation();
    let ceiling = builder.rectangle(XYZEnum::Y, (-1.0, 1.0), (-1.0, 1.0), 2.0)?;
    builder.add_shape(ceiling);
    builder.material(make_matte(&green, 0.0));
    let right = builder.rectangle(XYZEnum::X, (0.0, 2.0), (-1.0, 1.0), 1.0)?;
    builder.add_shape(right);
    // emits downwards
    let lamp = builder.rectangle(XYZEnum::Y, (-0.25, 0.25), (-0.25, 0.25), 1.98)?;
    builder.add_emitter(lamp, &light, false)?;
    builder.attribute_end();
    builder.material(make_matte(&red, 0.0));
    let left = builder.rectangle(XYZEnum::X, (0.0, 2.0), (-1.0, 1.0), -1.0)?;
    builder.add_shape(left);
    // spheres
    builder.attribute_begin();
    builder.material(make_matte(&white, 20.0));
    builder.translate(-0.4, 0.4, -0.35);
    let diffuse_ball = builder.sphere(0.4)?;
    builder.add_shape(diffuse_ball);
    builder.attribute_end();
    builder.attribute_begin();
    builder.material(make_glass(&Spectrum::new(1.0), &Spectrum::new(1.0), 1.5));
    builder.translate(0.45, 0.3, 0.3);
    let glass_ball = builder.sphere(0.3)?;
    builder.add_shape(glass_ball);
    builder.attribute_end();
    let scene: Scene = builder.build(config.split_method, config.max_prims_in_node)?;
    let camera = pinhole(pnt3(0.0, 1.0, 3.9), pnt3(0.0, 1.0, 0.0), 40.0, config)?;
    Ok((scene, camera))
}

/// A unit sphere emitting constant radiance, seen from a distance of
/// five units.
pub fn emissive_sphere(config: &RenderConfig) -> Result<SceneAndCamera, SceneError> {
    let mut builder: SceneBuilder = SceneBuilder::new();
    let glow: Spectrum = builder.spectrum("glow", [1.0, 0.5, 0.25]);
    let sphere = builder.sphere(1.0)?;
    builder.add_emitter(sphere, &glow, false)?;
    let scene: Scene = builder.build(config.split_method, config.max_prims_in_node)?;
    let camera = pinhole(pnt3(0.0, 0.0, 5.0), pnt3(0.0, 0.0, 0.0), 30.0, config)?;
    Ok((scene, camera))
}

pub fn spheres(config: &RenderConfig) -> Result<SceneAndCamera, SceneError> {
    let mut builder: SceneBuilder = SceneBuilder::new();
    let ground: Spectrum = builder.spectrum("ground", [0.4, 0.4, 0.35]);
    let orange: Spectrum = builder.spectrum("orange", [0.8, 0.4, 0.1]);
    let chrome: Spectrum = builder.spectrum("chrome", [0.9, 0.9, 0.9]);
    let teal: Spectrum = builder.spectrum("teal", [0.1, 0.35, 0.4]);
    let sky: Spectrum = builder.spectrum("sky", [0.1, 0.15, 0.25]);
    builder.material(make_matte(&ground, 0.0));
    let plane = builder.rectangle(XYZEnum::Y, (-10.0, 10.0), (-10.0, 10.0), 0.0)?;
    builder.add_shape(plane);
    let balls: [(Float, Arc<dyn Material + Send + Sync>); 4] = [
        (-1.65, make_matte(&orange, 0.0)),
        (-0.55, make_uber(&teal, &Spectrum::new(0.5), 0.15)),
        (0.55, make_mirror(&chrome)),
        (1.65, make_glass(&Spectrum::new(1.0), &Spectrum::new(1.0), 1.5)),
    ];
    for (x, material) in balls.iter() {
        builder.attribute_begin();
        builder.material(material.clone());
        builder.translate(*x, 0.5, 0.0);
        let ball = builder.sphere(0.5)?;
        builder.add_shape(ball);
        builder.attribute_end();
    }
    builder.attribute_begin();
    builder.translate(2.0, 4.0, 3.0);
    builder.point_light(&Spectrum::new(30.0))?;
    builder.attribute_end();
    builder.infinite_light(&sky)?;
    let scene: Scene = builder.build(config.split_method, config.max_prims_in_node)?;
    let camera = pinhole(pnt3(0.0, 1.5, 6.5), pnt3(0.0, 0.5, 0.0), 40.0, config)?;
    Ok((scene, camera))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn small_config(scene: SceneKind) -> RenderConfig {
        RenderConfig {
            x_resolution: 8,
            y_resolution: 6,
            scene,
            progress: false,
            ..Default::default()
        }
    }

    #[test]
    fn every_scene_builds() {
        for kind in SceneKind::iter() {
            let (scene, camera) = create_scene(&small_config(kind)).unwrap();
            assert!(!scene.lights.is_empty());
            assert_eq!(camera.get_film().full_resolution, Point2i { x: 8, y: 6 });
        }
    }

    #[test]
    fn light_counts() {
        let (scene, _camera) = cornell_box(&small_config(SceneKind::CornellBox)).unwrap();
        assert_eq!(scene.lights.len(), 1);
        assert!(scene.infinite_lights.is_empty());
        let (scene, _camera) = spheres(&small_config(SceneKind::Spheres)).unwrap();
        assert_eq!(scene.lights.len(), 2);
        assert_eq!(scene.infinite_lights.len(), 1);
    }
}
