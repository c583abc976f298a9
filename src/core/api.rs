//! Programmatic scene description. A **SceneBuilder** keeps a current
//! transformation matrix and graphics state (material, orientation),
//! which can be saved and restored with `attribute_begin` and
//! `attribute_end`. Shapes pick up the state current at the time they
//! are added; `build` turns everything into a **Scene** around a BVH.

// std
use std::collections::HashMap;
use std::sync::Arc;
// others
use log::{debug, info, warn};
// pbrt
use crate::accelerators::bvh::{BVHAccel, SplitMethod};
use crate::core::error::SceneError;
use crate::core::geometry::{Point3f, Vector3f, XYZEnum};
use crate::core::light::{AreaLight, Light};
use crate::core::material::Material;
use crate::core::pbrt::{Float, Spectrum};
use crate::core::primitive::{GeometricPrimitive, Primitive};
use crate::core::scene::Scene;
use crate::core::shape::Shape;
use crate::core::spectrum::SpectrumCache;
use crate::core::transform::Transform;
use crate::lights::diffuse::DiffuseAreaLight;
use crate::lights::infinite::InfiniteAreaLight;
use crate::lights::point::PointLight;
use crate::materials::glass::GlassMaterial;
use crate::materials::matte::MatteMaterial;
use crate::materials::mirror::MirrorMaterial;
use crate::materials::uber::UberMaterial;
use crate::shapes::disk::Disk;
use crate::shapes::rectangle::Rectangle;
use crate::shapes::sphere::Sphere;
use crate::textures::constant::ConstantTexture;

pub fn make_matte(kd: &Spectrum, sigma: Float) -> Arc<dyn Material + Send + Sync> {
    Arc::new(MatteMaterial::new(
        Arc::new(ConstantTexture::new(*kd)),
        Arc::new(ConstantTexture::new(sigma)),
    ))
}

pub fn make_mirror(kr: &Spectrum) -> Arc<dyn Material + Send + Sync> {
    Arc::new(MirrorMaterial::new(Arc::new(ConstantTexture::new(*kr))))
}

pub fn make_glass(kr: &Spectrum, kt: &Spectrum, eta: Float) -> Arc<dyn Material + Send + Sync> {
    Arc::new(GlassMaterial::new(
        Arc::new(ConstantTexture::new(*kr)),
        Arc::new(ConstantTexture::new(*kt)),
        Arc::new(ConstantTexture::new(eta)),
    ))
}

/// Diffuse base under a glossy dielectric coat.
pub fn make_uber(kd: &Spectrum, ks: &Spectrum, roughness: Float) -> Arc<dyn Material + Send + Sync> {
    Arc::new(UberMaterial::new(
        Arc::new(ConstantTexture::new(*kd)),
        Arc::new(ConstantTexture::new(*ks)),
        Arc::new(ConstantTexture::new(Spectrum::default())),
        Arc::new(ConstantTexture::new(Spectrum::default())),
        Arc::new(ConstantTexture::new(roughness)),
        None,
        None,
        Arc::new(ConstantTexture::new(Spectrum::new(1.0))),
        Arc::new(ConstantTexture::new(1.5 as Float)),
        true,
    ))
}

#[derive(Clone)]
pub struct GraphicsState {
    pub material: Arc<dyn Material + Send + Sync>,
    pub reverse_orientation: bool,
    pub ctm: Transform,
}

impl Default for GraphicsState {
    fn default() -> Self {
        GraphicsState {
            material: make_matte(&Spectrum::new(0.5 as Float), 0.0 as Float),
            reverse_orientation: false,
            ctm: Transform::default(),
        }
    }
}

#[derive(Default)]
pub struct SceneBuilder {
    graphics_state: GraphicsState,
    pushed_graphics_states: Vec<GraphicsState>,
    transform_cache: HashMap<[u32; 16], Arc<Transform>>,
    spectra: SpectrumCache,
    primitives: Vec<Arc<Primitive>>,
    lights: Vec<Arc<dyn Light + Sync + Send>>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        SceneBuilder::default()
    }
    /// Shared copy of `t`; identical matrices share one allocation.
    pub fn intern_transform(&mut self, t: &Transform) -> Arc<Transform> {
        self.transform_cache
            .entry(t.key())
            .or_insert_with(|| Arc::new(*t))
            .clone()
    }
    pub fn num_transforms(&self) -> usize {
        self.transform_cache.len()
    }
    /// Spectrum registered under `name`, created from `rgb` on first
    /// use.
    pub fn spectrum(&mut self, name: &str, rgb: [Float; 3]) -> Spectrum {
        self.spectra.named(name, rgb)
    }
    pub fn spectrum_cache(&self) -> &SpectrumCache {
        &self.spectra
    }
    // transformations

    pub fn identity(&mut self) {
        self.graphics_state.ctm = Transform::default();
    }
    pub fn transform(&mut self, t: &Transform) {
        self.graphics_state.ctm = self.graphics_state.ctm * *t;
    }
    pub fn translate(&mut self, dx: Float, dy: Float, dz: Float) {
        let t: Transform = Transform::translate(&Vector3f {
            x: dx,
            y: dy,
            z: dz,
        });
        self.transform(&t);
    }
    pub fn scale(&mut self, sx: Float, sy: Float, sz: Float) -> Result<(), SceneError> {
        let t: Transform = Transform::scale(sx, sy, sz)?;
        self.transform(&t);
        Ok(())
    }
    pub fn rotate(&mut self, angle: Float, dx: Float, dy: Float, dz: Float) {
        let t: Transform = Transform::rotate(angle, &Vector3f { x: dx, y: dy, z: dz });
        self.transform(&t);
    }
    pub fn current_transform(&self) -> Transform {
        self.graphics_state.ctm
    }
    // graphics state

    pub fn attribute_begin(&mut self) {
        self.pushed_graphics_states.push(self.graphics_state.clone());
    }
    pub fn attribute_end(&mut self) {
        match self.pushed_graphics_states.pop() {
            Some(graphics_state) => self.graphics_state = graphics_state,
            None => warn!("Unmatched attribute_end() encountered. Ignoring it."),
        }
    }
    pub fn material(&mut self, material: Arc<dyn Material + Send + Sync>) {
        self.graphics_state.material = material;
    }
    pub fn reverse_orientation(&mut self) {
        self.graphics_state.reverse_orientation = !self.graphics_state.reverse_orientation;
    }
    fn object_transforms(&mut self) -> (Arc<Transform>, Arc<Transform>) {
        let ctm: Transform = self.graphics_state.ctm;
        let object_to_world: Arc<Transform> = self.intern_transform(&ctm);
        let world_to_object: Arc<Transform> = self.intern_transform(&ctm.inverse());
        (object_to_world, world_to_object)
    }
    // shapes, placed with the current transformation

    pub fn sphere(&mut self, radius: Float) -> Result<Arc<dyn Shape + Send + Sync>, SceneError> {
        let (o2w, w2o) = self.object_transforms();
        let reverse: bool = self.graphics_state.reverse_orientation;
        Ok(Arc::new(Sphere::full(o2w, w2o, reverse, radius)?))
    }
    pub fn disk(
        &mut self,
        height: Float,
        radius: Float,
        inner_radius: Float,
    ) -> Result<Arc<dyn Shape + Send + Sync>, SceneError> {
        let (o2w, w2o) = self.object_transforms();
        let reverse: bool = self.graphics_state.reverse_orientation;
        Ok(Arc::new(Disk::new(
            o2w,
            w2o,
            reverse,
            height,
            radius,
            inner_radius,
            360.0 as Float,
        )?))
    }
    pub fn rectangle(
        &mut self,
        axis: XYZEnum,
        u: (Float, Float),
        v: (Float, Float),
        k: Float,
    ) -> Result<Arc<dyn Shape + Send + Sync>, SceneError> {
        let (o2w, w2o) = self.object_transforms();
        let reverse: bool = self.graphics_state.reverse_orientation;
        Ok(Arc::new(Rectangle::new(o2w, w2o, reverse, axis, u, v, k)?))
    }
    // primitives and lights

    /// Add `shape` with the current material.
    pub fn add_shape(&mut self, shape: Arc<dyn Shape + Send + Sync>) {
        let material: Arc<dyn Material + Send + Sync> = self.graphics_state.material.clone();
        self.primitives
            .push(Arc::new(Primitive::Geometric(Box::new(GeometricPrimitive::new(
                shape,
                Some(material),
                None,
            )))));
    }
    /// Add `shape` as a pure emitter: a diffuse area light without any
    /// scattering. The same light object is referenced by the
    /// primitive and listed among the scene lights.
    pub fn add_emitter(
        &mut self,
        shape: Arc<dyn Shape + Send + Sync>,
        l_emit: &Spectrum,
        two_sided: bool,
    ) -> Result<(), SceneError> {
        if l_emit.has_nans() || l_emit.has_infs() || l_emit.y() < 0.0 as Float {
            return Err(SceneError::InvalidLight(format!(
                "emitted radiance {:?}",
                l_emit
            )));
        }
        let area_light: Arc<DiffuseAreaLight> =
            Arc::new(DiffuseAreaLight::new(l_emit, 1, shape.clone(), two_sided));
        let as_area_light: Arc<dyn AreaLight + Send + Sync> = area_light.clone();
        let as_light: Arc<dyn Light + Sync + Send> = area_light;
        self.primitives
            .push(Arc::new(Primitive::Geometric(Box::new(GeometricPrimitive::new(
                shape,
                None,
                Some(as_area_light),
            )))));
        self.lights.push(as_light);
        Ok(())
    }
    pub fn add_light(&mut self, light: Arc<dyn Light + Sync + Send>) {
        self.lights.push(light);
    }
    /// Point light at the origin of the current coordinate system.
    pub fn point_light(&mut self, i: &Spectrum) -> Result<(), SceneError> {
        if i.has_nans() || i.has_infs() {
            return Err(SceneError::InvalidLight(format!("intensity {:?}", i)));
        }
        let light_to_world: Transform = self.graphics_state.ctm;
        self.add_light(Arc::new(PointLight::new(&light_to_world, i)));
        Ok(())
    }
    pub fn infinite_light(&mut self, l: &Spectrum) -> Result<(), SceneError> {
        if l.has_nans() || l.has_infs() {
            return Err(SceneError::InvalidLight(format!("radiance {:?}", l)));
        }
        self.add_light(Arc::new(InfiniteAreaLight::new(l, 1)));
        Ok(())
    }
    pub fn num_primitives(&self) -> usize {
        self.primitives.len()
    }
    pub fn num_lights(&self) -> usize {
        self.lights.len()
    }
    /// Build the BVH over all primitives and wrap it with the lights
    /// into a scene. A scene needs at least a primitive or a light.
    pub fn build(self, split_method: SplitMethod, max_prims_in_node: usize) -> Result<Scene, SceneError> {
        if self.primitives.is_empty() && self.lights.is_empty() {
            return Err(SceneError::EmptyScene);
        }
        debug!(
            "{} transforms, {} named spectra",
            self.transform_cache.len(),
            self.spectra.len()
        );
        info!(
            "Building scene with {} primitives and {} lights",
            self.primitives.len(),
            self.lights.len()
        );
        let accelerator: BVHAccel = BVHAccel::new(self.primitives, max_prims_in_node, split_method);
        let aggregate: Arc<Primitive> = Arc::new(Primitive::BVH(Box::new(accelerator)));
        Ok(Scene::new(aggregate, self.lights))
    }
}

/// Shorthand for a `Point3f`.
pub fn pnt3(x: Float, y: Float, z: Float) -> Point3f {
    Point3f { x, y, z }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Ray;
    use approx::assert_relative_eq;

    #[test]
    fn identical_transforms_are_shared() {
        let mut builder: SceneBuilder = SceneBuilder::new();
        builder.translate(1.0, 2.0, 3.0);
        let a = builder.sphere(1.0).unwrap();
        let b = builder.sphere(2.0).unwrap();
        builder.add_shape(a);
        builder.add_shape(b);
        // object to world and its inverse
        assert_eq!(builder.num_transforms(), 2);
        let t: Transform = builder.current_transform();
        let first = builder.intern_transform(&t);
        let second = builder.intern_transform(&t);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn attributes_restore_state() {
        let mut builder: SceneBuilder = SceneBuilder::new();
        builder.attribute_begin();
        builder.translate(0.0, 0.0, 5.0);
        builder.reverse_orientation();
        builder.attribute_end();
        assert!(builder.current_transform().is_identity());
        // unmatched end is ignored
        builder.attribute_end();
        assert!(builder.current_transform().is_identity());
    }

    #[test]
    fn named_spectra_are_cached() {
        let mut builder: SceneBuilder = SceneBuilder::new();
        let red: Spectrum = builder.spectrum("red", [0.63, 0.065, 0.05]);
        let again: Spectrum = builder.spectrum("red", [1.0, 1.0, 1.0]);
        assert_relative_eq!(red[0], again[0]);
        assert_eq!(builder.spectrum_cache().len(), 1);
    }

    #[test]
    fn empty_scene_is_rejected() {
        let builder: SceneBuilder = SceneBuilder::new();
        assert!(matches!(
            builder.build(SplitMethod::SAH, 4),
            Err(SceneError::EmptyScene)
        ));
    }

    #[test]
    fn built_scene_is_intersectable() {
        let mut builder: SceneBuilder = SceneBuilder::new();
        builder.attribute_begin();
        builder.translate(0.0, 0.0, 5.0);
        let sphere = builder.sphere(1.0).unwrap();
        builder.add_shape(sphere);
        builder.attribute_end();
        let emitter = builder.sphere(0.5).unwrap();
        builder.add_emitter(emitter, &Spectrum::new(2.0), false).unwrap();
        let scene: Scene = builder.build(SplitMethod::SAH, 4).unwrap();
        assert_eq!(scene.lights.len(), 1);
        let ray: Ray = Ray::new(
            pnt3(0.0, 0.0, 2.0),
            Vector3f {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            },
        );
        let isect = scene.intersect(&ray).unwrap();
        assert_relative_eq!(isect.common.p.z, 4.0, epsilon = 1e-4);
    }

    #[test]
    fn invalid_emission_is_rejected() {
        let mut builder: SceneBuilder = SceneBuilder::new();
        let sphere = builder.sphere(1.0).unwrap();
        let result = builder.add_emitter(sphere, &Spectrum::new(Float::NAN), false);
        assert!(matches!(result, Err(SceneError::InvalidLight(_))));
        assert!(builder.sphere(-1.0).is_err());
    }
}
