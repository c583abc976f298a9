//! The core of the renderer: geometry and transforms, the interfaces
//! of the pluggable parts (shapes, lights, materials, cameras,
//! samplers, filters) and the glue between them.

pub mod api;
pub mod camera;
pub mod config;
pub mod efloat;
pub mod error;
pub mod film;
pub mod filter;
pub mod geometry;
pub mod integrator;
pub mod interaction;
pub mod light;
pub mod lightdistrib;
pub mod material;
pub mod microfacet;
pub mod pbrt;
pub mod primitive;
pub mod reflection;
pub mod rng;
pub mod sampler;
pub mod sampling;
pub mod scene;
pub mod shape;
pub mod spectrum;
pub mod texture;
pub mod transform;
