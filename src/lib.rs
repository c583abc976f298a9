//! # rs_pathtracer
//!
//! A physically based forward path tracer: error-bounded ray/shape
//! intersection, a bounding volume hierarchy over the scene
//! primitives and a Monte Carlo path integrator with next event
//! estimation and multiple importance sampling.
//!
//! A render goes through three stages:
//!
//! 1. [`core::api::SceneBuilder`] collects shapes, materials and
//!    lights and builds the [`core::scene::Scene`] around a BVH.
//! 2. [`integrators::path::PathIntegrator`] estimates the radiance
//!    along camera rays.
//! 3. [`integrators::render`] splits the image into tiles, renders
//!    them on worker threads and merges them into the camera's film.
//!
//! The built-in test scenes live in [`scenes`].

#[macro_use]
extern crate impl_ops;

pub mod accelerators;
pub mod blockqueue;
pub mod cameras;
pub mod core;
pub mod filters;
pub mod integrators;
pub mod lights;
pub mod materials;
pub mod samplers;
pub mod scenes;
pub mod shapes;
pub mod textures;
