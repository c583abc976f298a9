//! Light sources. Every scene needs at least one of these, or an
//! emissive surface, to produce anything but a black image.
//!
//! - DiffuseAreaLight
//! - InfiniteAreaLight
//! - PointLight
//!
//! ## Diffuse Area Lights
//!
//! Constant radiance leaving a **Shape**. One-sided emitters only
//! radiate towards the side the surface normal points to.
//!
//! ## Infinite Area Lights
//!
//! A constant radiance arriving from all directions. Rays leaving the
//! scene pick it up through `Light::le`.
//!
//! ## Point Lights
//!
//! A delta position emitting the same intensity in every direction,
//! falling off with the squared distance.

pub mod diffuse;
pub mod infinite;
pub mod point;
