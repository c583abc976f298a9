//! Careful abstraction of geometric shapes in a ray tracer is a key
//! component of a clean system design. All geometric primitives
//! implement a common interface, and the rest of the renderer can use
//! this interface without needing any details about the underlying
//! shape.
//!
//! - Disk
//! - Rectangle
//! - Sphere
//!
//! ## Spheres
//!
//! Spheres are a special case of a general type of surfaces called
//! quadrics. They are the simplest type of curved surfaces that is
//! useful to a ray tracer and are a good starting point for general
//! ray intersection routines. Hits are computed with `EFloat`
//! interval arithmetic and reprojected onto the surface, so every
//! hit point comes with a conservative error bound.
//!
//! ## Disks
//!
//! The disk is an interesting quadric since it has a particularly
//! straightforward intersection routine that avoids solving the
//! quadric equation.
//!
//! ## Rectangles
//!
//! Axis-aligned rectangles in object space; walls and ceiling lights
//! of box-shaped rooms.

pub mod disk;
pub mod rectangle;
pub mod sphere;
