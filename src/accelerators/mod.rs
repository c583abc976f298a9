//! Spatial index over the scene primitives. Without one every ray
//! would be tested against every primitive.
//!
//! - BVHAccel: bounding volume hierarchy, flattened into a linear
//!   array of nodes and traversed with a fixed-size stack

pub mod bvh;
