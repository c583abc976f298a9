//! Textures describe how a material property varies over a surface.
//!
//! - ConstantTexture

pub mod constant;
