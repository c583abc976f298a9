//! Pixel reconstruction filters.
//!
//! - BoxFilter
//! - TriangleFilter

pub mod boxfilter;
pub mod triangle;
