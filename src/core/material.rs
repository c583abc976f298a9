//! The abstract **Material** trait defines the interface that
//! material implementations must provide.

// pbrt
use crate::core::interaction::SurfaceInteraction;

/// Is used to inform non-symmetric BSDFs about the transported
/// quantity so that they can correctly switch between the adjoint and
/// non-adjoint forms.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransportMode {
    Radiance,
    Importance,
}

/// **Material** defines the interface that material implementations
/// must provide.
pub trait Material {
    /// The method is given a **SurfaceInteraction** object that
    /// contains geometric properties at an intersection point on the
    /// surface of a shape and is responsible for determining the
    /// reflective properties at the point and initializing
    /// `si.bsdf`.
    fn compute_scattering_functions(
        &self,
        si: &mut SurfaceInteraction,
        mode: TransportMode,
        allow_multiple_lobes: bool,
    );
}
