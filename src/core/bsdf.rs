// Copyright @yucwang 2023

use crate::core::integrator::TransportDirection;
use crate::core::interaction::SurfaceIntersection;
use crate::core::rng::LcgRng;
use crate::math::constants::{ Float, Vector3f };

/// Discrete scattering kind of a material. The integrator branches on this
/// tag: diffuse surfaces are resolved with photon density estimation and
/// next-event estimation, specular surfaces by recursing through their lobes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BxDFType {
    Diffuse,
    Specular,
}

/// One importance-sampled scattering direction in world space.
#[derive(Debug)]
pub struct BSDFSample {
    pub wi: Vector3f,
    pub pdf: Float,
    pub value: Vector3f,
}

/// One deterministic scattering lobe, used when the integrator enumerates
/// every lobe of a specular surface instead of sampling one of them.
#[derive(Debug)]
pub struct DirectionLobe {
    pub wi: Vector3f,
    pub value: Vector3f,
}

pub trait BSDF: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn bxdf_type(&self) -> BxDFType;

    /// Evaluate the scattering value for a fixed direction pair. Delta
    /// (specular) materials evaluate to zero.
    fn eval(&self, wo: &Vector3f, wi: &Vector3f,
            surface: &SurfaceIntersection,
            transport: TransportDirection) -> Vector3f;

    /// Importance-sample an incoming direction together with its density and
    /// scattering value. Returns `None` when no direction can be sampled.
    fn sample(&self, wo: &Vector3f,
              surface: &SurfaceIntersection,
              transport: TransportDirection,
              rng: &mut LcgRng) -> Option<BSDFSample>;

    /// Enumerate every deterministic lobe of the material. Only meaningful
    /// for specular materials; diffuse materials have no deterministic lobe.
    fn sample_all(&self, wo: &Vector3f,
                  surface: &SurfaceIntersection,
                  transport: TransportDirection) -> Vec<DirectionLobe>;
}
