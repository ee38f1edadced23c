// Copyright @yucwang 2026

use crate::core::interaction::SurfaceIntersection;
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::math::constants::{ Float, Vector3f };
use crate::math::ray::Ray3f;

/// Whether a path is traced from the camera (radiance transport) or from a
/// light (importance transport). Shading normals make the two directions
/// asymmetric, so the cosine term differs between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportDirection {
    FromCamera,
    FromLight,
}

pub trait Integrator: Send + Sync {
    /// Do preliminary work before any integrate call. Called exactly once.
    fn build(&mut self, scene: &Scene, rng: &mut LcgRng);

    /// Compute the radiance coming from the given ray. Immutable, and safe
    /// to call concurrently from rendering workers once `build` completed.
    fn integrate(&self, ray: &Ray3f, scene: &Scene, rng: &mut LcgRng) -> Vector3f;

    fn samples_per_pixel(&self) -> u32;
}

/// Cosine term of the transport equation, corrected for the asymmetry
/// introduced by shading normals (Veach, section 5.3). Returns zero whenever
/// a direction straddles the shading and geometric hemispheres, so energy
/// cannot leak through geometry at grazing configurations.
pub fn cos_term(wo: &Vector3f, wi: &Vector3f,
                surface: &SurfaceIntersection,
                transport: TransportDirection) -> Float {
    let wi_ns = wi.dot(&surface.sh_normal());
    let wi_ng = wi.dot(&surface.geo_normal());
    let wo_ns = wo.dot(&surface.sh_normal());
    let wo_ng = wo.dot(&surface.geo_normal());

    // prevent light leaks
    if wi_ng * wi_ns <= 0.0 || wo_ng * wo_ns <= 0.0 {
        return 0.0;
    }

    match transport {
        TransportDirection::FromCamera => wi_ns.abs(),
        TransportDirection::FromLight => wo_ns.abs() * wi_ng.abs() / wo_ng.abs(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector2f;

    fn surface_with_normals(geo: Vector3f, sh: Vector3f) -> SurfaceIntersection {
        SurfaceIntersection::new(
            Vector3f::new(0.0, 0.0, 0.0),
            geo,
            sh,
            Vector2f::new(0.0, 0.0),
            0.0,
            Vector3f::new(0.0, 0.0, 0.0),
            None,
        )
    }

    #[test]
    fn test_cos_term_from_camera() {
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let surface = surface_with_normals(n, n);
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.6, 0.0, 0.8);

        let cos = cos_term(&wo, &wi, &surface, TransportDirection::FromCamera);
        assert!((cos - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_cos_term_from_light_corrects_for_shading_normal() {
        let geo = Vector3f::new(0.0, 0.0, 1.0);
        let sh = Vector3f::new(0.2, 0.0, 1.0).normalize();
        let surface = surface_with_normals(geo, sh);
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.6, 0.0, 0.8);

        let expected = wo.dot(&sh).abs() * wi.dot(&geo).abs() / wo.dot(&geo).abs();
        let cos = cos_term(&wo, &wi, &surface, TransportDirection::FromLight);
        assert!((cos - expected).abs() < 1e-6);
    }

    #[test]
    fn test_cos_term_guards_against_light_leaks() {
        // Shading normal tilted far enough that wi lies above the geometric
        // surface but below the shading one.
        let geo = Vector3f::new(0.0, 0.0, 1.0);
        let sh = Vector3f::new(0.9, 0.0, 0.45).normalize();
        let surface = surface_with_normals(geo, sh);
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(-0.7, 0.0, 0.3).normalize();

        assert!(wi.dot(&geo) > 0.0);
        assert!(wi.dot(&sh) < 0.0);
        for transport in [TransportDirection::FromCamera, TransportDirection::FromLight].iter() {
            let cos = cos_term(&wo, &wi, &surface, *transport);
            assert_eq!(cos, 0.0);
        }
    }
}
