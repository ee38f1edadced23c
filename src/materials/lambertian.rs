// Copyright @yucwang 2023

use crate::core::bsdf::{BSDF, BSDFSample, BxDFType, DirectionLobe};
use crate::core::integrator::TransportDirection;
use crate::core::interaction::SurfaceIntersection;
use crate::core::rng::LcgRng;
use crate::core::tangent_frame::{build_tangent_frame, local_to_world};
use crate::math::constants::{ INV_PI, Vector3f };
use crate::math::warp::{ sample_cosine_hemisphere, sample_cosine_hemisphere_pdf };

pub struct Lambertian {
    albedo: Vector3f,
}

impl Lambertian {
    pub fn new(albedo: Vector3f) -> Self {
        Self { albedo }
    }
}

impl BSDF for Lambertian {
    fn bxdf_type(&self) -> BxDFType {
        BxDFType::Diffuse
    }

    fn eval(&self, wo: &Vector3f, wi: &Vector3f,
            surface: &SurfaceIntersection,
            _transport: TransportDirection) -> Vector3f {
        let n = surface.sh_normal();
        // Reflection only: both directions must share the upper hemisphere.
        if wo.dot(&n) * wi.dot(&n) <= 0.0 {
            return Vector3f::new(0.0, 0.0, 0.0);
        }
        self.albedo * INV_PI
    }

    fn sample(&self, wo: &Vector3f,
              surface: &SurfaceIntersection,
              transport: TransportDirection,
              rng: &mut LcgRng) -> Option<BSDFSample> {
        let mut n = surface.sh_normal();
        if wo.dot(&n) < 0.0 {
            n = -n;
        }

        let local_wi = sample_cosine_hemisphere(&rng.next_2d());
        let pdf = sample_cosine_hemisphere_pdf(local_wi.z);
        if pdf <= 0.0 {
            return None;
        }

        let (tangent, bitangent) = build_tangent_frame(&n);
        let wi = local_to_world(&local_wi, &tangent, &bitangent, &n);
        let value = self.eval(wo, &wi, surface, transport);
        Some(BSDFSample { wi, pdf, value })
    }

    fn sample_all(&self, _wo: &Vector3f,
                  _surface: &SurfaceIntersection,
                  _transport: TransportDirection) -> Vec<DirectionLobe> {
        // A diffuse surface has no deterministic lobe.
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector2f;

    fn flat_surface() -> SurfaceIntersection {
        let n = Vector3f::new(0.0, 0.0, 1.0);
        SurfaceIntersection::new(
            Vector3f::new(0.0, 0.0, 0.0),
            n,
            n,
            Vector2f::new(0.0, 0.0),
            0.0,
            Vector3f::new(0.0, 0.0, 0.0),
            None,
        )
    }

    #[test]
    fn test_eval_is_albedo_over_pi() {
        let bsdf = Lambertian::new(Vector3f::new(0.5, 0.25, 0.75));
        let surface = flat_surface();
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.3, 0.3, 0.9).normalize();
        let f = bsdf.eval(&wo, &wi, &surface, TransportDirection::FromCamera);
        assert!((f.x - 0.5 * INV_PI).abs() < 1e-6);
        assert!((f.y - 0.25 * INV_PI).abs() < 1e-6);
    }

    #[test]
    fn test_eval_rejects_transmission() {
        let bsdf = Lambertian::new(Vector3f::new(0.5, 0.5, 0.5));
        let surface = flat_surface();
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.0, 0.0, -1.0);
        let f = bsdf.eval(&wo, &wi, &surface, TransportDirection::FromCamera);
        assert_eq!(f, Vector3f::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_sample_stays_in_wo_hemisphere() {
        let bsdf = Lambertian::new(Vector3f::new(0.5, 0.5, 0.5));
        let surface = flat_surface();
        let wo = Vector3f::new(0.2, 0.1, 0.97).normalize();
        let mut rng = LcgRng::new(17);
        for _ in 0..64 {
            let sample = bsdf
                .sample(&wo, &surface, TransportDirection::FromCamera, &mut rng)
                .unwrap();
            assert!(sample.wi.dot(&surface.sh_normal()) > 0.0);
            assert!(sample.pdf > 0.0);
        }
    }
}
