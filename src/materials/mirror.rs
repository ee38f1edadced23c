// Copyright @yucwang 2026

use crate::core::bsdf::{BSDF, BSDFSample, BxDFType, DirectionLobe};
use crate::core::integrator::TransportDirection;
use crate::core::interaction::SurfaceIntersection;
use crate::core::rng::LcgRng;
use crate::math::constants::{ EPSILON, Vector3f };

pub fn reflect(wo: &Vector3f, n: &Vector3f) -> Vector3f {
    (2.0 * wo.dot(n) * n - wo).normalize()
}

/// Ideal specular reflector. The sampled value carries `1 / |wi . ns|` so the
/// cosine applied by the integrator cancels and a mirror bounce scales purely
/// by its reflectance.
pub struct Mirror {
    albedo: Vector3f,
}

impl Mirror {
    pub fn new(albedo: Vector3f) -> Self {
        Self { albedo }
    }

    fn lobe(&self, wo: &Vector3f, surface: &SurfaceIntersection) -> Option<DirectionLobe> {
        let mut n = surface.sh_normal();
        if wo.dot(&n) < 0.0 {
            n = -n;
        }
        let wi = reflect(wo, &n);
        let cos = wi.dot(&n).abs();
        if cos < EPSILON {
            return None;
        }
        Some(DirectionLobe { wi, value: self.albedo / cos })
    }
}

impl BSDF for Mirror {
    fn bxdf_type(&self) -> BxDFType {
        BxDFType::Specular
    }

    fn eval(&self, _wo: &Vector3f, _wi: &Vector3f,
            _surface: &SurfaceIntersection,
            _transport: TransportDirection) -> Vector3f {
        // Delta distribution: a fixed direction pair never evaluates.
        Vector3f::new(0.0, 0.0, 0.0)
    }

    fn sample(&self, wo: &Vector3f,
              surface: &SurfaceIntersection,
              _transport: TransportDirection,
              _rng: &mut LcgRng) -> Option<BSDFSample> {
        let lobe = self.lobe(wo, surface)?;
        Some(BSDFSample { wi: lobe.wi, pdf: 1.0, value: lobe.value })
    }

    fn sample_all(&self, wo: &Vector3f,
                  surface: &SurfaceIntersection,
                  _transport: TransportDirection) -> Vec<DirectionLobe> {
        self.lobe(wo, surface).into_iter().collect()
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
    fn test_reflection_direction() {
        let surface = flat_surface();
        let mirror = Mirror::new(Vector3f::new(0.9, 0.9, 0.9));
        let wo = Vector3f::new(1.0, 0.0, 1.0).normalize();
        let mut rng = LcgRng::new(0);
        let sample = mirror
            .sample(&wo, &surface, TransportDirection::FromCamera, &mut rng)
            .unwrap();
        let expected = Vector3f::new(-1.0, 0.0, 1.0).normalize();
        assert!((sample.wi - expected).norm() < 1e-5);
    }

    #[test]
    fn test_single_lobe_policies_agree() {
        // With exactly one lobe, enumerating it must carry the same weight
        // as importance-sampling it: value * cos == (value * cos) / pdf.
        let surface = flat_surface();
        let mirror = Mirror::new(Vector3f::new(0.9, 0.8, 0.7));
        let wo = Vector3f::new(0.3, -0.2, 0.93).normalize();
        let mut rng = LcgRng::new(0);

        let sampled = mirror
            .sample(&wo, &surface, TransportDirection::FromCamera, &mut rng)
            .unwrap();
        let lobes = mirror.sample_all(&wo, &surface, TransportDirection::FromCamera);
        assert_eq!(lobes.len(), 1);

        let n = surface.sh_normal();
        let sampled_weight = sampled.value * sampled.wi.dot(&n).abs() / sampled.pdf;
        let enumerated_weight = lobes[0].value * lobes[0].wi.dot(&n).abs();
        assert!((sampled_weight - enumerated_weight).norm() < 1e-6);
    }

    #[test]
    fn test_mirror_bounce_weight_is_reflectance() {
        let surface = flat_surface();
        let albedo = Vector3f::new(0.9, 0.8, 0.7);
        let mirror = Mirror::new(albedo);
        let wo = Vector3f::new(0.5, 0.0, 0.87).normalize();
        let lobes = mirror.sample_all(&wo, &surface, TransportDirection::FromCamera);
        let weight = lobes[0].value * lobes[0].wi.dot(&surface.sh_normal()).abs();
        assert!((weight - albedo).norm() < 1e-5);
    }
}
