// Copyright @yucwang 2026

use crate::core::bsdf::{BSDF, BSDFSample, BxDFType, DirectionLobe};
use crate::core::integrator::TransportDirection;
use crate::core::interaction::SurfaceIntersection;
use crate::core::rng::LcgRng;
use crate::materials::mirror::reflect;
use crate::math::constants::{ EPSILON, Float, Vector3f };

/// Unpolarized Fresnel reflectance for a dielectric interface.
pub fn fresnel_dielectric(cos_i: Float, eta_i: Float, eta_t: Float) -> Float {
    let cos_i = cos_i.clamp(0.0, 1.0);
    let sin2_t = (eta_i / eta_t) * (eta_i / eta_t) * (1.0 - cos_i * cos_i);
    if sin2_t >= 1.0 {
        return 1.0;
    }
    let cos_t = (1.0 - sin2_t).sqrt();

    let r_parallel = (eta_t * cos_i - eta_i * cos_t) / (eta_t * cos_i + eta_i * cos_t);
    let r_perpendicular = (eta_i * cos_i - eta_t * cos_t) / (eta_i * cos_i + eta_t * cos_t);
    0.5 * (r_parallel * r_parallel + r_perpendicular * r_perpendicular)
}

fn refract(wo: &Vector3f, n: &Vector3f, eta_ratio: Float) -> Option<Vector3f> {
    let cos_i = wo.dot(n);
    let sin2_t = eta_ratio * eta_ratio * (1.0 - cos_i * cos_i);
    if sin2_t >= 1.0 {
        return None;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    Some((-eta_ratio * wo + (eta_ratio * cos_i - cos_t) * n).normalize())
}

/// Smooth dielectric with stochastic Fresnel selection between its
/// reflection and transmission lobes. Lobe values carry `1 / |wi . ns|` so
/// the integrator's cosine cancels, as for the mirror.
pub struct Glass {
    albedo: Vector3f,
    ior: Float,
}

enum Lobes {
    Total(DirectionLobe),
    Split { reflection: DirectionLobe, transmission: DirectionLobe, fresnel: Float },
}

impl Glass {
    pub fn new(albedo: Vector3f, ior: Float) -> Self {
        Self { albedo, ior }
    }

    fn lobes(&self, wo: &Vector3f, surface: &SurfaceIntersection) -> Option<Lobes> {
        let mut n = surface.sh_normal();
        let entering = wo.dot(&n) >= 0.0;
        let (eta_i, eta_t) = if entering {
            (1.0, self.ior)
        } else {
            n = -n;
            (self.ior, 1.0)
        };

        let cos_i = wo.dot(&n);
        if cos_i < EPSILON {
            return None;
        }

        let wr = reflect(wo, &n);
        let cos_r = wr.dot(&n).abs().max(EPSILON);
        let transmitted = refract(wo, &n, eta_i / eta_t);

        let wt = match transmitted {
            Some(wt) => wt,
            None => {
                // Total internal reflection.
                return Some(Lobes::Total(DirectionLobe {
                    wi: wr,
                    value: self.albedo / cos_r,
                }));
            }
        };

        let fresnel = fresnel_dielectric(cos_i, eta_i, eta_t);
        let cos_t = wt.dot(&n).abs().max(EPSILON);
        Some(Lobes::Split {
            reflection: DirectionLobe { wi: wr, value: fresnel * self.albedo / cos_r },
            transmission: DirectionLobe { wi: wt, value: (1.0 - fresnel) * self.albedo / cos_t },
            fresnel,
        })
    }
}

impl BSDF for Glass {
    fn bxdf_type(&self) -> BxDFType {
        BxDFType::Specular
    }

    fn eval(&self, _wo: &Vector3f, _wi: &Vector3f,
            _surface: &SurfaceIntersection,
            _transport: TransportDirection) -> Vector3f {
        Vector3f::new(0.0, 0.0, 0.0)
    }

    fn sample(&self, wo: &Vector3f,
              surface: &SurfaceIntersection,
              _transport: TransportDirection,
              rng: &mut LcgRng) -> Option<BSDFSample> {
        match self.lobes(wo, surface)? {
            Lobes::Total(lobe) => Some(BSDFSample { wi: lobe.wi, pdf: 1.0, value: lobe.value }),
            Lobes::Split { reflection, transmission, fresnel } => {
                if rng.next_f32() < fresnel {
                    Some(BSDFSample { wi: reflection.wi, pdf: fresnel, value: reflection.value })
                } else {
                    Some(BSDFSample {
                        wi: transmission.wi,
                        pdf: 1.0 - fresnel,
                        value: transmission.value,
                    })
                }
            }
        }
    }

    fn sample_all(&self, wo: &Vector3f,
                  surface: &SurfaceIntersection,
                  _transport: TransportDirection) -> Vec<DirectionLobe> {
        match self.lobes(wo, surface) {
            None => Vec::new(),
            Some(Lobes::Total(lobe)) => vec![lobe],
            Some(Lobes::Split { reflection, transmission, .. }) => {
                vec![reflection, transmission]
            }
        }
    }
}
