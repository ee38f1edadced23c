// Copyright @yucwang 2026

use crate::core::interaction::{SurfaceIntersection, SurfaceSampleRecord};
use crate::core::rng::LcgRng;
use crate::core::shape::Shape;
use crate::math::constants::{Float, PI, Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::warp::sample_uniform_sphere;

pub struct Sphere {
    center: Vector3f,
    radius: Float,
}

impl Sphere {
    pub fn new(center: Vector3f, radius: Float) -> Self {
        Self { center, radius }
    }

    fn intersect_t(&self, ray: &Ray3f) -> Option<Float> {
        let oc = ray.origin() - self.center;
        let b = oc.dot(&ray.dir());
        let c = oc.norm_squared() - self.radius * self.radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_d = discriminant.sqrt();
        let t_near = -b - sqrt_d;
        if ray.test_segment(t_near) {
            return Some(t_near);
        }
        let t_far = -b + sqrt_d;
        if ray.test_segment(t_far) {
            return Some(t_far);
        }
        None
    }

    fn uv_at(&self, normal: &Vector3f) -> Vector2f {
        let theta = normal.z.clamp(-1.0, 1.0).acos();
        let mut phi = normal.y.atan2(normal.x);
        if phi < 0.0 {
            phi += 2.0 * PI;
        }
        Vector2f::new(phi / (2.0 * PI), theta / PI)
    }
}

impl Shape for Sphere {
    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection> {
        let t = self.intersect_t(ray)?;
        let p = ray.at(t);
        let normal = (p - self.center) / self.radius;
        Some(SurfaceIntersection::new(
            p,
            normal,
            normal,
            self.uv_at(&normal),
            t,
            Vector3f::new(0.0, 0.0, 0.0),
            None,
        ))
    }

    fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
        self.intersect_t(ray).is_some()
    }

    fn sample(&self, rng: &mut LcgRng) -> SurfaceSampleRecord {
        let u = rng.next_2d();
        let normal = sample_uniform_sphere(&u);
        let p = self.center + normal * self.radius;
        let intersection = SurfaceIntersection::new(
            p,
            normal,
            normal,
            self.uv_at(&normal),
            0.0,
            Vector3f::new(0.0, 0.0, 0.0),
            None,
        );
        SurfaceSampleRecord::new(intersection, 1.0 / self.surface_area())
    }

    fn surface_area(&self) -> Float {
        4.0 * PI * self.radius * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_intersection_front() {
        let sphere = Sphere::new(Vector3f::new(0.0, 0.0, -3.0), 1.0);
        let ray = Ray3f::new(
            Vector3f::new(0.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, -1.0),
            None,
            None,
        );
        let hit = sphere.ray_intersection(&ray).unwrap();
        assert!((hit.t() - 2.0).abs() < 1e-5);
        assert!((hit.geo_normal() - Vector3f::new(0.0, 0.0, 1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_sphere_intersection_from_inside() {
        let sphere = Sphere::new(Vector3f::new(0.0, 0.0, 0.0), 1.0);
        let ray = Ray3f::new(
            Vector3f::new(0.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, -1.0),
            None,
            None,
        );
        let hit = sphere.ray_intersection(&ray).unwrap();
        assert!((hit.t() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vector3f::new(0.0, 5.0, -3.0), 1.0);
        let ray = Ray3f::new(
            Vector3f::new(0.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, -1.0),
            None,
            None,
        );
        assert!(sphere.ray_intersection(&ray).is_none());
    }
}
