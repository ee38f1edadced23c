// Copyright @yucwang 2026

use crate::core::interaction::{SurfaceIntersection, SurfaceSampleRecord};
use crate::core::rng::LcgRng;
use crate::core::shape::Shape;
use crate::math::constants::{EPSILON, Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

/// A planar parallelogram spanned by two edge vectors from a corner point.
pub struct Rectangle {
    corner: Vector3f,
    edge_u: Vector3f,
    edge_v: Vector3f,
    normal: Vector3f,
    area: Float,
    inv_area: Float,
}

impl Rectangle {
    pub fn new(corner: Vector3f, edge_u: Vector3f, edge_v: Vector3f,
               normal_hint: Vector3f) -> Self {
        let mut normal = edge_u.cross(&edge_v);
        let area = normal.norm();
        if area > 0.0 {
            normal /= area;
        } else {
            normal = normal_hint;
        }
        // Orient the geometric normal to agree with the caller's hint.
        if normal.dot(&normal_hint) < 0.0 {
            normal = -normal;
        }
        let inv_area = if area > 0.0 { 1.0 / area } else { 0.0 };

        Self { corner, edge_u, edge_v, normal, area, inv_area }
    }

    fn intersect_plane(&self, ray: &Ray3f) -> Option<(Float, Vector2f)> {
        let denom = ray.dir().dot(&self.normal);
        if denom.abs() < EPSILON {
            return None;
        }

        let t = (self.corner - ray.origin()).dot(&self.normal) / denom;
        if !ray.test_segment(t) {
            return None;
        }

        let local = ray.at(t) - self.corner;
        let uu = self.edge_u.dot(&self.edge_u);
        let vv = self.edge_v.dot(&self.edge_v);
        let u = local.dot(&self.edge_u) / uu;
        let v = local.dot(&self.edge_v) / vv;
        if u < 0.0 || u > 1.0 || v < 0.0 || v > 1.0 {
            return None;
        }

        Some((t, Vector2f::new(u, v)))
    }
}

impl Shape for Rectangle {
    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection> {
        let (t, uv) = self.intersect_plane(ray)?;
        Some(SurfaceIntersection::new(
            ray.at(t),
            self.normal,
            self.normal,
            uv,
            t,
            Vector3f::new(0.0, 0.0, 0.0),
            None,
        ))
    }

    fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
        self.intersect_plane(ray).is_some()
    }

    fn sample(&self, rng: &mut LcgRng) -> SurfaceSampleRecord {
        let u = rng.next_f32();
        let v = rng.next_f32();
        let p = self.corner + self.edge_u * u + self.edge_v * v;
        let intersection = SurfaceIntersection::new(
            p,
            self.normal,
            self.normal,
            Vector2f::new(u, v),
            0.0,
            Vector3f::new(0.0, 0.0, 0.0),
            None,
        );
        SurfaceSampleRecord::new(intersection, self.inv_area)
    }

    fn surface_area(&self) -> Float {
        self.area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_floor() -> Rectangle {
        Rectangle::new(
            Vector3f::new(-0.5, 0.0, -0.5),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn test_rectangle_intersection() {
        let floor = unit_floor();
        let ray = Ray3f::new(
            Vector3f::new(0.25, 2.0, 0.25),
            Vector3f::new(0.0, -1.0, 0.0),
            None,
            None,
        );
        let hit = floor.ray_intersection(&ray).unwrap();
        assert!((hit.t() - 2.0).abs() < 1e-5);
        assert!((hit.p() - Vector3f::new(0.25, 0.0, 0.25)).norm() < 1e-5);
        assert!((hit.geo_normal() - Vector3f::new(0.0, 1.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_rectangle_miss_outside_bounds() {
        let floor = unit_floor();
        let ray = Ray3f::new(
            Vector3f::new(2.0, 2.0, 0.0),
            Vector3f::new(0.0, -1.0, 0.0),
            None,
            None,
        );
        assert!(floor.ray_intersection(&ray).is_none());
        assert!(!floor.ray_intersection_t(&ray));
    }

    #[test]
    fn test_rectangle_sample_on_surface() {
        let floor = unit_floor();
        let mut rng = LcgRng::new(1);
        for _ in 0..16 {
            let record = floor.sample(&mut rng);
            let p = record.intersection().p();
            assert!(p.x >= -0.5 && p.x <= 0.5);
            assert!(p.z >= -0.5 && p.z <= 0.5);
            assert_eq!(p.y, 0.0);
            assert!((record.pdf() - 1.0).abs() < 1e-6);
        }
    }
}
