// Copyright @yucwang 2023

use crate::core::interaction::{ SurfaceIntersection, SurfaceSampleRecord };
use crate::core::rng::LcgRng;
use crate::math::constants::Float;
use crate::math::ray::Ray3f;

pub trait Shape: Send + Sync {
    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection>;
    fn ray_intersection_t(&self, ray: &Ray3f) -> bool;
    fn sample(&self, rng: &mut LcgRng) -> SurfaceSampleRecord;
    fn surface_area(&self) -> Float;
}
