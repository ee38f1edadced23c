// Copyright @yucwang 2026

use crate::core::bsdf::BSDF;
use crate::core::interaction::SurfaceIntersection;
use crate::core::rng::LcgRng;
use crate::core::shape::Shape;
use crate::emitters::area::AreaEmitter;
use crate::math::constants::{ Float, Vector3f };
use crate::math::ray::Ray3f;
use std::sync::Arc;

pub struct SceneObject {
    pub shape: Arc<dyn Shape>,
    pub material: Arc<dyn BSDF>,
    pub emission: Vector3f,
}

impl SceneObject {
    pub fn new(shape: Arc<dyn Shape>, material: Arc<dyn BSDF>) -> Self {
        Self { shape, material, emission: Vector3f::new(0.0, 0.0, 0.0) }
    }

    pub fn with_emission(shape: Arc<dyn Shape>, material: Arc<dyn BSDF>,
                         emission: Vector3f) -> Self {
        Self { shape, material, emission }
    }

    pub fn is_emissive(&self) -> bool {
        self.emission.x > 0.0 || self.emission.y > 0.0 || self.emission.z > 0.0
    }
}

pub struct Scene {
    objects: Vec<SceneObject>,
    emitters: Vec<AreaEmitter>,
}

impl Scene {
    pub fn new() -> Self {
        Self { objects: Vec::new(), emitters: Vec::new() }
    }

    pub fn with_objects(objects: Vec<SceneObject>) -> Self {
        let emitters = Self::emitters_from_objects(&objects);
        Self { objects, emitters }
    }

    pub fn add_object(&mut self, object: SceneObject) {
        if object.is_emissive() {
            self.emitters.push(AreaEmitter::from_shape(
                object.shape.clone(),
                object.emission,
            ));
        }
        self.objects.push(object);
    }

    pub fn objects(&self) -> &Vec<SceneObject> {
        &self.objects
    }

    pub fn emitters(&self) -> &Vec<AreaEmitter> {
        &self.emitters
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn emitters_from_objects(objects: &[SceneObject]) -> Vec<AreaEmitter> {
        let mut emitters = Vec::new();
        for object in objects {
            if object.is_emissive() {
                emitters.push(AreaEmitter::from_shape(
                    object.shape.clone(),
                    object.emission,
                ));
            }
        }
        emitters
    }

    /// Nearest intersection along the ray, with the hit object's material
    /// and emission attached.
    pub fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection> {
        let mut closest: Option<(usize, SurfaceIntersection)> = None;
        let mut closest_t = ray.max_t;
        for (index, object) in self.objects.iter().enumerate() {
            if let Some(hit) = object.shape.ray_intersection(ray) {
                if hit.t() < closest_t && ray.test_segment(hit.t()) {
                    closest_t = hit.t();
                    closest = Some((index, hit));
                }
            }
        }

        closest.map(|(index, hit)| {
            let object = &self.objects[index];
            hit.with_le(object.emission)
                .with_material(object.material.clone())
        })
    }

    /// Occlusion query for shadow rays; early-out on the first hit.
    pub fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
        for object in &self.objects {
            if object.shape.ray_intersection_t(ray) {
                return true;
            }
        }
        false
    }

    /// Uniformly choose one emitter together with its discrete density.
    pub fn sample_emitter(&self, rng: &mut LcgRng) -> Option<(&AreaEmitter, Float)> {
        if self.emitters.is_empty() {
            return None;
        }

        let emitter_count = self.emitters.len() as Float;
        let mut emitter_index = (rng.next_f32() * emitter_count) as usize;
        if emitter_index >= self.emitters.len() {
            emitter_index = self.emitters.len() - 1;
        }
        Some((&self.emitters[emitter_index], 1.0 / emitter_count))
    }
}
