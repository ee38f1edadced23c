// Copyright @yucwang 2026

use crate::core::rng::LcgRng;
use crate::math::constants::{ Float, Vector3f };

/// A sampled point on an emissive surface.
#[derive(Debug, Clone, Copy)]
pub struct EmitterPoint {
    pub position: Vector3f,
    pub normal: Vector3f,
}

pub trait Emitter: Send + Sync {
    /// Sample a point on the emissive surface with its area density.
    fn sample_point(&self, rng: &mut LcgRng) -> (EmitterPoint, Float);

    /// Sample an emission direction leaving `point` with its solid-angle
    /// density.
    fn sample_direction(&self, point: &EmitterPoint, rng: &mut LcgRng) -> (Vector3f, Float);

    /// Emitted radiance leaving `point` toward `dir`.
    fn le(&self, point: &EmitterPoint, dir: &Vector3f) -> Vector3f;
}
