// Copyright @yucwang 2026

use crate::core::emitter::{Emitter, EmitterPoint};
use crate::core::rng::LcgRng;
use crate::core::shape::Shape;
use crate::core::tangent_frame::{build_tangent_frame, local_to_world};
use crate::math::constants::{ Float, Vector3f };
use crate::math::warp::{sample_cosine_hemisphere, sample_cosine_hemisphere_pdf};
use std::sync::Arc;

/// One-sided area light with cosine-distributed emission about the surface
/// normal.
pub struct AreaEmitter {
    shape: Arc<dyn Shape>,
    radiance: Vector3f,
}

impl AreaEmitter {
    pub fn from_shape(shape: Arc<dyn Shape>, radiance: Vector3f) -> Self {
        Self { shape, radiance }
    }

    pub fn radiance(&self) -> Vector3f {
        self.radiance
    }
}

impl Emitter for AreaEmitter {
    fn sample_point(&self, rng: &mut LcgRng) -> (EmitterPoint, Float) {
        let record = self.shape.sample(rng);
        let point = EmitterPoint {
            position: record.intersection().p(),
            normal: record.intersection().sh_normal(),
        };
        (point, record.pdf())
    }

    fn sample_direction(&self, point: &EmitterPoint, rng: &mut LcgRng) -> (Vector3f, Float) {
        let local_dir = sample_cosine_hemisphere(&rng.next_2d());
        let pdf = sample_cosine_hemisphere_pdf(local_dir.z);
        let (tangent, bitangent) = build_tangent_frame(&point.normal);
        let dir = local_to_world(&local_dir, &tangent, &bitangent, &point.normal);
        (dir, pdf)
    }

    fn le(&self, point: &EmitterPoint, dir: &Vector3f) -> Vector3f {
        if dir.dot(&point.normal) > 0.0 {
            self.radiance
        } else {
            Vector3f::new(0.0, 0.0, 0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::rectangle::Rectangle;

    fn downward_light() -> AreaEmitter {
        let shape = Arc::new(Rectangle::new(
            Vector3f::new(-0.1, 3.0, -0.1),
            Vector3f::new(0.2, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 0.2),
            Vector3f::new(0.0, -1.0, 0.0),
        ));
        AreaEmitter::from_shape(shape, Vector3f::new(10.0, 10.0, 10.0))
    }

    #[test]
    fn test_sample_point_density() {
        let light = downward_light();
        let mut rng = LcgRng::new(3);
        let (point, pdf) = light.sample_point(&mut rng);
        assert!((pdf - 1.0 / 0.04).abs() < 1e-3);
        assert!((point.normal - Vector3f::new(0.0, -1.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_emission_is_one_sided() {
        let light = downward_light();
        let mut rng = LcgRng::new(3);
        let (point, _) = light.sample_point(&mut rng);
        let down = Vector3f::new(0.0, -1.0, 0.0);
        let up = Vector3f::new(0.0, 1.0, 0.0);
        assert_eq!(light.le(&point, &down), Vector3f::new(10.0, 10.0, 10.0));
        assert_eq!(light.le(&point, &up), Vector3f::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_sampled_directions_leave_the_surface() {
        let light = downward_light();
        let mut rng = LcgRng::new(9);
        let (point, _) = light.sample_point(&mut rng);
        for _ in 0..32 {
            let (dir, pdf) = light.sample_direction(&point, &mut rng);
            assert!(dir.dot(&point.normal) >= 0.0);
            assert!(pdf >= 0.0);
        }
    }
}
