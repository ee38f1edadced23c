// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f};

pub struct LcgRng {
    state: u64,
}

impl LcgRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    pub fn next_f32(&mut self) -> Float {
        (self.next_u32() as Float) / (u32::MAX as Float)
    }

    pub fn next_2d(&mut self) -> Vector2f {
        Vector2f::new(self.next_f32(), self.next_f32())
    }
}

#[cfg(test)]
mod tests {
    use super::LcgRng;

    #[test]
    fn test_lcg_is_deterministic() {
        let mut a = LcgRng::new(42);
        let mut b = LcgRng::new(42);
        for _ in 0..16 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_lcg_in_unit_interval() {
        let mut rng = LcgRng::new(7);
        for _ in 0..1024 {
            let v = rng.next_f32();
            assert!(v >= 0.0 && v <= 1.0);
        }
    }
}
