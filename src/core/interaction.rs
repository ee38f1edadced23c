// Copyright @yucwang 2023

use crate::core::bsdf::BSDF;
use crate::math::constants::{ Float, Vector2f, Vector3f };
use std::sync::Arc;

pub struct SurfaceIntersection {
    p: Vector3f,
    geo_normal: Vector3f,
    sh_normal:  Vector3f,
    uv: Vector2f,
    t: Float,
    le: Vector3f,
    material: Option<Arc<dyn BSDF>>,
}

pub struct SurfaceSampleRecord {
    intersection: SurfaceIntersection,
    pdf: Float,
}

impl SurfaceIntersection {
    pub fn new(new_p: Vector3f,
               new_geo_normal: Vector3f,
               new_sh_normal: Vector3f,
               new_uv: Vector2f,
               new_t: Float,
               new_le: Vector3f,
               new_material: Option<Arc<dyn BSDF>>) -> Self {
        Self { p: new_p, geo_normal: new_geo_normal, sh_normal: new_sh_normal,
               uv: new_uv, t: new_t, le: new_le, material: new_material }
    }

    pub fn t(&self) -> Float {
        self.t
    }

    pub fn le(&self) -> Vector3f {
        self.le
    }

    pub fn is_emissive(&self) -> bool {
        self.le.x > 0.0 || self.le.y > 0.0 || self.le.z > 0.0
    }

    pub fn p(&self) -> Vector3f {
        self.p
    }

    pub fn uv(&self) -> Vector2f {
        self.uv
    }

    pub fn geo_normal(&self) -> Vector3f {
        self.geo_normal
    }

    pub fn sh_normal(&self) -> Vector3f {
        self.sh_normal
    }

    pub fn material(&self) -> Option<&dyn BSDF> {
        self.material.as_deref()
    }

    pub fn with_le(&self, new_le: Vector3f) -> Self {
        Self {
            p: self.p,
            geo_normal: self.geo_normal,
            sh_normal: self.sh_normal,
            uv: self.uv,
            t: self.t,
            le: new_le,
            material: self.material.clone(),
        }
    }

    pub fn with_material(&self, new_material: Arc<dyn BSDF>) -> Self {
        Self {
            p: self.p,
            geo_normal: self.geo_normal,
            sh_normal: self.sh_normal,
            uv: self.uv,
            t: self.t,
            le: self.le,
            material: Some(new_material),
        }
    }
}

impl SurfaceSampleRecord {
    pub fn new(new_intersection: SurfaceIntersection,
               new_pdf: Float) -> Self {
        Self { intersection: new_intersection, pdf: new_pdf }
    }

    pub fn intersection(&self) -> &SurfaceIntersection {
        &self.intersection
    }

    pub fn pdf(&self) -> Float {
        self.pdf
    }
}
