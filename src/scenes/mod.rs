// Copyright @yucwang 2026

use crate::core::scene::{Scene, SceneObject};
use crate::materials::glass::Glass;
use crate::materials::lambertian::Lambertian;
use crate::materials::mirror::Mirror;
use crate::math::constants::{Float, PI, Vector3f};
use crate::sensors::perspective::PerspectiveCamera;
use crate::shapes::rectangle::Rectangle;
use crate::shapes::sphere::Sphere;
use std::sync::Arc;

/// The built-in test scene: a cornell box with a mirror sphere and a glass
/// sphere under a square ceiling light.
pub fn cornell_box() -> Scene {
    let white = Arc::new(Lambertian::new(Vector3f::new(0.8, 0.8, 0.8)));
    let red = Arc::new(Lambertian::new(Vector3f::new(0.8, 0.05, 0.05)));
    let green = Arc::new(Lambertian::new(Vector3f::new(0.05, 0.8, 0.05)));
    let black = Arc::new(Lambertian::new(Vector3f::new(0.0, 0.0, 0.0)));

    let mut scene = Scene::new();

    // floor
    scene.add_object(SceneObject::new(
        Arc::new(Rectangle::new(
            Vector3f::new(-1.0, 0.0, -1.0),
            Vector3f::new(2.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 2.0),
            Vector3f::new(0.0, 1.0, 0.0),
        )),
        white.clone(),
    ));
    // ceiling
    scene.add_object(SceneObject::new(
        Arc::new(Rectangle::new(
            Vector3f::new(-1.0, 2.0, -1.0),
            Vector3f::new(2.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 2.0),
            Vector3f::new(0.0, -1.0, 0.0),
        )),
        white.clone(),
    ));
    // back wall
    scene.add_object(SceneObject::new(
        Arc::new(Rectangle::new(
            Vector3f::new(-1.0, 0.0, -1.0),
            Vector3f::new(2.0, 0.0, 0.0),
            Vector3f::new(0.0, 2.0, 0.0),
            Vector3f::new(0.0, 0.0, 1.0),
        )),
        white,
    ));
    // left wall
    scene.add_object(SceneObject::new(
        Arc::new(Rectangle::new(
            Vector3f::new(-1.0, 0.0, -1.0),
            Vector3f::new(0.0, 0.0, 2.0),
            Vector3f::new(0.0, 2.0, 0.0),
            Vector3f::new(1.0, 0.0, 0.0),
        )),
        red,
    ));
    // right wall
    scene.add_object(SceneObject::new(
        Arc::new(Rectangle::new(
            Vector3f::new(1.0, 0.0, -1.0),
            Vector3f::new(0.0, 0.0, 2.0),
            Vector3f::new(0.0, 2.0, 0.0),
            Vector3f::new(-1.0, 0.0, 0.0),
        )),
        green,
    ));
    // ceiling light
    scene.add_object(SceneObject::with_emission(
        Arc::new(Rectangle::new(
            Vector3f::new(-0.3, 1.98, -0.3),
            Vector3f::new(0.6, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 0.6),
            Vector3f::new(0.0, -1.0, 0.0),
        )),
        black,
        Vector3f::new(15.0, 15.0, 15.0),
    ));

    // mirror sphere
    scene.add_object(SceneObject::new(
        Arc::new(Sphere::new(Vector3f::new(-0.45, 0.35, -0.35), 0.35)),
        Arc::new(Mirror::new(Vector3f::new(0.9, 0.9, 0.9))),
    ));
    // glass sphere
    scene.add_object(SceneObject::new(
        Arc::new(Sphere::new(Vector3f::new(0.45, 0.35, 0.35), 0.35)),
        Arc::new(Glass::new(Vector3f::new(1.0, 1.0, 1.0), 1.5)),
    ));

    scene
}

/// The camera matching [`cornell_box`], looking down the negative z axis.
pub fn cornell_box_camera(width: usize, height: usize) -> PerspectiveCamera {
    let aspect = width as Float / height as Float;
    PerspectiveCamera::new(
        Vector3f::new(0.0, 1.0, 6.0),
        Vector3f::new(0.0, 1.0, -1.0),
        Vector3f::new(0.0, 1.0, 0.0),
        0.25 * PI,
        aspect,
        width,
        height,
    )
}
